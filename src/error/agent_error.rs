use crate::message::ToolCall;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("tool call {call} failed: {source}")]
    ToolFailed {
        call: Box<ToolCall>,
        #[source]
        source: Box<crate::error::Error>,
    },

    #[error("invalid arguments for `{tool}`: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("unknown key: {0:?}")]
    UnknownKey(String),

    #[error("task is empty")]
    EmptyTask,

    #[error("planner returned an empty plan")]
    EmptyPlan,

    #[error("recursion limit of {0} reached without finishing the task")]
    RecursionLimit(usize),

    #[error("grounding failed: {0}")]
    Grounding(String),
}

impl AgentError {
    pub fn invalid_arguments(tool: impl Into<String>, reason: impl ToString) -> Self {
        AgentError::InvalidArguments {
            tool: tool.into(),
            reason: reason.to_string(),
        }
    }
}
