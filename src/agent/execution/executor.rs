use tracing::{debug, error, info, warn};

use crate::{
    agent::execution::StepBudget,
    error::{Result, agent_error::AgentError},
    message::{Message, ToolOutput, ToolResult, compact_history},
    oracle::Oracle,
    tools::{BAD_TOOL_NAME, ToolSet},
};

/// The action sub-loop: ask the oracle, run the tool calls it requests,
/// feed the screenshots back, until a reply comes without tool calls.
pub struct ActionLoop<'a> {
    oracle: &'a dyn Oracle,
    tools: ToolSet<'a>,
    system: Vec<Message>,
}

impl<'a> ActionLoop<'a> {
    pub fn new(oracle: &'a dyn Oracle, tools: ToolSet<'a>, system: Vec<Message>) -> Self {
        Self {
            oracle,
            tools,
            system,
        }
    }

    /// Runs to completion and returns `history` extended with every reply and
    /// tool result. System messages are sent on each round but never returned.
    pub async fn run(&mut self, mut history: Vec<Message>, budget: &mut StepBudget) -> Result<Vec<Message>> {
        loop {
            budget.charge()?;

            let mut request = Vec::with_capacity(self.system.len() + history.len());
            request.extend(self.system.iter().cloned());
            request.extend(history.iter().cloned());

            let reply = self.oracle.chat(&request, self.tools.infos()).await?;
            if !reply.text().is_empty() {
                info!("🤖 {}", reply.text());
            }
            let calls = reply.tool_calls.clone();
            history.push(reply);

            if calls.is_empty() {
                debug!(messages = history.len(), "no tool calls, action loop finished");
                return Ok(history);
            }

            for call in calls {
                let output = match self.tools.get(&call.name) {
                    None => {
                        warn!(tool = %call.name, id = %call.id, "oracle requested an unknown tool");
                        ToolOutput::text(BAD_TOOL_NAME)
                    }
                    Some(kind) => {
                        info!("🛠️ calling {call}");
                        match self.tools.execute(kind, &call).await {
                            Ok(output) => output,
                            Err(err) => {
                                error!(call = %call, error = %err, "❌ tool call failed");
                                return Err(AgentError::ToolFailed {
                                    call: Box::new(call),
                                    source: Box::new(err),
                                }
                                .into());
                            }
                        }
                    }
                };
                history.push(Message::tool(ToolResult {
                    id: call.id,
                    name: call.name,
                    content: output,
                }));
            }

            compact_history(&mut history);
        }
    }
}
