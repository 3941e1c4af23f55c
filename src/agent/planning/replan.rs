use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    agent::planning::{Step, plan::steps_schema},
    oracle::{OutputSchema, StructuredOutput},
};

/// Verdict of a replanning round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum ReplanDecision {
    /// Not finished; keep the remaining plan.
    Continue,
    /// Discard the remaining steps and use this plan instead.
    Replan { plan: Vec<Step> },
    /// The task is complete.
    Done,
}

impl StructuredOutput for ReplanDecision {
    fn output_schema() -> OutputSchema {
        OutputSchema {
            name: "replan_decision",
            schema: json!({
                "type": "object",
                "properties": {
                    "decision": { "type": "string", "enum": ["continue", "replan", "done"] },
                    "plan": steps_schema(),
                },
                "required": ["decision"],
            }),
        }
    }
}
