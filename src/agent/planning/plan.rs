use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    agent::planning::Step,
    oracle::{OutputSchema, StructuredOutput},
};

pub(crate) fn steps_schema() -> Value {
    json!({
        "type": "array",
        "description": "ordered steps, each a single very simple mouse or keyboard action",
        "items": {
            "type": "object",
            "properties": { "step": { "type": "string" } },
            "required": ["step"],
        },
    })
}

/// Ordered steps; consumed from the front or replaced wholesale on replan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "plan")]
    steps: VecDeque<Step>,
}

impl Plan {
    pub fn from_steps(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Numbered list, one `"{n}. {step}"` line per step starting at 1.
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn front(&self) -> Option<&Step> {
        self.steps.front()
    }

    pub fn pop_front(&mut self) -> Option<Step> {
        self.steps.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

impl StructuredOutput for Plan {
    fn output_schema() -> OutputSchema {
        OutputSchema {
            name: "plan",
            schema: json!({
                "type": "object",
                "properties": { "plan": steps_schema() },
                "required": ["plan"],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(steps: &[&str]) -> Plan {
        Plan::from_steps(steps.iter().map(|s| Step::new(*s)))
    }

    #[test]
    fn render_is_one_indexed_and_ordered() {
        let plan = plan(&["open start menu", "search notepad", "press enter"]);
        let rendered = plan.render();
        assert_eq!(rendered, "1. open start menu\n2. search notepad\n3. press enter");
        assert_eq!(plan.render(), rendered);
    }

    #[test]
    fn empty_plan_renders_empty() {
        assert_eq!(Plan::default().render(), "");
    }

    #[test]
    fn deserializes_objects_and_bare_strings() {
        let plan: Plan =
            serde_json::from_value(json!({"plan": [{"step": "a"}, "b"]})).unwrap();
        assert_eq!(plan.render(), "1. a\n2. b");
    }
}
