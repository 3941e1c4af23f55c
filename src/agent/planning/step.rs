use std::fmt;

use serde::{Deserialize, Serialize};

/// One atomic instruction of a plan, e.g. "open the start menu".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StepRepr")]
pub struct Step {
    pub step: String,
}

// models sometimes return bare strings instead of `{"step": ...}`
#[derive(Deserialize)]
#[serde(untagged)]
enum StepRepr {
    Text(String),
    Object { step: String },
}

impl From<StepRepr> for Step {
    fn from(repr: StepRepr) -> Self {
        match repr {
            StepRepr::Text(step) | StepRepr::Object { step } => Step { step },
        }
    }
}

impl Step {
    pub fn new(step: impl Into<String>) -> Self {
        Self { step: step.into() }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.step)
    }
}
