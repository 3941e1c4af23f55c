use std::fmt;

use serde::{Deserialize, Serialize};

/// 编排状态机的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Planning,
    Acting,
    Replanning,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Planning => write!(f, "planning"),
            Phase::Acting => write!(f, "acting"),
            Phase::Replanning => write!(f, "replanning"),
            Phase::Done => write!(f, "done"),
        }
    }
}

/// How much of the plan one action loop is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// The whole plan at once; the action loop must finish the task.
    SingleShot,
    /// One step per acting round; the orchestrator advances the plan.
    #[default]
    StepWise,
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "single_shot" => Ok(Granularity::SingleShot),
            "step_wise" => Ok(Granularity::StepWise),
            other => Err(format!("unknown granularity {other:?}")),
        }
    }
}
