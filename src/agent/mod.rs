pub mod core;
pub mod execution;
pub mod planning;
pub mod task;
pub mod types;

pub use core::{Orchestrator, OrchestratorSettings, RunReport};
pub use execution::{ActionLoop, StepBudget};
pub use planning::{Plan, Planner, ReplanDecision, Step};
pub use task::Task;
pub use types::{Granularity, Phase};
