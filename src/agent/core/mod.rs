pub mod orchestrator;

pub use orchestrator::{Orchestrator, OrchestratorSettings, RunReport, transition};
