pub mod agent;
pub mod bootstrap;
pub mod error;
pub mod grounding;
pub mod input;
pub mod message;
pub mod oracle;
pub mod prompt;
pub mod shared;
pub mod tools;
pub mod utils;

pub use bootstrap::{build_orchestrator, init_tracing};
pub use error::{Error, Result};
