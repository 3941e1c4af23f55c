pub mod config;

pub use config::{GlobalConfig, GroundingStrategy, OracleConfig};
