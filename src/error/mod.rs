pub mod agent_error;
pub mod input_error;
pub mod oracle_error;

use std::io;

use thiserror::Error as ThisError;

use crate::error::{agent_error::AgentError, input_error::InputError, oracle_error::OracleError};

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serde_json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("oracle error: {0}")]
    OracleError(#[from] OracleError),

    #[error("agent error: {0}")]
    AgentError(#[from] AgentError),

    #[error("input error: {0}")]
    InputError(#[from] InputError),
}

impl Error {
    /// Only oracle overload / rate limiting is worth waiting out.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::OracleError(e) if e.is_retryable())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
