use tracing::error;

use crate::error::{Result, agent_error::AgentError};

pub const DEFAULT_RECURSION_LIMIT: usize = 100;

/// Hard ceiling on orchestrator nodes plus oracle rounds for one run.
#[derive(Debug, Clone)]
pub struct StepBudget {
    limit: usize,
    used: usize,
}

impl StepBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// Spends one unit; running past the limit is fatal.
    pub fn charge(&mut self) -> Result<()> {
        if self.used >= self.limit {
            error!(limit = self.limit, "recursion limit reached");
            return Err(AgentError::RecursionLimit(self.limit).into());
        }
        self.used += 1;
        Ok(())
    }

    pub fn used(&self) -> usize {
        self.used
    }
}

impl Default for StepBudget {
    fn default() -> Self {
        Self::new(DEFAULT_RECURSION_LIMIT)
    }
}
