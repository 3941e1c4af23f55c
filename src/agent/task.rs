use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, agent_error::AgentError};

/// The user's goal in natural language. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task(String);

impl Task {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AgentError::EmptyTask.into());
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tasks_are_rejected() {
        assert!(Task::new("   ").is_err());
        assert_eq!(Task::new(" open notepad \n").unwrap().as_str(), "open notepad");
    }
}
