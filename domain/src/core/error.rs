//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Duplicate agent id: {0}")]
    DuplicateAgent(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DomainError {
    /// Check if this error refers to a missing agent
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::AgentNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_display() {
        let error = DomainError::AgentNotFound("agent_9".to_string());
        assert_eq!(error.to_string(), "Agent not found: agent_9");
    }

    #[test]
    fn test_is_not_found_check() {
        assert!(DomainError::AgentNotFound("x".to_string()).is_not_found());
        assert!(!DomainError::DuplicateAgent("x".to_string()).is_not_found());
        assert!(!DomainError::InvalidInput("x".to_string()).is_not_found());
    }
}
