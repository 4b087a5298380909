//! Engine parameters for the turn loop.
//!
//! [`EngineParams`] groups the static parameters used by
//! [`StorytellingEngine`](crate::use_cases::storytelling::StorytellingEngine)
//! and [`AutoPlayDriver`](crate::use_cases::auto_play::AutoPlayDriver).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a provider failure is recorded in the message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Append a `system` message flagged with `error = "true"`.
    #[default]
    SystemMessage,
    /// Append the failure text as the agent's own dialogue.
    ///
    /// Matches sessions exported before failures were tagged.
    Narrative,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::SystemMessage => "system_message",
            FailurePolicy::Narrative => "narrative",
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system_message" | "system" => Ok(FailurePolicy::SystemMessage),
            "narrative" | "legacy" => Ok(FailurePolicy::Narrative),
            other => Err(format!("unknown failure policy: {}", other)),
        }
    }
}

/// Turn loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Number of most recent log entries considered for the model context.
    pub context_limit: usize,
    pub failure_policy: FailurePolicy,
    /// Wait before each auto-play turn.
    pub auto_play_interval: Duration,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            context_limit: 10,
            failure_policy: FailurePolicy::default(),
            auto_play_interval: Duration::from_secs(5),
        }
    }
}

impl EngineParams {
    // ==================== Builder Methods ====================

    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.context_limit = limit;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_auto_play_interval(mut self, interval: Duration) -> Self {
        self.auto_play_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = EngineParams::default();
        assert_eq!(params.context_limit, 10);
        assert_eq!(params.failure_policy, FailurePolicy::SystemMessage);
        assert_eq!(params.auto_play_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_builder() {
        let params = EngineParams::default()
            .with_context_limit(4)
            .with_failure_policy(FailurePolicy::Narrative)
            .with_auto_play_interval(Duration::from_millis(10));
        assert_eq!(params.context_limit, 4);
        assert_eq!(params.failure_policy, FailurePolicy::Narrative);
        assert_eq!(params.auto_play_interval, Duration::from_millis(10));
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!(
            "system".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::SystemMessage
        );
        assert_eq!(
            "Narrative".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Narrative
        );
        assert!("loud".parse::<FailurePolicy>().is_err());
    }
}
