//! Session configuration from TOML (`[session]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use taleweave_application::{EngineParams, FailurePolicy};
use taleweave_domain::{ConfigIssue, ConfigIssueCode};

/// Raw session configuration from TOML
///
/// # Example
///
/// ```toml
/// [session]
/// context_limit = 10
/// auto_play_interval_secs = 5
/// failure_policy = "system_message"   # or "narrative"
/// opening_narration = "The fog lifts."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    pub context_limit: usize,
    pub auto_play_interval_secs: u64,
    pub failure_policy: String,
    /// Replaces the scenario's opening narration; an empty string disables it.
    pub opening_narration: Option<String>,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            context_limit: 10,
            auto_play_interval_secs: 5,
            failure_policy: FailurePolicy::default().as_str().to_string(),
            opening_narration: None,
        }
    }
}

impl FileSessionConfig {
    pub fn parse_failure_policy(&self) -> (FailurePolicy, Vec<ConfigIssue>) {
        match self.failure_policy.parse::<FailurePolicy>() {
            Ok(policy) => (policy, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "session.failure_policy".to_string(),
                        value: self.failure_policy.clone(),
                        valid_values: vec!["system_message".to_string(), "narrative".to_string()],
                    },
                    format!(
                        "session.failure_policy: unknown value '{}', falling back to 'system_message'",
                        self.failure_policy
                    ),
                );
                (FailurePolicy::default(), vec![issue])
            }
        }
    }

    /// Convert to engine parameters, returning warnings for odd values.
    pub fn to_engine_params(&self) -> (EngineParams, Vec<ConfigIssue>) {
        let (policy, mut issues) = self.parse_failure_policy();
        if self.context_limit == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroValue {
                    field: "session.context_limit".to_string(),
                },
                "session.context_limit is 0, agents will only see the world header",
            ));
        }
        let params = EngineParams::default()
            .with_context_limit(self.context_limit)
            .with_failure_policy(policy)
            .with_auto_play_interval(Duration::from_secs(self.auto_play_interval_secs));
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_map_to_engine_defaults() {
        let (params, issues) = FileSessionConfig::default().to_engine_params();
        assert!(issues.is_empty());
        assert_eq!(params, EngineParams::default());
    }

    #[test]
    fn test_narrative_policy_and_zero_limit() {
        let config = FileSessionConfig {
            context_limit: 0,
            failure_policy: "narrative".to_string(),
            ..Default::default()
        };
        let (params, issues) = config.to_engine_params();
        assert_eq!(params.failure_policy, FailurePolicy::Narrative);
        assert_eq!(params.context_limit, 0);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_unknown_policy_warns() {
        let config = FileSessionConfig {
            failure_policy: "shout".to_string(),
            ..Default::default()
        };
        let (policy, issues) = config.parse_failure_policy();
        assert_eq!(policy, FailurePolicy::SystemMessage);
        assert_eq!(issues.len(), 1);
    }
}
