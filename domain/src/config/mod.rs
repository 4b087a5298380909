//! Configuration validation issues.
//!
//! Loading configuration never fails on questionable values; instead
//! `FileConfig::validate` reports [`ConfigIssue`]s that the binary prints as
//! warnings before starting a session.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A field holds a value outside its accepted set.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// `min` exceeds `max` for a ranged setting.
    InvertedRange { field: String },
    /// A numeric setting that must be positive is zero.
    ZeroValue { field: String },
    /// The configured roster is empty, so no agent can ever speak.
    EmptyRoster,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let w = ConfigIssue::warning(
            ConfigIssueCode::ZeroValue {
                field: "session.context_limit".to_string(),
            },
            "zero",
        );
        assert!(!w.is_error());
        let e = ConfigIssue::error(ConfigIssueCode::EmptyRoster, "no agents");
        assert!(e.is_error());
    }
}
