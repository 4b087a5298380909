//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of story events
    pub conversation_log: Option<PathBuf>,
    /// Directory for daily diagnostic log files
    pub dir: Option<PathBuf>,
}
