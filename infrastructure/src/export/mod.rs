//! Session export to JSON files
//!
//! The exported document holds `messages`, `world_state` and `agents`, pretty
//! printed, with RFC 3339 timestamps.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use taleweave_domain::SessionSnapshot;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes session snapshots as `story_session_<YYYYmmdd_HHMMSS>.json`.
pub struct JsonSessionExporter {
    dir: PathBuf,
}

impl JsonSessionExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file_name_at(time: &DateTime<Local>) -> String {
        format!("story_session_{}.json", time.format("%Y%m%d_%H%M%S"))
    }

    /// Export into the configured directory under a timestamped name.
    pub fn export(&self, snapshot: &SessionSnapshot) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(Self::file_name_at(&Local::now()));
        Self::export_to(snapshot, &path)?;
        Ok(path)
    }

    /// Export to an explicit path, creating parent directories.
    pub fn export_to(snapshot: &SessionSnapshot, path: &Path) -> Result<(), ExportError> {
        let json = snapshot.to_json_pretty()?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        info!(
            "Exported {} messages to {}",
            snapshot.messages.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use taleweave_domain::{AgentRegistry, MessageKind, Metadata, Scenario, Session};

    fn snapshot() -> SessionSnapshot {
        let scenario = Scenario::eldermoor();
        let mut session = Session::new(
            scenario.world,
            AgentRegistry::new(scenario.agents).unwrap(),
        );
        session
            .log
            .append("Narrator", "Welcome.", MessageKind::Narration, Metadata::new());
        SessionSnapshot::capture(&session)
    }

    #[test]
    fn test_file_name_format() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            JsonSessionExporter::file_name_at(&time),
            "story_session_20240309_070501.json"
        );
    }

    #[test]
    fn test_export_writes_readable_document() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = JsonSessionExporter::new(dir.path());

        let path = exporter.export(&snapshot()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("story_session_"));
        assert!(name.ends_with(".json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["messages"][0]["message_type"], "narration");
        assert_eq!(
            value["world_state"]["location"],
            "Ancient Ruins of Eldermoor"
        );
        assert_eq!(value["agents"].as_array().unwrap().len(), 2);
        assert!(value["agents"][0].get("is_producing").is_none());

        let parsed = SessionSnapshot::from_json(&content).unwrap();
        assert_eq!(parsed.messages[0].content, "Welcome.");
        assert_eq!(parsed.agents, snapshot().agents);
    }

    #[test]
    fn test_export_to_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.json");
        JsonSessionExporter::export_to(&snapshot(), &path).unwrap();
        assert!(path.exists());
    }
}
