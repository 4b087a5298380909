//! Message entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form key/value annotations attached to a message.
pub type Metadata = BTreeMap<String, String>;

/// Metadata key recording which agent produced a message.
pub const AGENT_ID_KEY: &str = "agent_id";

/// Metadata key set on messages that carry a provider failure.
pub const ERROR_KEY: &str = "error";

/// Identifier of a message: sequence number combined with creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Compose `msg_<sequence>_<unix-seconds>`.
    pub fn compose(sequence: u64, created_at: &DateTime<Utc>) -> Self {
        Self(format!("msg_{}_{}", sequence, created_at.timestamp()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of narrative event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// A line spoken by a character agent.
    Dialogue,
    /// Narrator prose.
    Narration,
    /// An out-of-character director note.
    Intervention,
    /// Audit entries. Never fed to the model.
    System,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Dialogue => "dialogue",
            MessageKind::Narration => "narration",
            MessageKind::Intervention => "intervention",
            MessageKind::System => "system",
        }
    }

    /// Whether messages of this kind belong in the model's context.
    pub fn is_narrative(&self) -> bool {
        !matches!(self, MessageKind::System)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dialogue" => Ok(MessageKind::Dialogue),
            "narration" => Ok(MessageKind::Narration),
            "intervention" => Ok(MessageKind::Intervention),
            "system" => Ok(MessageKind::System),
            other => Err(format!("unknown message kind: {}", other)),
        }
    }
}

/// A narrative event in the story log (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Free-text speaker: an agent's display name, "Narrator", "Director", "System"...
    pub speaker: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "message_type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Message {
    /// Agent id recorded in the metadata, if any.
    pub fn agent_id(&self) -> Option<&str> {
        self.metadata.get(AGENT_ID_KEY).map(String::as_str)
    }

    /// Whether this message carries a provider failure.
    pub fn is_error(&self) -> bool {
        self.metadata.get(ERROR_KEY).is_some_and(|v| v == "true")
    }

    /// Render as a `speaker: content` context line.
    pub fn context_line(&self) -> String {
        format!("{}: {}", self.speaker, self.content)
    }
}
