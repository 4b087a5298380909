//! JSONL transcript of story events.
//!
//! One line per [`ConversationEvent`]: `type` and `timestamp` first, then the
//! payload's fields. A payload that is not a JSON object is nested under `data`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use taleweave_application::{ConversationEvent, ConversationLogger};
use tracing::warn;

#[derive(Serialize)]
struct TranscriptLine<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    timestamp: String,
    #[serde(flatten)]
    body: LineBody,
}

#[derive(Serialize)]
#[serde(untagged)]
enum LineBody {
    Fields(Map<String, Value>),
    Data { data: Value },
}

impl From<Value> for LineBody {
    fn from(payload: Value) -> Self {
        match payload {
            Value::Object(fields) => LineBody::Fields(fields),
            data => LineBody::Data { data },
        }
    }
}

/// Writes the story transcript, one JSON object per line.
///
/// Every line is flushed as soon as it is written so a crashed session still
/// leaves a readable transcript.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open `path` for a fresh transcript, truncating any previous one.
    ///
    /// Parent directories are created. `None` if the file cannot be opened;
    /// the session then runs without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let opened = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|_| File::create(path));

        match opened {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Cannot open story transcript {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(writer, "{}", line)?;
        writer.flush()
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let line = TranscriptLine {
            event_type: event.event_type,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            body: event.payload.into(),
        };

        let result = serde_json::to_string(&line)
            .map_err(std::io::Error::from)
            .and_then(|line| self.write_line(&line));
        if let Err(e) = result {
            warn!("Dropped {} transcript record: {}", event.event_type, e);
        }
    }
}
