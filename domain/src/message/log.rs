//! Append-only message log

use super::entities::{Message, MessageId, MessageKind, Metadata};
use chrono::Utc;

/// Ordered, append-only sequence of narrative events.
///
/// There is no way to edit or remove an entry once appended; creation order
/// is the only ordering used for context and for display.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_sequence: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from already-ordered messages (e.g. a snapshot).
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let next_sequence = messages.len() as u64;
        Self {
            messages,
            next_sequence,
        }
    }

    /// Append a message stamped with the next sequence id and the current time.
    pub fn append(
        &mut self,
        speaker: impl Into<String>,
        content: impl Into<String>,
        kind: MessageKind,
        metadata: Metadata,
    ) -> &Message {
        let timestamp = Utc::now();
        let id = MessageId::compose(self.next_sequence, &timestamp);
        self.next_sequence += 1;

        self.messages.push(Message {
            id,
            speaker: speaker.into(),
            content: content.into(),
            timestamp,
            kind,
            metadata,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// The last `min(limit, len)` entries in append order.
    pub fn recent(&self, limit: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(limit);
        &self.messages[start..]
    }

    /// Context lines for the model: the recent window minus `system` entries.
    pub fn render_context(&self, limit: usize) -> Vec<String> {
        self.recent(limit)
            .iter()
            .filter(|m| m.kind.is_narrative())
            .map(Message::context_line)
            .collect()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
