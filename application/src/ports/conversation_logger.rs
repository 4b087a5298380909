//! Story transcript port.
//!
//! The engine reports every state change of a session as a
//! [`ConversationEvent`]. `tracing` carries diagnostics for humans; this port
//! carries the machine-readable transcript (JSONL in the infrastructure
//! adapter).

use serde_json::Value;

/// Event type names emitted by the storytelling engine.
pub mod events {
    pub const MESSAGE_APPENDED: &str = "message_appended";
    pub const TURN_COMPLETED: &str = "turn_completed";
    pub const TURN_FAILED: &str = "turn_failed";
    pub const WORLD_UPDATED: &str = "world_updated";
    pub const PROVIDER_CHANGED: &str = "provider_changed";
    pub const SESSION_STATE: &str = "session_state";
}

/// One transcript record: an event name plus its JSON payload.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for transcript records.
///
/// `log` cannot fail from the engine's point of view; an adapter that cannot
/// write a record drops it.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every record.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
