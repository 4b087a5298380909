//! Application layer for taleweave
//!
//! This crate contains the storytelling engine, port definitions, and engine
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{EngineParams, FailurePolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoProgress, TurnProgressNotifier},
    story_provider::{ProviderError, ProviderKind, StoryProvider},
};
pub use use_cases::auto_play::{AutoPlayDriver, AutoPlayReport, AutoPlayStop};
pub use use_cases::storytelling::{EngineError, StorytellingEngine, TurnOutcome};
