//! Domain layer for taleweave
//!
//! This crate contains the core narrative entities and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A session owns exactly one [`WorldState`], one [`AgentRegistry`] and one
//! append-only [`MessageLog`]. Character agents and a human director take turns
//! adding to the log while the world state is patched in place.
//!
//! ## Turn
//!
//! One turn selects an agent that did not speak last, renders the recent log
//! plus the world state into a prompt, and appends the generated line.

pub mod agent;
pub mod config;
pub mod core;
pub mod message;
pub mod prompt;
pub mod scenario;
pub mod session;
pub mod util;
pub mod world;

// Re-export commonly used types
pub use agent::{
    entities::{Agent, AgentId},
    registry::AgentRegistry,
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{error::DomainError, model::Model};
pub use message::{
    entities::{Message, MessageId, MessageKind, Metadata},
    log::MessageLog,
};
pub use prompt::StoryPromptTemplate;
pub use scenario::Scenario;
pub use session::{entities::Session, snapshot::SessionSnapshot};
pub use world::{
    state::WorldState,
    update::{WorldField, WorldUpdate},
};
