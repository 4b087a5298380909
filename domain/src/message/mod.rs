//! Message domain.
//!
//! - [`entities::Message`]: a single narrative event
//! - [`log::MessageLog`]: the append-only ordered sequence of messages

pub mod entities;
pub mod log;

pub use entities::{Message, MessageId, MessageKind, Metadata};
pub use log::MessageLog;
