//! Agent domain module
//!
//! Character agents and the fixed roster they are registered in.

pub mod entities;
pub mod registry;

pub use entities::{Agent, AgentId};
pub use registry::AgentRegistry;
