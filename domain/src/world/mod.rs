//! World domain.
//!
//! - [`state::WorldState`]: the single mutable narrative environment record
//! - [`update::WorldUpdate`]: a partial patch over it
//! - [`update::WorldField`]: the closed set of patchable field names

pub mod state;
pub mod update;

pub use state::WorldState;
pub use update::{WorldField, WorldUpdate};
