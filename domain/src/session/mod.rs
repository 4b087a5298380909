//! Story session domain.
//!
//! - [`entities::Session`]: a world and a roster with the log and mode flags
//! - [`snapshot::SessionSnapshot`]: the export document

pub mod entities;
pub mod snapshot;

pub use entities::Session;
pub use snapshot::SessionSnapshot;
