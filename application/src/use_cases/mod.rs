//! Use cases for the application layer

pub mod auto_play;
pub mod storytelling;
