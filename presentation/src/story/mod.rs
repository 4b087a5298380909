//! Interactive story session

pub mod repl;

pub use repl::{ReplCommand, SessionServices, StoryRepl};
