//! Presentation layer for taleweave
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive story REPL.

pub mod cli;
pub mod output;
pub mod progress;
pub mod story;

// Re-export commonly used types
pub use cli::commands::{Cli, Command};
pub use output::console::StoryFormatter;
pub use progress::reporter::{SimpleProgress, TurnSpinner};
pub use story::{ReplCommand, SessionServices, StoryRepl};
