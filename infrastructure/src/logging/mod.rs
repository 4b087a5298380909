//! Story transcript output.
//!
//! [`JsonlConversationLogger`] is the file adapter behind the
//! [`ConversationLogger`](taleweave_application::ConversationLogger) port.
//! Diagnostic logs go through `tracing` and are set up by the binary.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
