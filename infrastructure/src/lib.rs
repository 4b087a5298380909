//! Infrastructure layer for taleweave
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod export;
pub mod logging;
pub mod oneshot;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileLoggingConfig, FileMockConfig, FileOpenAiConfig,
    FileProviderConfig, FileSessionConfig,
};
pub use export::{ExportError, JsonSessionExporter};
pub use logging::JsonlConversationLogger;
pub use oneshot::{OneshotResult, run_oneshot};
pub use providers::{MockProvider, OpenAiProvider, ProviderFactory, ProviderSetupError};
