//! Layered configuration for taleweave
//!
//! Later sources override earlier ones key by key:
//!
//! 1. Built-in defaults
//! 2. Global file: `<config dir>/taleweave/config.toml`
//! 3. Project file: `./taleweave.toml` or `./.taleweave.toml`
//! 4. `--config <path>`
//! 5. `TALEWEAVE_*` environment variables (`__` separates sections)

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileLoggingConfig, FileMockConfig, FileOpenAiConfig, FileProviderConfig,
    FileSessionConfig,
};
pub use loader::ConfigLoader;
