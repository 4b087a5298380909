//! Story provider adapters and their factory

pub mod mock;
pub mod openai;

pub use mock::MockProvider;
pub use openai::OpenAiProvider;

use crate::config::FileProviderConfig;
use std::sync::Arc;
use taleweave_application::{ProviderKind, StoryProvider};
use taleweave_domain::Model;
use taleweave_domain::scenario::QuoteTable;
use thiserror::Error;
use tracing::info;

/// Errors raised while constructing a provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderSetupError {
    #[error("{env} environment variable not set.")]
    MissingCredential { env: String },

    #[error("Provider '{0}' not supported yet.")]
    UnknownProvider(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Builds providers from the `[provider]` configuration.
///
/// Kept by the front-end so the provider can be switched mid-session.
#[derive(Debug, Clone)]
pub struct ProviderFactory {
    config: FileProviderConfig,
    quotes: QuoteTable,
    seed: Option<u64>,
}

impl ProviderFactory {
    pub fn new(config: FileProviderConfig, quotes: QuoteTable) -> Self {
        Self {
            config,
            quotes,
            seed: None,
        }
    }

    /// Seed the mock provider's RNG.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &FileProviderConfig {
        &self.config
    }

    /// Parse a provider name and build it.
    pub fn build_named(&self, name: &str) -> Result<Arc<dyn StoryProvider>, ProviderSetupError> {
        let kind = name
            .parse::<ProviderKind>()
            .map_err(|_| ProviderSetupError::UnknownProvider(name.trim().to_string()))?;
        self.build(kind)
    }

    pub fn build(&self, kind: ProviderKind) -> Result<Arc<dyn StoryProvider>, ProviderSetupError> {
        info!("Using {} provider", kind);
        match kind {
            ProviderKind::Mock => {
                let (min, max) = self.config.mock.delay_bounds();
                let mut provider = MockProvider::new(self.quotes.clone())
                    .with_delay_ms(min, max)
                    .with_fallback(self.config.mock.fallback.clone());
                if let Some(seed) = self.seed {
                    provider = provider.with_seed(seed);
                }
                Ok(Arc::new(provider))
            }
            ProviderKind::OpenAi => {
                let api_key = self.openai_api_key()?;
                let model = self.config.model.as_deref().map(Model::from);
                let provider = OpenAiProvider::new(&self.config.openai, api_key, model)?;
                Ok(Arc::new(provider))
            }
        }
    }

    /// Direct `api_key` first, then the configured environment variable.
    fn openai_api_key(&self) -> Result<String, ProviderSetupError> {
        let openai = &self.config.openai;
        if let Some(key) = openai.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(&openai.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProviderSetupError::MissingCredential {
                env: openai.api_key_env.clone(),
            })
    }
}
