//! Story provider port
//!
//! Defines the interface for turning a prompt and an agent persona into text.

use async_trait::async_trait;
use taleweave_domain::Agent;
use thiserror::Error;

/// Which backend a provider talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    /// Canned quotes after a randomized delay.
    #[default]
    Mock,
    /// OpenAI-compatible chat completions.
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Mock => "mock",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(ProviderKind::Mock),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(format!("Provider '{}' not supported yet.", other)),
        }
    }
}

/// Errors that can occur while generating a line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No completion returned")]
    EmptyResponse,

    #[error("Other error: {0}")]
    Other(String),
}

/// Text-generation backend used by the storytelling engine.
///
/// Implementations (adapters) live in the infrastructure layer. The engine
/// never propagates a [`ProviderError`]; it records it in the log instead.
#[async_trait]
pub trait StoryProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Generate the agent's next line for `prompt`.
    async fn generate(&self, prompt: &str, agent: &Agent) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("mock".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(
            "anthropic".parse::<ProviderKind>().unwrap_err(),
            "Provider 'anthropic' not supported yet."
        );
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Status {
            code: 401,
            body: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned HTTP 401: bad key");
    }
}
