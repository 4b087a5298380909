//! Provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};
use taleweave_application::ProviderKind;
use taleweave_domain::{ConfigIssue, ConfigIssueCode};

/// Raw provider configuration from TOML
///
/// # Example
///
/// ```toml
/// [provider]
/// kind = "openai"            # "mock" or "openai"
/// model = "gpt-4o-mini"      # overrides each agent's preferred model
///
/// [provider.mock]
/// min_delay_ms = 1000
/// max_delay_ms = 3000
///
/// [provider.openai]
/// api_key_env = "OPENAI_API_KEY"
/// max_tokens = 150
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Backend used at startup: "mock" or "openai"
    pub kind: String,
    /// Model override; when unset each agent's preferred model is used
    pub model: Option<String>,
    pub mock: FileMockConfig,
    pub openai: FileOpenAiConfig,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Mock.as_str().to_string(),
            model: None,
            mock: FileMockConfig::default(),
            openai: FileOpenAiConfig::default(),
        }
    }
}

impl FileProviderConfig {
    /// Parse `kind`, falling back to the mock provider with a warning.
    pub fn parse_kind(&self) -> (ProviderKind, Vec<ConfigIssue>) {
        match self.kind.parse::<ProviderKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "provider.kind".to_string(),
                        value: self.kind.clone(),
                        valid_values: vec!["mock".to_string(), "openai".to_string()],
                    },
                    format!(
                        "provider.kind: unknown value '{}', falling back to 'mock'",
                        self.kind
                    ),
                );
                (ProviderKind::Mock, vec![issue])
            }
        }
    }
}

/// Mock provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMockConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Line used for agents without quotes.
    pub fallback: String,
}

impl Default for FileMockConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            fallback: "I'm not sure how to respond.".to_string(),
        }
    }
}

impl FileMockConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.min_delay_ms > self.max_delay_ms {
            vec![ConfigIssue::warning(
                ConfigIssueCode::InvertedRange {
                    field: "provider.mock.*_delay_ms".to_string(),
                },
                format!(
                    "provider.mock: min_delay_ms ({}) exceeds max_delay_ms ({}), bounds will be swapped",
                    self.min_delay_ms, self.max_delay_ms
                ),
            )]
        } else {
            vec![]
        }
    }

    /// Delay bounds in milliseconds, ordered.
    pub fn delay_bounds(&self) -> (u64, u64) {
        if self.min_delay_ms <= self.max_delay_ms {
            (self.min_delay_ms, self.max_delay_ms)
        } else {
            (self.max_delay_ms, self.min_delay_ms)
        }
    }
}

/// OpenAI-compatible API provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key. Prefer the environment variable.
    pub api_key: Option<String>,
    /// Base URL for the API (can point at any OpenAI-compatible server).
    /// A trailing `/v1` is optional.
    pub base_url: String,
    /// Max tokens per response.
    pub max_tokens: u32,
    pub temperature: f32,
    /// HTTP client timeout.
    pub timeout_secs: u64,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 150,
            temperature: 0.8,
            timeout_secs: 60,
        }
    }
}

impl FileOpenAiConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroValue {
                    field: "provider.openai.timeout_secs".to_string(),
                },
                "provider.openai.timeout_secs is 0, every request will time out",
            ));
        }
        if self.max_tokens == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroValue {
                    field: "provider.openai.max_tokens".to_string(),
                },
                "provider.openai.max_tokens is 0",
            ));
        }
        issues
    }
}
