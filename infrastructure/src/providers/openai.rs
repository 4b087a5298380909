//! OpenAI-compatible chat completions provider

use super::ProviderSetupError;
use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use taleweave_application::{ProviderError, ProviderKind, StoryProvider};
use taleweave_domain::{Agent, Model, StoryPromptTemplate};
use tracing::debug;

/// Client for the `/v1/chat/completions` endpoint.
///
/// The agent persona goes into the system message and the engine's prompt
/// into the user message. The model is the configured override, or the
/// agent's preferred model when none is set.
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model_override: Option<Model>,
    max_tokens: u32,
    temperature: f32,
}

/// Server root of `base_url`; both `https://host` and `https://host/v1` are accepted.
fn api_root(base_url: &str) -> &str {
    let root = base_url.trim_end_matches('/');
    root.strip_suffix("/v1").unwrap_or(root)
}

impl OpenAiProvider {
    pub fn new(
        config: &FileOpenAiConfig,
        api_key: impl Into<String>,
        model_override: Option<Model>,
    ) -> Result<Self, ProviderSetupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderSetupError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: api_root(&config.base_url).to_string(),
            api_key: api_key.into(),
            model_override,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, prompt: &str, agent: &Agent) -> ChatRequest {
        let model = self
            .model_override
            .as_ref()
            .unwrap_or(&agent.preferred_model)
            .to_string();

        ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(StoryPromptTemplate::persona_system(agent)),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(prompt.to_string()),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl StoryProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn generate(&self, prompt: &str, agent: &Agent) -> Result<String, ProviderError> {
        let request = self.build_request(prompt, agent);
        debug!("POST {} model={}", self.endpoint(), request.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                code: status.as_u16(),
                body,
            });
        }

        parse_response(&body)
    }
}

/// Extract the first choice's content, trimmed.
fn parse_response(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyResponse)?;

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content.trim().to_string()),
        _ => Err(ProviderError::EmptyResponse),
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elara() -> Agent {
        Agent::new(
            "agent_1",
            "Elara",
            "Elven Mage",
            "Wise and mysterious, speaks in riddles.",
        )
        .with_preferred_model("gpt-4")
    }

    fn provider(model_override: Option<Model>) -> OpenAiProvider {
        let config = FileOpenAiConfig {
            base_url: "http://localhost:9999/".to_string(),
            ..Default::default()
        };
        OpenAiProvider::new(&config, "sk-test", model_override).unwrap()
    }

    #[test]
    fn test_request_carries_persona_and_prompt() {
        let request = provider(None).build_request("Context: ...", &elara());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(
            json["messages"][0]["content"],
            "You are Elara, Elven Mage. Wise and mysterious, speaks in riddles."
        );
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Context: ...");
        assert!((json["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_model_override_wins() {
        let request = provider(Some(Model::from("gpt-4o-mini"))).build_request("p", &elara());
        assert_eq!(request.model, "gpt-4o-mini");
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        assert_eq!(
            provider(None).endpoint(),
            "http://localhost:9999/v1/chat/completions"
        );
    }

    #[test]
    fn test_endpoint_accepts_versioned_base_url() {
        let config = FileOpenAiConfig {
            base_url: "https://api.x.ai/v1/".to_string(),
            ..Default::default()
        };
        let provider = OpenAiProvider::new(&config, "sk-test", None).unwrap();
        assert_eq!(provider.endpoint(), "https://api.x.ai/v1/chat/completions");
        assert_eq!(api_root("http://localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn test_parse_first_choice_trimmed() {
        let body = r#"{"choices":[
            {"message":{"role":"assistant","content":"  The stars whisper.\n"}},
            {"message":{"role":"assistant","content":"ignored"}}
        ]}"#;
        assert_eq!(parse_response(body).unwrap(), "The stars whisper.");
    }

    #[test]
    fn test_parse_empty_choices() {
        assert_eq!(
            parse_response(r#"{"choices":[]}"#).unwrap_err(),
            ProviderError::EmptyResponse
        );
        assert_eq!(
            parse_response(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
                .unwrap_err(),
            ProviderError::EmptyResponse
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_response("<html>bad gateway</html>"),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let config = FileOpenAiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..Default::default()
        };
        let provider = OpenAiProvider::new(&config, "sk-test", None).unwrap();
        let err = provider.generate("p", &elara()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
