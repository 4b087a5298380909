//! One-shot prompt invocation
//!
//! Takes `{"prompt": "...", "provider": "openai"|"mock"}` and answers with
//! `{"response": "..."}` or `{"error": "..."}`. Every failure is reported in
//! the result; nothing is raised to the caller.

use crate::providers::ProviderFactory;
use serde::{Deserialize, Serialize};
use taleweave_application::ProviderKind;
use taleweave_domain::Agent;
use tracing::debug;

pub const USAGE: &str =
    r#"No input data provided. Usage: taleweave oneshot '{"prompt": "your prompt", "provider": "openai"}'"#;

#[derive(Debug, Deserialize)]
struct OneshotRequest {
    prompt: Option<String>,
    #[serde(default = "default_provider")]
    provider: String,
}

fn default_provider() -> String {
    ProviderKind::OpenAi.as_str().to_string()
}

/// Result document of a one-shot call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneshotResult {
    Response(String),
    Error(String),
}

impl OneshotResult {
    pub fn to_json(&self) -> String {
        // A single string field always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"serialization failed"}"#.into())
    }
}

/// Persona used for prompts that do not come from a session.
fn oneshot_agent() -> Agent {
    Agent::new(
        "oneshot",
        "Narrator",
        "storyteller",
        "You answer the prompt directly and concisely.",
    )
}

pub async fn run_oneshot(input: &str, factory: &ProviderFactory) -> OneshotResult {
    if input.trim().is_empty() {
        return OneshotResult::Error(USAGE.to_string());
    }

    let request: OneshotRequest = match serde_json::from_str(input) {
        Ok(request) => request,
        Err(e) => {
            debug!("Invalid one-shot input: {}", e);
            return OneshotResult::Error("Invalid JSON input.".to_string());
        }
    };

    let Some(prompt) = request.prompt.filter(|p| !p.trim().is_empty()) else {
        return OneshotResult::Error("Prompt text is missing.".to_string());
    };

    let provider = match factory.build_named(&request.provider) {
        Ok(provider) => provider,
        Err(e) => return OneshotResult::Error(e.to_string()),
    };

    match provider.generate(&prompt, &oneshot_agent()).await {
        Ok(text) => OneshotResult::Response(text),
        Err(e) => OneshotResult::Error(e.to_string()),
    }
}
