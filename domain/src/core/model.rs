//! Model value object representing a hosted model identifier

use serde::{Deserialize, Serialize};

/// Identifier of a hosted chat-completion model (Value Object)
///
/// Agents carry a preferred model; the hosted provider may override it
/// with a configured model for the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model(String);

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::new("gpt-3.5-turbo")
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::new(s.trim()))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_default() {
        assert_eq!(Model::default().as_str(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_model_serializes_as_plain_string() {
        let json = serde_json::to_string(&Model::new("grok-3")).unwrap();
        assert_eq!(json, "\"grok-3\"");
        let back: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Model::new("grok-3"));
    }
}
