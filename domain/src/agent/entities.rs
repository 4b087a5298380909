//! Character agent entities

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Stable identifier of a character agent, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for AgentId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A character agent taking part in the story (Entity)
///
/// Everything except `is_producing` is fixed for the lifetime of a session.
/// `is_producing` is display-only state that is true while a generation call
/// for this agent is in flight; it is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub avatar: String,
    /// Used verbatim in the persona sent to the model.
    pub personality: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub preferred_model: Model,
    #[serde(skip)]
    pub is_producing: bool,
}

impl Agent {
    pub fn new(
        id: impl Into<AgentId>,
        name: impl Into<String>,
        role: impl Into<String>,
        personality: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            avatar: String::new(),
            personality: personality.into(),
            background: String::new(),
            goals: Vec::new(),
            preferred_model: Model::default(),
            is_producing: false,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_goals<I, S>(mut self, goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.goals = goals.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_preferred_model(mut self, model: impl Into<Model>) -> Self {
        self.preferred_model = model.into();
        self
    }

    /// Persona line injected as the system instruction of a model request.
    pub fn persona(&self) -> String {
        format!("You are {}, {}. {}", self.name, self.role, self.personality)
    }

    /// Status label shown next to the agent in the presentation layer.
    pub fn status_label(&self) -> &'static str {
        if self.is_producing {
            "Thinking..."
        } else {
            "Ready"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elara() -> Agent {
        Agent::new("agent_1", "Elara", "Elven Mage", "Wise and cautious.")
            .with_avatar("🧝")
            .with_goals(["Uncover ancient secrets"])
    }

    #[test]
    fn test_persona_includes_name_role_personality() {
        assert_eq!(
            elara().persona(),
            "You are Elara, Elven Mage. Wise and cautious."
        );
    }

    #[test]
    fn test_is_producing_not_serialized() {
        let mut agent = elara();
        agent.is_producing = true;

        let json = serde_json::to_value(&agent).unwrap();
        assert!(json.get("is_producing").is_none());
        assert_eq!(json["id"], "agent_1");

        let back: Agent = serde_json::from_value(json).unwrap();
        assert!(!back.is_producing);
        assert_eq!(back.goals, vec!["Uncover ancient secrets".to_string()]);
    }

    #[test]
    fn test_status_label() {
        let mut agent = elara();
        assert_eq!(agent.status_label(), "Ready");
        agent.is_producing = true;
        assert_eq!(agent.status_label(), "Thinking...");
    }
}
