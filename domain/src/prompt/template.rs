//! Prompt templates for the turn flow

use crate::agent::entities::Agent;
use crate::message::log::MessageLog;
use crate::world::state::WorldState;

/// Separator between the world header and the dialogue lines.
pub const CONTEXT_SEPARATOR: &str = "---";

/// Templates for building the text sent to a provider
pub struct StoryPromptTemplate;

impl StoryPromptTemplate {
    /// World header, separator, then the recent non-system log lines.
    pub fn conversation_context(world: &WorldState, log: &MessageLog, limit: usize) -> String {
        let mut parts = world.context_header();
        parts.push(CONTEXT_SEPARATOR.to_string());
        parts.extend(log.render_context(limit));
        parts.join("\n")
    }

    /// User prompt asking the agent for its next in-character line
    pub fn turn_prompt(agent: &Agent, context: &str) -> String {
        format!(
            r#"Context: {}

You are {}. Respond as your character would in this situation.
Keep your response to 1-2 sentences and stay in character."#,
            context, agent.name
        )
    }

    /// System instruction carrying the agent's persona
    pub fn persona_system(agent: &Agent) -> String {
        agent.persona()
    }

    /// Text recorded when a provider fails to produce a line
    pub fn failure_notice(error: &str) -> String {
        format!("Error generating response: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::entities::{MessageKind, Metadata};

    fn world() -> WorldState {
        WorldState {
            location: "The Deep Catacombs".to_string(),
            time_of_day: "Night".to_string(),
            mood: "Tense".to_string(),
            active_events: vec!["Bells toll".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_context_layout() {
        let mut log = MessageLog::new();
        log.append("Narrator", "Dust falls.", MessageKind::Narration, Metadata::new());
        log.append("System", "Session started.", MessageKind::System, Metadata::new());
        log.append("Marcus", "Stay close.", MessageKind::Dialogue, Metadata::new());

        let context = StoryPromptTemplate::conversation_context(&world(), &log, 10);
        assert_eq!(
            context,
            "Current Location: The Deep Catacombs\n\
             Time: Night\n\
             Mood: Tense\n\
             Active Events: Bells toll\n\
             ---\n\
             Narrator: Dust falls.\n\
             Marcus: Stay close."
        );
    }

    #[test]
    fn test_context_with_empty_log_ends_at_separator() {
        let context = StoryPromptTemplate::conversation_context(&world(), &MessageLog::new(), 10);
        assert!(context.ends_with("---"));
    }

    #[test]
    fn test_turn_prompt_mentions_agent_and_length() {
        let agent = Agent::new("agent_1", "Elara", "Elven Mage", "Wise.");
        let prompt = StoryPromptTemplate::turn_prompt(&agent, "Current Location: X");
        assert!(prompt.starts_with("Context: Current Location: X"));
        assert!(prompt.contains("You are Elara."));
        assert!(prompt.contains("1-2 sentences"));
    }

    #[test]
    fn test_failure_notice() {
        assert_eq!(
            StoryPromptTemplate::failure_notice("timeout"),
            "Error generating response: timeout"
        );
    }
}
