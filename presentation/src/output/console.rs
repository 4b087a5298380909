//! Console output formatter for story sessions

use chrono::Local;
use colored::Colorize;
use taleweave_domain::{Agent, Message, MessageKind, WorldState};

/// Formats messages, world state and the roster for console display
pub struct StoryFormatter;

impl StoryFormatter {
    /// Format one log entry, styled by kind.
    ///
    /// Dialogue lines carry the speaking agent's avatar when the speaker is
    /// on the roster.
    pub fn format_message(message: &Message, agents: &[Agent]) -> String {
        let local = message.timestamp.with_timezone(&Local);
        let time = format!("[{}]", local.format("%H:%M:%S")).dimmed();

        match message.kind {
            MessageKind::Dialogue if message.is_error() => format!(
                "{} {} {}",
                time,
                format!("{}:", message.speaker).red().bold(),
                message.content.red()
            ),
            MessageKind::Dialogue => {
                let avatar = agents
                    .iter()
                    .find(|a| a.name == message.speaker)
                    .map(|a| a.avatar.as_str())
                    .filter(|a| !a.is_empty());
                let speaker = match avatar {
                    Some(avatar) => format!("{} {}:", avatar, message.speaker),
                    None => format!("{}:", message.speaker),
                };
                format!("{} {} {}", time, speaker.yellow().bold(), message.content)
            }
            MessageKind::Narration => format!(
                "{} {} {}",
                time,
                format!("{}:", message.speaker).magenta().bold(),
                message.content.italic()
            ),
            MessageKind::Intervention => format!(
                "{} {} {}",
                time,
                format!("[{}]", message.speaker).cyan().bold(),
                message.content.cyan()
            ),
            MessageKind::System if message.is_error() => format!(
                "{} {} {}",
                time,
                "!".red().bold(),
                format!("{} ({})", message.content, message.speaker).red()
            ),
            MessageKind::System => format!("{} {}", time, message.content.dimmed()),
        }
    }

    /// World panel: scalar fields and active events.
    pub fn format_world(world: &WorldState) -> String {
        let mut output = Self::section_header("World State");
        for (label, value) in world.summary_lines() {
            output.push_str(&format!("  {} {}\n", format!("{}:", label).cyan(), value));
        }
        output
    }

    pub fn format_lore(world: &WorldState) -> String {
        let mut output = Self::section_header("Lore");
        if world.lore.is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for (topic, description) in &world.lore {
            output.push_str(&format!("  {} {}\n", format!("{}:", topic).bold(), description));
        }
        output
    }

    pub fn format_rules(world: &WorldState) -> String {
        let mut output = Self::section_header("Rules");
        if world.rules.is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for (i, rule) in world.rules.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, rule));
        }
        output
    }

    /// Roster with each agent's status.
    pub fn format_agents(agents: &[Agent]) -> String {
        let mut output = Self::section_header("Agents");
        for agent in agents {
            let status = if agent.is_producing {
                agent.status_label().yellow()
            } else {
                agent.status_label().green()
            };
            output.push_str(&format!(
                "  {} {} {} [{}]\n",
                agent.avatar,
                agent.name.bold(),
                format!("({})", agent.role).dimmed(),
                status
            ));
            if !agent.goals.is_empty() {
                output.push_str(&format!("      goals: {}\n", agent.goals.join("; ")));
            }
        }
        output
    }

    pub fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taleweave_domain::{MessageLog, Metadata, Scenario};

    fn plain() {
        colored::control::set_override(false);
    }

    fn agents() -> Vec<Agent> {
        Scenario::eldermoor().agents
    }

    #[test]
    fn test_dialogue_shows_avatar() {
        plain();
        let mut log = MessageLog::new();
        let message = log
            .append("Elara", "The stars whisper.", MessageKind::Dialogue, Metadata::new())
            .clone();
        let agents = agents();
        let line = StoryFormatter::format_message(&message, &agents);
        assert!(line.contains(&format!("{} Elara: The stars whisper.", agents[0].avatar)));
    }

    #[test]
    fn test_system_and_intervention_styles() {
        plain();
        let mut log = MessageLog::new();
        let system = log
            .append("System", "Session started.", MessageKind::System, Metadata::new())
            .clone();
        let director = log
            .append("Director", "A storm rolls in.", MessageKind::Intervention, Metadata::new())
            .clone();

        assert!(StoryFormatter::format_message(&system, &[]).ends_with("Session started."));
        assert!(
            StoryFormatter::format_message(&director, &[]).ends_with("[Director] A storm rolls in.")
        );
    }

    #[test]
    fn test_world_and_rules_panels() {
        plain();
        let world = Scenario::eldermoor().world;
        let panel = StoryFormatter::format_world(&world);
        assert!(panel.contains("Ancient Ruins of Eldermoor"));

        let rules = StoryFormatter::format_rules(&world);
        assert!(rules.contains(&format!("1. {}", world.rules[0])));
        assert!(StoryFormatter::format_lore(&WorldState::default()).contains("(none)"));
    }

    #[test]
    fn test_agent_status_labels() {
        plain();
        let mut agents = agents();
        agents[1].is_producing = true;
        let panel = StoryFormatter::format_agents(&agents);
        assert!(panel.contains("[Ready]"));
        assert!(panel.contains("[Thinking...]"));
    }
}
