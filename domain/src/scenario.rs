//! Built-in starting scenario
//!
//! The ruins of Eldermoor with two adventurers. Used when configuration does
//! not supply its own roster or world, and as fixture data in tests.

use crate::agent::entities::Agent;
use crate::world::state::WorldState;
use std::collections::BTreeMap;

/// Canned lines per agent name, consumed by the mock provider.
pub type QuoteTable = BTreeMap<String, Vec<String>>;

/// Everything needed to open a session
#[derive(Debug, Clone)]
pub struct Scenario {
    pub agents: Vec<Agent>,
    pub world: WorldState,
    pub opening_narration: Option<String>,
    pub quotes: QuoteTable,
}

impl Scenario {
    pub fn eldermoor() -> Self {
        Self {
            agents: eldermoor_agents(),
            world: eldermoor_world(),
            opening_narration: Some(
                "Welcome to the Ancient Ruins of Eldermoor. Two adventurers stand at the \
                 entrance of a mysterious temple, moonlight casting eerie shadows across \
                 crumbling stone pillars..."
                    .to_string(),
            ),
            quotes: eldermoor_quotes(),
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::eldermoor()
    }
}

fn eldermoor_agents() -> Vec<Agent> {
    vec![
        Agent::new(
            "agent_1",
            "Elara",
            "Elven Mage",
            "Wise, mystical, and cautious. Speaks with ancient wisdom and notices magical phenomena.",
        )
        .with_avatar("🧝‍♀️")
        .with_background(
            "A centuries-old elf who has studied the arcane arts in the hidden libraries of Rivendell.",
        )
        .with_goals([
            "Uncover ancient secrets",
            "Protect magical artifacts",
            "Guide companions safely",
        ]),
        Agent::new(
            "agent_2",
            "Marcus",
            "Human Warrior",
            "Brave, direct, and protective. Values honor and loyalty above all else.",
        )
        .with_avatar("⚔️")
        .with_background("A seasoned knight who has defended the realm against countless threats.")
        .with_goals(["Protect the innocent", "Defeat evil", "Maintain honor"]),
    ]
}

fn eldermoor_world() -> WorldState {
    WorldState {
        location: "Ancient Ruins of Eldermoor".to_string(),
        time_of_day: "Night".to_string(),
        weather: "Clear, moonlit sky".to_string(),
        mood: "Tense and mysterious".to_string(),
        active_events: vec![
            "Mysterious shadows moving".to_string(),
            "Ancient magic stirring".to_string(),
        ],
        lore: BTreeMap::from([
            (
                "Eldermoor".to_string(),
                "Once a great city, now ruins filled with forgotten magic".to_string(),
            ),
            (
                "The Temple".to_string(),
                "Said to house an artifact of immense power".to_string(),
            ),
            (
                "The Curse".to_string(),
                "Legend speaks of a curse that befell the city centuries ago".to_string(),
            ),
        ]),
        rules: vec![
            "Magic is unpredictable in these ruins".to_string(),
            "The dead do not rest easy here".to_string(),
            "Ancient traps still function".to_string(),
        ],
    }
}

fn eldermoor_quotes() -> QuoteTable {
    let lines = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    BTreeMap::from([
        (
            "Elara".to_string(),
            lines(&[
                "The ancient magic still flows through these ruins, whispering secrets of forgotten times.",
                "I sense a presence here... something watching us from the shadows.",
                "My elven senses detect traces of old enchantments woven into these stones.",
                "The moonlight reveals runes that speak of a great battle fought here long ago.",
                "Perhaps we should tread carefully - the spirits of this place seem restless.",
            ]),
        ),
        (
            "Marcus".to_string(),
            lines(&[
                "My sword arm grows tense. There's danger lurking in these halls.",
                "I've faced many foes, but something about this place chills my warrior's heart.",
                "The shadows move strangely here. We should stay alert and ready for battle.",
                "These ruins have seen too much bloodshed. I can feel the weight of history.",
                "Whatever evil once dwelt here may yet linger. We must be prepared.",
            ]),
        ),
    ])
}
