//! Export document for a session

use super::entities::Session;
use crate::agent::entities::Agent;
use crate::message::entities::Message;
use crate::world::state::WorldState;
use serde::{Deserialize, Serialize};

/// Snapshot of a session: the ordered messages, the world and the roster.
///
/// Transient agent state is not part of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub world_state: WorldState,
    pub agents: Vec<Agent>,
}

impl SessionSnapshot {
    pub fn capture(session: &Session) -> Self {
        Self {
            messages: session.log.as_slice().to_vec(),
            world_state: session.world.clone(),
            agents: session
                .agents
                .all()
                .iter()
                .cloned()
                .map(|mut a| {
                    a.is_producing = false;
                    a
                })
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::entities::AgentId;
    use crate::agent::registry::AgentRegistry;
    use crate::message::entities::{MessageKind, Metadata};
    use std::collections::BTreeMap;

    fn session() -> Session {
        let agents = AgentRegistry::new(vec![
            Agent::new("agent_1", "Elara", "Elven Mage", "Wise.").with_goals(["Guide"]),
            Agent::new("agent_2", "Marcus", "Human Warrior", "Brave."),
        ])
        .unwrap();
        let world = WorldState {
            location: "Eldermoor".to_string(),
            lore: BTreeMap::from([("The Curse".to_string(), "Old".to_string())]),
            rules: vec!["Magic is unpredictable".to_string()],
            ..Default::default()
        };
        let mut session = Session::new(world, agents);
        session
            .log
            .append("Narrator", "Welcome.", MessageKind::Narration, Metadata::new());
        session.log.append(
            "Elara",
            "I sense a presence.",
            MessageKind::Dialogue,
            Metadata::from([("agent_id".to_string(), "agent_1".to_string())]),
        );
        session
    }

    #[test]
    fn test_export_roundtrip_preserves_structure() {
        let mut session = session();
        session
            .agents
            .set_producing(&AgentId::new("agent_2"), true)
            .unwrap();

        let snapshot = SessionSnapshot::capture(&session);
        let json = snapshot.to_json_pretty().unwrap();
        let back = SessionSnapshot::from_json(&json).unwrap();

        assert_eq!(back.messages, session.log.as_slice());
        assert_eq!(back.world_state, session.world);
        let names: Vec<_> = back.agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Elara", "Marcus"]);
        assert!(back.agents.iter().all(|a| !a.is_producing));
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_export_has_three_named_fields() {
        let json = SessionSnapshot::capture(&session()).to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(obj.contains_key("messages"));
        assert!(obj.contains_key("world_state"));
        assert!(obj.contains_key("agents"));
        assert!(value["messages"][0]["timestamp"].is_string());
        assert!(value["agents"][1].get("is_producing").is_none());
    }
}
