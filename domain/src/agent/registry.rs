//! Fixed roster of character agents

use super::entities::{Agent, AgentId};
use crate::core::error::DomainError;
use std::collections::HashSet;

/// Registry of the agents taking part in a session.
///
/// The roster is fixed at construction; the only permitted mutation is
/// toggling an agent's transient `is_producing` flag.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl AgentRegistry {
    /// Build a registry, rejecting duplicate ids.
    pub fn new(agents: Vec<Agent>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for agent in &agents {
            if !seen.insert(agent.id.clone()) {
                return Err(DomainError::DuplicateAgent(agent.id.to_string()));
            }
        }
        Ok(Self { agents })
    }

    /// All agents in registration order.
    pub fn all(&self) -> &[Agent] {
        &self.agents
    }

    pub fn first(&self) -> Option<&Agent> {
        self.agents.first()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn by_id(&self, id: &AgentId) -> Result<&Agent, DomainError> {
        self.agents
            .iter()
            .find(|a| &a.id == id)
            .ok_or_else(|| DomainError::AgentNotFound(id.to_string()))
    }

    /// Look up an agent by display name (speakers are recorded by name).
    pub fn by_name(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn set_producing(&mut self, id: &AgentId, producing: bool) -> Result<(), DomainError> {
        let agent = self
            .agents
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| DomainError::AgentNotFound(id.to_string()))?;
        agent.is_producing = producing;
        Ok(())
    }

    /// Agents whose display name differs from `speaker`, in registration order.
    pub fn others_than<'a>(&'a self, speaker: &'a str) -> impl Iterator<Item = &'a Agent> + 'a {
        self.agents.iter().filter(move |a| a.name != speaker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AgentRegistry {
        AgentRegistry::new(vec![
            Agent::new("agent_1", "Elara", "Elven Mage", "Wise."),
            Agent::new("agent_2", "Marcus", "Human Warrior", "Brave."),
        ])
        .unwrap()
    }

    #[test]
    fn test_by_id_found() {
        let reg = registry();
        assert_eq!(reg.by_id(&AgentId::new("agent_2")).unwrap().name, "Marcus");
    }

    #[test]
    fn test_by_id_missing_is_not_found() {
        let reg = registry();
        let err = reg.by_id(&AgentId::new("agent_9")).unwrap_err();
        assert_eq!(err, DomainError::AgentNotFound("agent_9".to_string()));
    }

    #[test]
    fn test_all_preserves_registration_order() {
        let reg = registry();
        let names: Vec<_> = reg.all().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Elara", "Marcus"]);
        assert_eq!(reg.first().unwrap().name, "Elara");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = AgentRegistry::new(vec![
            Agent::new("a", "One", "r", "p"),
            Agent::new("a", "Two", "r", "p"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            DomainError::DuplicateAgent("a".to_string())
        );
    }

    #[test]
    fn test_set_producing_toggles_only_target() {
        let mut reg = registry();
        reg.set_producing(&AgentId::new("agent_1"), true).unwrap();
        assert!(reg.all()[0].is_producing);
        assert!(!reg.all()[1].is_producing);

        reg.set_producing(&AgentId::new("agent_1"), false).unwrap();
        assert!(!reg.all()[0].is_producing);

        assert!(reg.set_producing(&AgentId::new("nope"), true).is_err());
    }

    #[test]
    fn test_others_than_excludes_speaker() {
        let reg = registry();
        let others: Vec<_> = reg.others_than("Elara").map(|a| a.name.clone()).collect();
        assert_eq!(others, vec!["Marcus".to_string()]);
        assert_eq!(reg.others_than("Narrator").count(), 2);
    }
}
