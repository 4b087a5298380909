//! Session entity

use crate::agent::registry::AgentRegistry;
use crate::message::log::MessageLog;
use crate::world::state::WorldState;

/// A running story session (Entity)
///
/// Created once per logical session and handed by `&mut` to whoever drives
/// it. Sessions never share state with each other.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub world: WorldState,
    pub agents: AgentRegistry,
    pub log: MessageLog,
    /// Whether turn generation is permitted.
    pub active: bool,
    /// Whether turns are generated on a fixed cadence.
    pub auto_play: bool,
}

impl Session {
    pub fn new(world: WorldState, agents: AgentRegistry) -> Self {
        Self {
            world,
            agents,
            log: MessageLog::new(),
            active: false,
            auto_play: false,
        }
    }

    /// Whether the auto-play cadence should currently produce turns.
    pub fn auto_play_running(&self) -> bool {
        self.active && self.auto_play
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new(WorldState::default(), AgentRegistry::default());
        assert!(!session.active);
        assert!(!session.auto_play);
        assert!(session.log.is_empty());
    }

    #[test]
    fn test_auto_play_requires_both_flags() {
        let mut session = Session::default();
        session.auto_play = true;
        assert!(!session.auto_play_running());
        session.active = true;
        assert!(session.auto_play_running());
    }
}
