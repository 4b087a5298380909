//! Auto-play driver
//!
//! Repeatedly takes turns while the session is active with auto-play on,
//! waiting the configured interval before each turn. The wait races a
//! [`CancellationToken`] so a front-end can stop the loop immediately.

use super::storytelling::{EngineError, StorytellingEngine, TurnOutcome};
use crate::ports::progress::TurnProgressNotifier;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Why the auto-play loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoPlayStop {
    /// The session was paused or auto-play was switched off.
    Halted,
    /// The cancellation token fired.
    Cancelled,
    /// The turn budget was used up.
    TurnLimit,
    /// No agent could take the next turn.
    NoSpeaker,
}

/// Summary of an auto-play run
#[derive(Debug, Clone, PartialEq)]
pub struct AutoPlayReport {
    pub turns: usize,
    pub failures: usize,
    pub stop: AutoPlayStop,
}

pub struct AutoPlayDriver {
    interval: Duration,
    max_turns: Option<usize>,
}

impl AutoPlayDriver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_turns: None,
        }
    }

    /// Use the interval configured on the engine.
    pub fn for_engine(engine: &StorytellingEngine) -> Self {
        Self::new(engine.params().auto_play_interval)
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub async fn run(
        &self,
        engine: &mut StorytellingEngine,
        progress: &dyn TurnProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<AutoPlayReport, EngineError> {
        let mut turns = 0;
        let mut failures = 0;

        let stop = loop {
            if self.max_turns.is_some_and(|max| turns >= max) {
                break AutoPlayStop::TurnLimit;
            }
            if !engine.session().auto_play_running() {
                break AutoPlayStop::Halted;
            }

            tokio::select! {
                _ = cancel.cancelled() => break AutoPlayStop::Cancelled,
                _ = tokio::time::sleep(self.interval) => {}
            }

            // Flags may have changed while waiting.
            if !engine.session().auto_play_running() {
                break AutoPlayStop::Halted;
            }

            match engine.take_turn_with_progress(progress).await? {
                Some(outcome) => {
                    turns += 1;
                    if let TurnOutcome::Failed { .. } = outcome {
                        failures += 1;
                    }
                    debug!("Auto-play turn {} complete", turns);
                }
                None => break AutoPlayStop::NoSpeaker,
            }
        };

        info!(
            "Auto-play stopped ({:?}) after {} turns, {} failed",
            stop, turns, failures
        );
        Ok(AutoPlayReport {
            turns,
            failures,
            stop,
        })
    }

    /// Take up to `n` turns back to back, ignoring the auto-play flag.
    ///
    /// The interval is waited between turns, not before the first one. Still
    /// requires an active session.
    pub async fn run_turns(
        &self,
        engine: &mut StorytellingEngine,
        n: usize,
        progress: &dyn TurnProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<AutoPlayReport, EngineError> {
        let mut turns = 0;
        let mut failures = 0;

        let stop = loop {
            if turns >= n {
                break AutoPlayStop::TurnLimit;
            }
            if !engine.is_active() {
                break AutoPlayStop::Halted;
            }
            if turns > 0 {
                tokio::select! {
                    _ = cancel.cancelled() => break AutoPlayStop::Cancelled,
                    _ = tokio::time::sleep(self.interval) => {}
                }
            } else if cancel.is_cancelled() {
                break AutoPlayStop::Cancelled;
            }

            match engine.take_turn_with_progress(progress).await? {
                Some(outcome) => {
                    turns += 1;
                    if outcome.is_failed() {
                        failures += 1;
                    }
                }
                None => break AutoPlayStop::NoSpeaker,
            }
        };

        debug!("Bounded run finished ({:?}) after {} turns", stop, turns);
        Ok(AutoPlayReport {
            turns,
            failures,
            stop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineParams;
    use crate::ports::progress::NoProgress;
    use crate::ports::story_provider::{ProviderError, ProviderKind, StoryProvider};
    use async_trait::async_trait;
    use std::sync::Arc;
    use taleweave_domain::{Agent, AgentRegistry, MessageKind, Session, WorldState};

    struct LineProvider;

    #[async_trait]
    impl StoryProvider for LineProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Mock
        }

        async fn generate(&self, _prompt: &str, agent: &Agent) -> Result<String, ProviderError> {
            Ok(format!("{} nods.", agent.name))
        }
    }

    fn engine(agents: Vec<Agent>) -> StorytellingEngine {
        let session = Session::new(WorldState::default(), AgentRegistry::new(agents).unwrap());
        StorytellingEngine::new(session, Arc::new(LineProvider), EngineParams::default())
            .with_seed(3)
    }

    fn pair() -> Vec<Agent> {
        vec![
            Agent::new("agent_1", "Elara", "Elven Mage", "Wise."),
            Agent::new("agent_2", "Marcus", "Human Warrior", "Brave."),
        ]
    }

    fn driver() -> AutoPlayDriver {
        AutoPlayDriver::new(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_does_nothing_unless_running() {
        let mut engine = engine(pair());
        engine.set_auto_play(true);

        let report = driver()
            .run(&mut engine, &NoProgress, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.stop, AutoPlayStop::Halted);
        assert_eq!(report.turns, 0);
        assert!(engine.messages().is_empty());
    }

    #[tokio::test]
    async fn test_runs_until_turn_limit_alternating() {
        let mut engine = engine(pair());
        engine.set_active(true);
        engine.set_auto_play(true);

        let report = driver()
            .with_max_turns(6)
            .run(&mut engine, &NoProgress, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.stop, AutoPlayStop::TurnLimit);
        assert_eq!(report.turns, 6);
        assert_eq!(report.failures, 0);

        let speakers: Vec<_> = engine
            .messages()
            .iter()
            .filter(|m| m.kind == MessageKind::Dialogue)
            .map(|m| m.speaker.as_str())
            .collect();
        assert_eq!(speakers.len(), 6);
        assert!(speakers.windows(2).all(|w| w[0] != w[1]));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_turn() {
        let mut engine = engine(pair());
        engine.set_active(true);
        engine.set_auto_play(true);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let report = AutoPlayDriver::new(Duration::from_secs(60))
            .run(&mut engine, &NoProgress, &cancel)
            .await
            .unwrap();
        assert_eq!(report.stop, AutoPlayStop::Cancelled);
        assert_eq!(report.turns, 0);
    }

    #[tokio::test]
    async fn test_run_turns_ignores_auto_play_flag() {
        let mut engine = engine(pair());
        engine.set_active(true);
        assert!(!engine.auto_play());

        let report = driver()
            .run_turns(&mut engine, 3, &NoProgress, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.turns, 3);
        assert_eq!(report.stop, AutoPlayStop::TurnLimit);
    }

    #[tokio::test]
    async fn test_run_turns_on_paused_session() {
        let mut engine = engine(pair());
        let report = driver()
            .run_turns(&mut engine, 3, &NoProgress, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.turns, 0);
        assert_eq!(report.stop, AutoPlayStop::Halted);
    }

    #[tokio::test]
    async fn test_single_agent_stops_with_no_speaker() {
        let mut engine = engine(vec![Agent::new("solo", "Elara", "Elven Mage", "Wise.")]);
        engine.set_active(true);
        engine.set_auto_play(true);

        let report = driver()
            .run(&mut engine, &NoProgress, &CancellationToken::new())
            .await
            .unwrap();
        // "Session started." lets Elara speak once; then nobody else can.
        assert_eq!(report.turns, 1);
        assert_eq!(report.stop, AutoPlayStop::NoSpeaker);
    }
}
