//! Progress notification port
//!
//! Defines the interface for reporting turn progress to a front-end.

use taleweave_domain::{Agent, Message};

/// Callback for progress updates during a turn
///
/// Implementations live in the presentation layer (spinners, re-rendering).
pub trait TurnProgressNotifier: Send + Sync {
    /// Called after the agent is marked as producing, before the provider call
    fn on_turn_start(&self, agent: &Agent);

    /// Called after the agent's line has been appended
    fn on_turn_complete(&self, agent: &Agent, message: &Message);

    /// Called after a provider failure has been recorded as `message`
    fn on_turn_failed(&self, _agent: &Agent, _message: &Message, _error: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl TurnProgressNotifier for NoProgress {
    fn on_turn_start(&self, _agent: &Agent) {}
    fn on_turn_complete(&self, _agent: &Agent, _message: &Message) {}
}
