//! Storytelling engine use case
//!
//! Orchestrates a story session: builds prompt context from the message log
//! and world state, picks the next speaker, invokes the provider, and appends
//! the result. The engine is the only component that touches both the log
//! and the provider.
//!
//! # Turn flow
//!
//! ```text
//! idle ──select_next_agent()──▶ selecting
//!      ──generate_agent_response()──▶ producing (agent.is_producing = true)
//!      ──provider returns / fails / panics──▶ appended (agent.is_producing = false)
//! ```

use crate::config::{EngineParams, FailurePolicy};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, events,
};
use crate::ports::progress::{NoProgress, TurnProgressNotifier};
use crate::ports::story_provider::{ProviderKind, StoryProvider};
use futures::FutureExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde_json::{Value, json};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use taleweave_domain::message::entities::{AGENT_ID_KEY, ERROR_KEY};
use taleweave_domain::util::preview;
use taleweave_domain::{
    Agent, AgentId, AgentRegistry, DomainError, Message, MessageKind, Metadata, Scenario, Session,
    SessionSnapshot, StoryPromptTemplate, WorldField, WorldState, WorldUpdate,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Speaker used for narrator prose.
pub const NARRATOR: &str = "Narrator";
/// Speaker used for out-of-character director notes.
pub const DIRECTOR: &str = "Director";
/// Speaker used for audit entries.
pub const SYSTEM: &str = "System";

/// Errors surfaced by engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::Domain(e) if e.is_not_found())
    }
}

/// Result of one generation turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The provider produced a line; it was appended as dialogue.
    Spoken(Message),
    /// The provider failed; the failure was recorded per [`FailurePolicy`].
    Failed { message: Message, error: String },
}

impl TurnOutcome {
    /// The message appended by this turn.
    pub fn message(&self) -> &Message {
        match self {
            TurnOutcome::Spoken(message) => message,
            TurnOutcome::Failed { message, .. } => message,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TurnOutcome::Failed { .. })
    }
}

/// The storytelling engine: one session plus the provider that voices it.
pub struct StorytellingEngine {
    session: Session,
    provider: Arc<dyn StoryProvider>,
    params: EngineParams,
    rng: StdRng,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl StorytellingEngine {
    pub fn new(session: Session, provider: Arc<dyn StoryProvider>, params: EngineParams) -> Self {
        Self {
            session,
            provider,
            params,
            rng: StdRng::from_entropy(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Open a session from a scenario, appending its opening narration.
    pub fn from_scenario(
        scenario: Scenario,
        provider: Arc<dyn StoryProvider>,
        params: EngineParams,
    ) -> Result<Self, EngineError> {
        let agents = AgentRegistry::new(scenario.agents)?;
        let mut engine = Self::new(Session::new(scenario.world, agents), provider, params);
        if let Some(opening) = scenario.opening_narration {
            engine.narrate(opening);
        }
        Ok(engine)
    }

    /// Seed the turn-selection RNG (reproducible sessions and tests).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    // ==================== Read access ====================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn messages(&self) -> &[Message] {
        self.session.log.as_slice()
    }

    pub fn world_state(&self) -> &WorldState {
        &self.session.world
    }

    pub fn agents(&self) -> &[Agent] {
        self.session.agents.all()
    }

    pub fn agent(&self, id: &AgentId) -> Result<&Agent, EngineError> {
        Ok(self.session.agents.by_id(id)?)
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    pub fn auto_play(&self) -> bool {
        self.session.auto_play
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    // ==================== Configuration ====================

    /// Swap the provider. The session (log, world, roster) is untouched.
    pub fn set_provider(&mut self, provider: Arc<dyn StoryProvider>) {
        let from = self.provider.kind();
        self.provider = provider;
        info!("Provider switched from {} to {}", from, self.provider.kind());
        self.conversation_logger.log(ConversationEvent::new(
            events::PROVIDER_CHANGED,
            json!({ "from": from.as_str(), "to": self.provider.kind().as_str() }),
        ));
    }

    /// Start or pause the session. A change is announced with a system message.
    pub fn set_active(&mut self, active: bool) {
        if self.session.active == active {
            return;
        }
        self.session.active = active;
        let status = if active { "started" } else { "paused" };
        info!("Session {}", status);
        self.system_notice(format!("Session {}.", status));
        self.log_session_state();
    }

    /// Flip the active flag; returns the new value.
    pub fn toggle_active(&mut self) -> bool {
        self.set_active(!self.session.active);
        self.session.active
    }

    pub fn set_auto_play(&mut self, auto_play: bool) {
        if self.session.auto_play != auto_play {
            self.session.auto_play = auto_play;
            debug!("Auto-play set to {}", auto_play);
            self.log_session_state();
        }
    }

    // ==================== Message log ====================

    /// Append a message to the log.
    pub fn add_message(
        &mut self,
        speaker: impl Into<String>,
        content: impl Into<String>,
        kind: MessageKind,
        metadata: Metadata,
    ) -> &Message {
        let message = self.session.log.append(speaker, content, kind, metadata);
        debug!(
            "Appended {} from {}: {}",
            message.kind,
            message.speaker,
            preview(&message.content, 80)
        );
        self.conversation_logger.log(ConversationEvent::new(
            events::MESSAGE_APPENDED,
            message_payload(message),
        ));
        message
    }

    /// Narrator prose.
    pub fn narrate(&mut self, content: impl Into<String>) -> &Message {
        self.add_message(NARRATOR, content, MessageKind::Narration, Metadata::new())
    }

    /// Out-of-character director note.
    pub fn intervene(&mut self, content: impl Into<String>) -> &Message {
        self.add_message(DIRECTOR, content, MessageKind::Intervention, Metadata::new())
    }

    /// Audit entry; never part of the model context.
    pub fn system_notice(&mut self, content: impl Into<String>) -> &Message {
        self.add_message(SYSTEM, content, MessageKind::System, Metadata::new())
    }

    /// Rendered context: world header, separator, recent dialogue lines.
    pub fn conversation_context(&self) -> String {
        self.conversation_context_with_limit(self.params.context_limit)
    }

    pub fn conversation_context_with_limit(&self, limit: usize) -> String {
        StoryPromptTemplate::conversation_context(&self.session.world, &self.session.log, limit)
    }

    // ==================== World state ====================

    /// Merge a partial update into the world. Appends nothing to the log.
    pub fn update_world_state(&mut self, update: WorldUpdate) {
        let fields: Vec<&str> = update.changed_fields().iter().map(|f| f.as_str()).collect();
        if fields.is_empty() {
            return;
        }
        info!("World update: {}", fields.join(", "));
        self.conversation_logger.log(ConversationEvent::new(
            events::WORLD_UPDATED,
            json!({ "fields": fields, "update": update }),
        ));
        self.session.world.apply_update(update);
    }

    /// Name-keyed variant of [`update_world_state`](Self::update_world_state).
    ///
    /// Unrecognized names are ignored. Returns the fields that were applied.
    pub fn update_world_fields<I, K>(&mut self, fields: I) -> Vec<WorldField>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let fields: Vec<(K, Value)> = fields.into_iter().collect();
        for (name, _) in &fields {
            if name.as_ref().parse::<WorldField>().is_err() {
                debug!("Ignoring unknown world field '{}'", name.as_ref());
            }
        }
        let update = WorldUpdate::from_fields(fields);
        let applied = update.changed_fields();
        self.update_world_state(update);
        applied
    }

    // ==================== Turns ====================

    /// Pick who speaks next.
    ///
    /// With an empty log the first registered agent opens the story. Otherwise
    /// one agent whose name differs from the last speaker is chosen uniformly
    /// at random. `None` only if no such agent exists.
    pub fn select_next_agent(&mut self) -> Option<&Agent> {
        let agents = &self.session.agents;
        let Some(last) = self.session.log.last() else {
            return agents.first();
        };

        let candidates: Vec<&Agent> = agents.others_than(&last.speaker).collect();
        candidates.choose(&mut self.rng).copied()
    }

    /// Generate and append the next line for `agent_id`.
    pub async fn generate_agent_response(
        &mut self,
        agent_id: &AgentId,
    ) -> Result<TurnOutcome, EngineError> {
        self.generate_agent_response_with_progress(agent_id, &NoProgress)
            .await
    }

    /// Generate and append the next line for `agent_id`, with progress callbacks.
    ///
    /// An unknown id fails with `AgentNotFound`. Provider errors never escape:
    /// they are recorded per the configured [`FailurePolicy`]. The agent's
    /// `is_producing` flag is cleared on every path, including a panic inside
    /// the provider, which is resumed after the flag is reset.
    pub async fn generate_agent_response_with_progress(
        &mut self,
        agent_id: &AgentId,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnOutcome, EngineError> {
        self.session.agents.set_producing(agent_id, true)?;
        let agent = self.session.agents.by_id(agent_id)?.clone();
        progress.on_turn_start(&agent);

        let context = self.conversation_context();
        let prompt = StoryPromptTemplate::turn_prompt(&agent, &context);
        debug!(
            "Generating for {} via {} ({} context bytes)",
            agent.name,
            self.provider.kind(),
            context.len()
        );

        let provider = Arc::clone(&self.provider);
        let result = AssertUnwindSafe(provider.generate(&prompt, &agent))
            .catch_unwind()
            .await;

        self.session.agents.set_producing(agent_id, false)?;

        let result = match result {
            Ok(result) => result,
            Err(panic) => {
                warn!("Provider panicked while generating for {}", agent.name);
                std::panic::resume_unwind(panic)
            }
        };

        let mut metadata = Metadata::new();
        metadata.insert(AGENT_ID_KEY.to_string(), agent.id.to_string());

        let outcome = match result {
            Ok(text) => {
                info!("{} speaks: {}", agent.name, preview(&text, 60));
                let message = self
                    .add_message(agent.name.clone(), text, MessageKind::Dialogue, metadata)
                    .clone();
                self.conversation_logger.log(ConversationEvent::new(
                    events::TURN_COMPLETED,
                    json!({ "agent_id": agent.id.as_str(), "message_id": message.id.as_str() }),
                ));
                progress.on_turn_complete(&agent, &message);
                TurnOutcome::Spoken(message)
            }
            Err(e) => {
                let error = e.to_string();
                warn!("Generation failed for {}: {}", agent.name, error);
                metadata.insert(ERROR_KEY.to_string(), "true".to_string());
                let kind = match self.params.failure_policy {
                    FailurePolicy::SystemMessage => MessageKind::System,
                    FailurePolicy::Narrative => MessageKind::Dialogue,
                };
                let message = self
                    .add_message(
                        agent.name.clone(),
                        StoryPromptTemplate::failure_notice(&error),
                        kind,
                        metadata,
                    )
                    .clone();
                self.conversation_logger.log(ConversationEvent::new(
                    events::TURN_FAILED,
                    json!({ "agent_id": agent.id.as_str(), "error": error }),
                ));
                progress.on_turn_failed(&agent, &message, &error);
                TurnOutcome::Failed { message, error }
            }
        };

        Ok(outcome)
    }

    /// One full turn: select the next agent and let it speak.
    ///
    /// Returns `Ok(None)` when the session is paused or nobody can speak.
    pub async fn take_turn(&mut self) -> Result<Option<TurnOutcome>, EngineError> {
        self.take_turn_with_progress(&NoProgress).await
    }

    pub async fn take_turn_with_progress(
        &mut self,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<Option<TurnOutcome>, EngineError> {
        if !self.session.active {
            debug!("Turn skipped: session is not active");
            return Ok(None);
        }
        let Some(agent_id) = self.select_next_agent().map(|a| a.id.clone()) else {
            debug!("Turn skipped: no agent available");
            return Ok(None);
        };
        self.generate_agent_response_with_progress(&agent_id, progress)
            .await
            .map(Some)
    }

    // ==================== Export ====================

    pub fn export_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.session)
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        self.export_snapshot().to_json_pretty()
    }

    fn log_session_state(&self) {
        self.conversation_logger.log(ConversationEvent::new(
            events::SESSION_STATE,
            json!({ "active": self.session.active, "auto_play": self.session.auto_play }),
        ));
    }
}

fn message_payload(message: &Message) -> Value {
    json!({
        "id": message.id.as_str(),
        "speaker": message.speaker,
        "kind": message.kind.as_str(),
        "content": message.content,
        "metadata": message.metadata,
    })
}
