//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod provider;
mod session;

pub use logging::FileLoggingConfig;
pub use provider::{FileMockConfig, FileOpenAiConfig, FileProviderConfig};
pub use session::FileSessionConfig;

use serde::{Deserialize, Serialize};
use taleweave_domain::scenario::QuoteTable;
use taleweave_domain::{Agent, ConfigIssue, ConfigIssueCode, Scenario, WorldState};

/// Complete file configuration (raw TOML structure)
///
/// `agents`, `world` and `quotes` override the built-in Eldermoor scenario
/// when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider selection and backend settings
    pub provider: FileProviderConfig,
    /// Turn loop settings
    pub session: FileSessionConfig,
    /// Transcript and diagnostic log output
    pub logging: FileLoggingConfig,
    /// Roster override (`[[agents]]`)
    pub agents: Option<Vec<Agent>>,
    /// Starting world override (`[world]`)
    pub world: Option<WorldState>,
    /// Mock quote table entries (`[quotes]`), merged over the scenario's
    pub quotes: QuoteTable,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.provider.parse_kind().1);
        issues.extend(self.provider.mock.validate());
        issues.extend(self.provider.openai.validate());
        issues.extend(self.session.to_engine_params().1);

        if self.agents.as_ref().is_some_and(|agents| agents.is_empty()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyRoster,
                "agents: the roster is empty, no agent can take a turn",
            ));
        }

        issues
    }

    /// Build the starting scenario: the built-in one with file overrides applied.
    pub fn scenario(&self) -> Scenario {
        let mut scenario = Scenario::eldermoor();

        if let Some(agents) = &self.agents {
            scenario.agents = agents.clone();
        }
        if let Some(world) = &self.world {
            scenario.world = world.clone();
        }
        if let Some(opening) = &self.session.opening_narration {
            scenario.opening_narration = (!opening.trim().is_empty()).then(|| opening.clone());
        }
        scenario.quotes.extend(self.quotes.clone());

        scenario
    }
}
