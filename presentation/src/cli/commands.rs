//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for taleweave
#[derive(Parser, Debug)]
#[command(name = "taleweave")]
#[command(author, version, about = "Interactive storytelling with AI character agents")]
#[command(long_about = r#"
Taleweave runs a story session in which AI character agents take turns
speaking while you act as narrator and director.

Each turn the next agent is chosen at random (never the one who just spoke),
receives the world state and the recent conversation, and replies in
character through the configured provider.

Configuration files are loaded from (in priority order):
1. TALEWEAVE_* environment variables
2. --config <path>       Explicit config file
3. ./taleweave.toml      Project-level config
4. ~/.config/taleweave/config.toml   Global config

Example:
  taleweave                          # interactive session with the mock provider
  taleweave --provider openai play
  taleweave run --turns 6 --export session.json
  taleweave oneshot '{"prompt": "Describe the ruins", "provider": "mock"}'
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Provider to start with (mock or openai); overrides the config file
    #[arg(short, long, value_name = "PROVIDER", global = true)]
    pub provider: Option<String>,

    /// Seed for turn selection and mock replies
    #[arg(long, value_name = "N", global = true)]
    pub seed: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive session (default)
    Play,

    /// Take a fixed number of turns without interaction, then print the log
    Run {
        /// Number of agent turns
        #[arg(short, long, default_value_t = 4)]
        turns: usize,

        /// Write the session to this JSON file afterwards
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },

    /// Answer a single JSON request: {"prompt": "...", "provider": "openai"|"mock"}
    Oneshot {
        /// Request document
        #[arg(value_name = "JSON")]
        input: Option<String>,
    },

    /// Write the opening state of a fresh session to a JSON file
    Export {
        /// Output path; defaults to story_session_<timestamp>.json in the current directory
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// The subcommand to run, `play` when none was given.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Play)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_play() {
        let cli = Cli::parse_from(["taleweave"]);
        assert_eq!(cli.resolved_command(), Command::Play);
        assert!(cli.provider.is_none());
    }

    #[test]
    fn test_run_with_global_options() {
        let cli = Cli::parse_from([
            "taleweave",
            "run",
            "--turns",
            "3",
            "--provider",
            "mock",
            "-vv",
        ]);
        assert_eq!(
            cli.resolved_command(),
            Command::Run {
                turns: 3,
                export: None
            }
        );
        assert_eq!(cli.provider.as_deref(), Some("mock"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_oneshot_takes_raw_json() {
        let cli = Cli::parse_from(["taleweave", "oneshot", r#"{"prompt":"hi"}"#]);
        assert_eq!(
            cli.resolved_command(),
            Command::Oneshot {
                input: Some(r#"{"prompt":"hi"}"#.to_string())
            }
        );
    }
}
