//! Progress reporting for story turns

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use taleweave_application::TurnProgressNotifier;
use taleweave_domain::{Agent, Message};

/// Shows a spinner while an agent is producing its line
pub struct TurnSpinner {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TurnSpinner {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn take(&self) -> Option<ProgressBar> {
        self.spinner.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl Default for TurnSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for TurnSpinner {
    fn on_turn_start(&self, agent: &Agent) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("{} {}", agent.avatar, agent.name));
        pb.set_message(agent.status_label());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(pb);
        }
    }

    fn on_turn_complete(&self, _agent: &Agent, _message: &Message) {
        if let Some(pb) = self.take() {
            pb.finish_and_clear();
        }
    }

    fn on_turn_failed(&self, agent: &Agent, _message: &Message, error: &str) {
        if let Some(pb) = self.take() {
            pb.finish_with_message(format!("{} {} failed: {}", "x".red(), agent.name, error));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl TurnProgressNotifier for SimpleProgress {
    fn on_turn_start(&self, agent: &Agent) {
        println!("{} {} is thinking...", "->".cyan(), agent.name.bold());
    }

    fn on_turn_complete(&self, agent: &Agent, _message: &Message) {
        println!("  {} {}", "v".green(), agent.name);
    }

    fn on_turn_failed(&self, agent: &Agent, _message: &Message, error: &str) {
        println!("  {} {} ({})", "x".red(), agent.name, error);
    }
}
