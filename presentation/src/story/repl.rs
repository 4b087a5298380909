//! REPL (Read-Eval-Print Loop) for an interactive story session
//!
//! Plain input is a director intervention. Slash commands drive the session,
//! edit the world and switch providers.

use crate::output::console::StoryFormatter;
use crate::progress::reporter::TurnSpinner;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use taleweave_application::{
    AutoPlayDriver, StoryProvider, StorytellingEngine, TurnProgressNotifier,
};
use taleweave_domain::{Agent, Message, MessageId, SessionSnapshot, WorldUpdate};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Outer-layer operations the REPL needs but does not implement.
pub trait SessionServices {
    /// Build a provider by name (`mock`, `openai`).
    fn switch_provider(&self, name: &str) -> Result<Arc<dyn StoryProvider>, String>;

    /// Write the snapshot to `path`, or to a timestamped default location.
    fn export(&self, snapshot: &SessionSnapshot, path: Option<&Path>) -> Result<PathBuf, String>;
}

/// A parsed line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    Start,
    Pause,
    Next,
    /// Auto-play until paused or Ctrl-C, optionally capped at N turns.
    Auto(Option<usize>),
    /// Show the world, or apply a `field: value` directive.
    World(Option<String>),
    Event(String),
    /// Show the lore, or add `topic = description`.
    Lore(Option<(String, String)>),
    /// Show the rules, or add one.
    Rules(Option<String>),
    Agents,
    Export(Option<PathBuf>),
    /// Show the current provider, or switch to the named one.
    Provider(Option<String>),
    Narrate(String),
    Direct(String),
    /// Known command used without its required argument.
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if !line.starts_with('/') {
            return Some(ReplCommand::Direct(line.to_string()));
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        let command = match cmd {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/start" => ReplCommand::Start,
            "/pause" | "/stop" => ReplCommand::Pause,
            "/next" | "/n" => ReplCommand::Next,
            "/auto" => match arg.map(|a| a.parse::<usize>()) {
                None => ReplCommand::Auto(None),
                Some(Ok(n)) => ReplCommand::Auto(Some(n)),
                Some(Err(_)) => ReplCommand::Usage("/auto [turns]"),
            },
            "/world" | "/w" => ReplCommand::World(arg),
            "/event" => match arg {
                Some(text) => ReplCommand::Event(text),
                None => ReplCommand::Usage("/event <description>"),
            },
            "/lore" => match arg {
                None => ReplCommand::Lore(None),
                Some(text) => match text.split_once('=') {
                    Some((topic, description))
                        if !topic.trim().is_empty() && !description.trim().is_empty() =>
                    {
                        ReplCommand::Lore(Some((
                            topic.trim().to_string(),
                            description.trim().to_string(),
                        )))
                    }
                    _ => ReplCommand::Usage("/lore <topic> = <description>"),
                },
            },
            "/rules" | "/rule" => ReplCommand::Rules(arg),
            "/agents" => ReplCommand::Agents,
            "/export" => ReplCommand::Export(arg.map(PathBuf::from)),
            "/provider" => ReplCommand::Provider(arg),
            "/narrate" => match arg {
                Some(text) => ReplCommand::Narrate(text),
                None => ReplCommand::Usage("/narrate <text>"),
            },
            "/direct" => match arg {
                Some(text) => ReplCommand::Direct(text),
                None => ReplCommand::Usage("/direct <text>"),
            },
            other => ReplCommand::Unknown(other.to_string()),
        };
        Some(command)
    }
}

/// Interactive story REPL
pub struct StoryRepl<S: SessionServices> {
    engine: StorytellingEngine,
    services: S,
    show_progress: bool,
    rendered: usize,
}

impl<S: SessionServices> StoryRepl<S> {
    pub fn new(engine: StorytellingEngine, services: S) -> Self {
        Self {
            engine,
            services,
            show_progress: true,
            rendered: 0,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn engine(&self) -> &StorytellingEngine {
        &self.engine
    }

    pub fn into_engine(self) -> StorytellingEngine {
        self.engine
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("taleweave").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();
        self.render_new();

        loop {
            let prompt = if self.engine.is_active() { "story> " } else { "paused> " };
            match rl.readline(prompt) {
                Ok(line) => {
                    let Some(command) = ReplCommand::parse(&line) else {
                        continue;
                    };
                    let _ = rl.add_history_entry(line.trim());
                    if !self.execute(command).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("The story rests here.");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Execute one command. Returns false when the session should end.
    pub async fn execute(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("The story rests here.");
                return false;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Start => self.engine.set_active(true),
            ReplCommand::Pause => self.engine.set_active(false),
            ReplCommand::Next => self.next_turn().await,
            ReplCommand::Auto(limit) => self.auto_play(limit).await,
            ReplCommand::World(None) => {
                print!("{}", StoryFormatter::format_world(self.engine.world_state()));
            }
            ReplCommand::World(Some(directive)) => match WorldUpdate::parse_directive(&directive) {
                Some(update) => self.apply_world_update(update),
                None => println!(
                    "No world field recognized. Try: /world location: The Deep Catacombs mood: Grim"
                ),
            },
            ReplCommand::Event(text) => {
                let update =
                    WorldUpdate::new().with_event(&self.engine.world_state().active_events, text);
                self.apply_world_update(update);
            }
            ReplCommand::Lore(None) => {
                print!("{}", StoryFormatter::format_lore(self.engine.world_state()));
            }
            ReplCommand::Lore(Some((topic, description))) => {
                let update = WorldUpdate::new().with_lore_entry(
                    &self.engine.world_state().lore,
                    topic,
                    description,
                );
                self.apply_world_update(update);
            }
            ReplCommand::Rules(None) => {
                print!("{}", StoryFormatter::format_rules(self.engine.world_state()));
            }
            ReplCommand::Rules(Some(rule)) => {
                let mut rules = self.engine.world_state().rules.clone();
                rules.push(rule);
                self.apply_world_update(WorldUpdate {
                    rules: Some(rules),
                    ..Default::default()
                });
            }
            ReplCommand::Agents => {
                print!("{}", StoryFormatter::format_agents(self.engine.agents()));
            }
            ReplCommand::Export(path) => {
                match self.services.export(&self.engine.export_snapshot(), path.as_deref()) {
                    Ok(path) => println!("{} {}", "Exported to".green(), path.display()),
                    Err(e) => eprintln!("{} {}", "Export failed:".red(), e),
                }
            }
            ReplCommand::Provider(None) => println!("Provider: {}", self.engine.provider_kind()),
            ReplCommand::Provider(Some(name)) => match self.services.switch_provider(&name) {
                Ok(provider) => {
                    self.engine.set_provider(provider);
                    println!("Provider: {}", self.engine.provider_kind());
                }
                Err(e) => eprintln!("{} {}", "Error:".red(), e),
            },
            ReplCommand::Narrate(text) => {
                self.engine.narrate(text);
            }
            ReplCommand::Direct(text) => {
                self.engine.intervene(text);
            }
            ReplCommand::Usage(usage) => println!("Usage: {}", usage),
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }

        self.render_new();
        true
    }

    async fn next_turn(&mut self) {
        if !self.engine.is_active() {
            println!("The session is paused. Use /start first.");
            return;
        }
        let result = if self.show_progress {
            self.engine.take_turn_with_progress(&TurnSpinner::new()).await
        } else {
            self.engine.take_turn().await
        };
        match result {
            Ok(Some(_)) => {}
            Ok(None) => println!("No agent is available to speak."),
            Err(e) => eprintln!("{} {}", "Error:".red(), e),
        }
    }

    async fn auto_play(&mut self, limit: Option<usize>) {
        if !self.engine.is_active() {
            println!("The session is paused. Use /start first.");
            return;
        }
        println!("{}", "Auto-play on. Press Ctrl-C to stop.".dimmed());
        self.render_new();

        let cancel = CancellationToken::new();
        let ctrl_c = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let mut driver = AutoPlayDriver::for_engine(&self.engine);
        if let Some(n) = limit {
            driver = driver.with_max_turns(n);
        }
        let echo = LiveEcho::new(self.engine.agents().to_vec(), self.show_progress);

        self.engine.set_auto_play(true);
        let result = driver.run(&mut self.engine, &echo, &cancel).await;
        self.engine.set_auto_play(false);
        ctrl_c.abort();

        self.render_unechoed(&echo.echoed());
        match result {
            Ok(report) => println!(
                "{}",
                format!("Auto-play stopped after {} turns.", report.turns).dimmed()
            ),
            Err(e) => {
                warn!("Auto-play aborted: {}", e);
                eprintln!("{} {}", "Error:".red(), e);
            }
        }
    }

    fn apply_world_update(&mut self, update: WorldUpdate) {
        let notices = update.describe();
        self.engine.update_world_state(update);
        for notice in notices {
            self.engine.system_notice(notice);
        }
    }

    /// Messages appended since the last render that `echoed` does not cover.
    fn unechoed<'a>(
        messages: &'a [Message],
        rendered: usize,
        echoed: &'a HashSet<MessageId>,
    ) -> impl Iterator<Item = &'a Message> + 'a {
        messages[rendered.min(messages.len())..]
            .iter()
            .filter(|m| !echoed.contains(&m.id))
    }

    fn render_unechoed(&mut self, echoed: &HashSet<MessageId>) {
        let messages = self.engine.messages();
        for message in Self::unechoed(messages, self.rendered, echoed) {
            println!("{}", StoryFormatter::format_message(message, self.engine.agents()));
        }
        self.rendered = messages.len();
    }

    fn render_new(&mut self) {
        let messages = self.engine.messages();
        for message in &messages[self.rendered.min(messages.len())..] {
            println!("{}", StoryFormatter::format_message(message, self.engine.agents()));
        }
        self.rendered = messages.len();
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", StoryFormatter::header("Taleweave"));
        print!("{}", StoryFormatter::format_world(self.engine.world_state()));
        print!("{}", StoryFormatter::format_agents(self.engine.agents()));
        println!();
        println!("Provider: {}", self.engine.provider_kind());
        Self::print_help();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /start, /pause            - Start or pause the session");
        println!("  /next, /n                 - Let the next agent speak");
        println!("  /auto [turns]             - Auto-play until paused or Ctrl-C");
        println!("  /narrate <text>           - Add narration");
        println!("  /direct <text>            - Add a director note (same as plain text)");
        println!("  /world [field: value ...] - Show or edit location, time_of_day, weather, mood");
        println!("  /event <text>             - Add an active event");
        println!("  /lore [topic = text]      - Show or add lore");
        println!("  /rules [rule]             - Show or add a world rule");
        println!("  /agents                   - Show the roster");
        println!("  /provider [mock|openai]   - Show or switch the provider");
        println!("  /export [path]            - Export the session as JSON");
        println!("  /help, /quit");
        println!();
    }
}

/// Prints each turn as it lands during auto-play.
struct LiveEcho {
    agents: Vec<Agent>,
    show_progress: bool,
    spinner: TurnSpinner,
    echoed: Mutex<HashSet<MessageId>>,
}

impl LiveEcho {
    fn new(agents: Vec<Agent>, show_progress: bool) -> Self {
        Self {
            agents,
            show_progress,
            spinner: TurnSpinner::new(),
            echoed: Mutex::new(HashSet::new()),
        }
    }

    fn print(&self, message: &Message) {
        println!("{}", StoryFormatter::format_message(message, &self.agents));
        if let Ok(mut echoed) = self.echoed.lock() {
            echoed.insert(message.id.clone());
        }
    }

    fn echoed(&self) -> HashSet<MessageId> {
        self.echoed.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl TurnProgressNotifier for LiveEcho {
    fn on_turn_start(&self, agent: &Agent) {
        if self.show_progress {
            self.spinner.on_turn_start(agent);
        }
    }

    fn on_turn_complete(&self, agent: &Agent, message: &Message) {
        self.spinner.on_turn_complete(agent, message);
        self.print(message);
    }

    fn on_turn_failed(&self, agent: &Agent, message: &Message, error: &str) {
        self.spinner.on_turn_failed(agent, message, error);
        self.print(message);
    }
}
