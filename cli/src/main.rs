//! CLI entrypoint for taleweave
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use taleweave_application::{
    AutoPlayDriver, NoProgress, ProviderKind, StoryProvider, StorytellingEngine,
    TurnProgressNotifier,
};
use taleweave_domain::{SessionSnapshot, Severity};
use taleweave_infrastructure::{
    ConfigLoader, FileConfig, JsonSessionExporter, JsonlConversationLogger, ProviderFactory,
    run_oneshot,
};
use taleweave_presentation::{
    Cli, Command, SessionServices, SimpleProgress, StoryFormatter, StoryRepl,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.dir.as_deref());
    info!("Starting taleweave");

    report_config_issues(&config)?;

    let scenario = config.scenario();
    let factory = ProviderFactory::new(config.provider.clone(), scenario.quotes.clone())
        .with_seed(cli.seed);

    // One-shot mode never builds a session
    let command = cli.resolved_command();
    if let Command::Oneshot { input } = &command {
        let result = run_oneshot(input.as_deref().unwrap_or_default(), &factory).await;
        println!("{}", result.to_json());
        return Ok(());
    }

    // === Dependency Injection ===
    let kind = match &cli.provider {
        Some(name) => name.parse::<ProviderKind>().map_err(|e| anyhow!(e))?,
        None => config.provider.parse_kind().0,
    };
    let provider: Arc<dyn StoryProvider> = factory.build(kind)?;
    let (params, _) = config.session.to_engine_params();

    let mut scenario = scenario;
    let opening = scenario.opening_narration.take();
    let mut engine = StorytellingEngine::from_scenario(scenario, provider, params)?;
    if let Some(seed) = cli.seed {
        engine = engine.with_seed(seed);
    }
    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!("Writing story transcript to {}", logger.path().display());
                engine = engine.with_conversation_logger(Arc::new(logger));
            }
            None => warn!("Story transcript disabled"),
        }
    }
    if let Some(opening) = opening {
        engine.narrate(opening);
    }

    let services = CliServices {
        factory,
        exporter: JsonSessionExporter::new("."),
    };

    match command {
        Command::Play => {
            let mut repl = StoryRepl::new(engine, services).with_progress(!cli.quiet);
            repl.run().await?;
        }
        Command::Run { turns, export } => {
            engine.set_active(true);
            let progress: Box<dyn TurnProgressNotifier> = if cli.quiet {
                Box::new(NoProgress)
            } else {
                Box::new(SimpleProgress)
            };

            let cancel = CancellationToken::new();
            let ctrl_c = {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        cancel.cancel();
                    }
                })
            };
            let report = AutoPlayDriver::new(Duration::ZERO)
                .run_turns(&mut engine, turns, progress.as_ref(), &cancel)
                .await?;
            ctrl_c.abort();

            println!("{}", StoryFormatter::header("Taleweave"));
            for message in engine.messages() {
                println!("{}", StoryFormatter::format_message(message, engine.agents()));
            }
            println!();
            println!(
                "{} turns, {} failed ({:?})",
                report.turns, report.failures, report.stop
            );

            if let Some(path) = export {
                let path = services
                    .export(&engine.export_snapshot(), Some(&path))
                    .map_err(|e| anyhow!(e))?;
                println!("Exported to {}", path.display());
            }
        }
        Command::Export { output } => {
            let path = services
                .export(&engine.export_snapshot(), output.as_deref())
                .map_err(|e| anyhow!(e))?;
            println!("Exported to {}", path.display());
        }
        Command::Oneshot { .. } => {}
    }

    Ok(())
}

/// Install the tracing subscriber; file output is added when a log dir is set.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "taleweave.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

/// Print validation issues; fatal ones abort startup.
fn report_config_issues(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => eprintln!("Config error: {}", issue.message),
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }
    Ok(())
}

/// Infrastructure-backed services for the REPL
struct CliServices {
    factory: ProviderFactory,
    exporter: JsonSessionExporter,
}

impl SessionServices for CliServices {
    fn switch_provider(&self, name: &str) -> Result<Arc<dyn StoryProvider>, String> {
        self.factory.build_named(name).map_err(|e| e.to_string())
    }

    fn export(&self, snapshot: &SessionSnapshot, path: Option<&Path>) -> Result<PathBuf, String> {
        let result = match path {
            Some(path) => {
                JsonSessionExporter::export_to(snapshot, path).map(|_| path.to_path_buf())
            }
            None => self.exporter.export(snapshot),
        };
        result.map_err(|e| e.to_string())
    }
}
