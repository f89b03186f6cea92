//! CLI entrypoint for Governance Engine
//!
//! This is the main binary that wires together all layers using
//! dependency injection, then runs a request script through the engine.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use governance_application::{EventPublisher, FanoutPublisher, GovernanceCoordinator};
use governance_domain::Severity;
use governance_infrastructure::{
    ConfigLoader, FileConfig, InMemorySessionRepository, InMemoryWorkflowRepository,
    JsonlEventLog, StaticMembership, TracingEventPublisher,
};
use governance_presentation::{Cli, RequestDispatcher, formatter_for, parse_script};
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = init_logging(cli.verbose, config.logging.file_path().as_deref())?;

    info!("Starting Governance Engine");
    check_config(&config)?;

    // === Dependency Injection ===
    let membership = Arc::new(StaticMembership::from_config(&config.groups));
    info!("Loaded {} group(s)", membership.group_count());

    let coordinator = GovernanceCoordinator::new(
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(InMemoryWorkflowRepository::new()),
        membership,
    )
    .with_events(build_publisher(&config))
    .with_config(config.coordinator_config());

    let script = read_script(cli.script_path().map(|p| p.as_path()))?;
    let requests = parse_script(&script).context("Invalid request script")?;
    info!("Running {} request(s)", requests.len());

    let mut dispatcher = RequestDispatcher::new(Arc::new(coordinator));
    let responses = dispatcher.run_script(requests, cli.stop_on_error).await;

    println!("{}", formatter_for(cli.output).format_all(&responses));

    let rejected = responses.iter().filter(|r| !r.is_ok()).count();
    if rejected > 0 {
        warn!("{} request(s) rejected", rejected);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Initialize logging based on verbosity level, plus a daily-rotated file
/// when `[logging] file` is set.
fn init_logging(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // Responses go to stdout, diagnostics to stderr
    let registry = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr),
    );

    let Some(path) = file else {
        registry.init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("logging.file has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, name));
    registry
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

/// Report config issues; any error-severity issue stops the run.
fn check_config(config: &FileConfig) -> Result<()> {
    let mut errors = 0;
    for issue in config.validate() {
        match issue.severity {
            Severity::Error => {
                error!("{}", issue.message);
                errors += 1;
            }
            Severity::Warning => warn!("{}", issue.message),
        }
    }
    if errors > 0 {
        bail!("Configuration has {} error(s)", errors);
    }
    Ok(())
}

fn build_publisher(config: &FileConfig) -> Arc<dyn EventPublisher> {
    let mut publisher = FanoutPublisher::default().with(Arc::new(TracingEventPublisher));
    if let Some(path) = config.logging.event_log_path() {
        match JsonlEventLog::new(&path) {
            Some(log) => {
                info!("Writing activity log to {}", log.path().display());
                publisher = publisher.with(Arc::new(log));
            }
            None => warn!("Activity log disabled"),
        }
    }
    Arc::new(publisher)
}

fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Could not read script {}", path.display())),
        None => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("Could not read script from stdin")?;
            Ok(script)
        }
    }
}

fn print_config_sources(explicit: Option<&Path>) {
    println!("Configuration sources (in priority order):");
    println!("  [  ENV] GOVERNANCE_* environment variables");
    for source in ConfigLoader::sources(explicit) {
        let marker = if source.found { "FOUND" } else { "     " };
        match source.path {
            Some(path) => println!("  [{}] {:<8} {}", marker, format!("{}:", source.label), path.display()),
            None => println!(
                "  [{}] {:<8} ./governance.toml or ./.governance.toml",
                marker,
                format!("{}:", source.label)
            ),
        }
    }
    println!("  [     ] Default: built-in defaults");
}
