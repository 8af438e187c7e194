//! LinguaLink - live caption capture and translation streaming
//!
//! Attaches to a meeting tab over the browser's remote debugging protocol,
//! picks the current caption out of the page and streams it to a
//! translation backend.

mod cli;
mod console;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lingualink_capture::CaptionHeuristics;
use lingualink_cdp::{ProbeFilter, run_host};
use lingualink_config::{ConfigLoader, ConfigValidator, LinguaLinkConfig, LoggingConfig};
use lingualink_dom::ElementData;
use lingualink_runloop::CaptionService;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::cli::{Cli, Commands, RunArgs};
use crate::console::ConsoleOverlay;

/// Queue depth between the page host and the engine.
const UPDATE_QUEUE: usize = 256;

/// Initialize tracing with console and file output.
///
/// Log files rotate daily under the configured directory.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = logging.directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&logging.file_prefix)
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop and must outlive main.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Where the configuration came from.
enum ConfigSource {
    File(PathBuf),
    Defaults,
    /// The default file exists but could not be used.
    Fallback(PathBuf, lingualink_config::ConfigError),
}

fn load_config(
    path: Option<&Path>,
) -> Result<(LinguaLinkConfig, ConfigSource), Box<dyn std::error::Error>> {
    if let Some(path) = path {
        let config = ConfigLoader::load(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    let default = ConfigLoader::default_path();
    match ConfigLoader::load_optional(&default) {
        Ok(Some(config)) => Ok((config, ConfigSource::File(default))),
        Ok(None) => Ok((LinguaLinkConfig::default(), ConfigSource::Defaults)),
        Err(e) => Ok((LinguaLinkConfig::default(), ConfigSource::Fallback(default, e))),
    }
}

fn apply_overrides(config: &mut LinguaLinkConfig, args: &RunArgs) {
    if let Some(endpoint) = &args.cdp_endpoint {
        config.host.cdp_endpoint = endpoint.clone();
    }
    if let Some(page) = &args.page {
        config.host.page_url_contains = page.clone();
    }
    if !args.backends.is_empty() {
        config.channel.endpoints = args.backends.clone();
    }
    if args.hide_captions {
        config.settings.show_captions = false;
    }
    for target in &mut config.targets {
        if args.disabled_targets.contains(&target.key) {
            target.enabled = false;
        }
    }
}

/// Validate, logging warnings. Errors abort.
fn validate(config: &LinguaLinkConfig) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    for err in &result.errors {
        error!(path = %err.path, "{}", err.message);
    }
    match result.into_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (mut config, source) = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging)?;

    match &source {
        ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
        ConfigSource::Defaults => info!("No configuration file, using defaults"),
        ConfigSource::Fallback(path, e) => {
            warn!(error = %e, "Could not read {}, using defaults", path.display())
        }
    }

    match cli.command {
        Some(Commands::CheckConfig) => {
            validate(&config)?;
            println!("Configuration OK");
            Ok(())
        }
        Some(Commands::Run(args)) => {
            apply_overrides(&mut config, &args);
            run(config).await
        }
        None => run(config).await,
    }
}

/// Run until Ctrl-C.
async fn run(config: LinguaLinkConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate(&config)?;
    info!("Starting LinguaLink v{}", env!("CARGO_PKG_VERSION"));

    let cancel = CancellationToken::new();
    let (updates_tx, updates_rx) = mpsc::channel(UPDATE_QUEUE);

    let service = CaptionService::start(
        config.service(),
        Arc::new(ConsoleOverlay),
        updates_rx,
        cancel.clone(),
    )?;

    let containers = config.capture.line_container_classes.clone();
    let texts = config.capture.line_text_classes.clone();
    let probe = move || -> ProbeFilter {
        let heuristics = CaptionHeuristics::new(containers.clone(), texts.clone());
        Box::new(move |el: &ElementData| heuristics.is_caption_like(el))
    };
    info!(
        cdp = %config.host.cdp_endpoint,
        page = %config.host.page_url_contains,
        "Waiting for the meeting tab"
    );
    let host = tokio::spawn(run_host(config.host.clone(), probe, updates_tx, cancel.clone()));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
    }

    cancel.cancel();
    if let Err(e) = host.await {
        warn!(error = %e, "Page host task ended abnormally");
    }
    service.shutdown().await;
    Ok(())
}
