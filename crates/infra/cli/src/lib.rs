//! # Device Replay CLI
//!
//! Command-line front end that streams a recorded batch of device events to
//! an HTTP endpoint, one concurrent timeline per device.

mod cli;
mod config;
mod console;

pub use cli::Cli;
pub use config::{load_config, ConfigError, FileConfig, ReplayOptions, DEFAULT_LOG_LEVEL};
pub use console::ConsoleReporter;

use device_replay_delivery::{DeliveryError, HttpSink};
use device_replay_events::{
    JsonFileSource, ReplayCoordinator, ReplayError, ReplayReporter, ReplaySummary,
};
use std::sync::Arc;

/// Error that stops a replay before it starts.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sink(#[from] DeliveryError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_level`. Logs go to stderr so progress lines
/// on stdout stay clean.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one replay, printing progress to stdout.
pub async fn run(options: &ReplayOptions) -> Result<ReplaySummary, AppError> {
    run_with_reporter(options, Arc::new(ConsoleReporter::stdout())).await
}

/// Runs one replay with a custom progress reporter.
pub async fn run_with_reporter(
    options: &ReplayOptions,
    reporter: Arc<dyn ReplayReporter>,
) -> Result<ReplaySummary, AppError> {
    let speed = options.speed()?;
    let sink = Arc::new(HttpSink::new(options.sink_config())?);

    tracing::info!(
        "Replaying {} to {} ({:?})",
        options.input.display(),
        sink.url(),
        speed
    );

    let coordinator = ReplayCoordinator::new(sink, speed).with_reporter(reporter);
    let summary = coordinator
        .replay(&JsonFileSource::new(&options.input))
        .await?;

    Ok(summary)
}
