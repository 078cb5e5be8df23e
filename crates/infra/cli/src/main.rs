//! Device replay binary.

use anyhow::Result;
use clap::Parser;
use device_replay_cli::{init_tracing, Cli, ReplayOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = ReplayOptions::resolve(cli)?;

    // Initialize tracing
    init_tracing(&options.log_level);

    let summary = device_replay_cli::run(&options).await?;
    tracing::info!(
        "{} of {} events delivered across {} devices",
        summary.sent,
        summary.total_events,
        summary.devices
    );

    Ok(())
}
