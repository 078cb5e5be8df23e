//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "device-replay")]
#[command(about = "Stream recorded device events to a server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the JSON file with event data
    pub json_file: PathBuf,

    /// URL of the server to send events to [default: http://localhost:62333/stream]
    #[arg(long, alias = "server_url")]
    pub server_url: Option<String>,

    /// Speed factor (1.0 for real time, 10.0 for 10x faster) [default: 1.0]
    #[arg(long)]
    pub speed: Option<f64>,

    /// Send events as fast as possible without delay (`--fast-mode=false`
    /// turns off a config file's fast mode)
    #[arg(
        long,
        alias = "fast_mode",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub fast_mode: Option<bool>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter when RUST_LOG is not set [default: info]
    #[arg(long)]
    pub log_level: Option<String>,

    /// Extra request header as KEY=VALUE (repeatable)
    #[arg(long = "header", value_name = "KEY=VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
