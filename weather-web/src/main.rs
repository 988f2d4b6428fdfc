//! Binary crate for the `weather-web` service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Serving the weather page and search endpoint over HTTP

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod auth;
mod cli;
mod server;

const DEFAULT_LOG_FILTER: &str = "weather_web=info,weather_core=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
