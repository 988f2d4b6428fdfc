use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use weather_core::{Config, SearchRequest, WeatherLookup};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-web", version, about = "Weather search web service")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Listen address, e.g. "0.0.0.0:8080". Defaults to the configured one.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Store the OpenWeatherMap API key and an optional access token.
    Configure,

    /// Look up one city and print the JSON reply.
    Search {
        /// City name.
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let config = Config::load_from(&config_path)?;

        match self.command {
            Command::Serve { bind } => server::serve(config, bind).await,
            Command::Configure => configure(config, &config_path),
            Command::Search { city } => search(&config, &city).await,
        }
    }
}

fn configure(mut config: Config, path: &Path) -> anyhow::Result<()> {
    let api_key = inquire::Password::new("OpenWeatherMap API key (leave empty to keep current):")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let token = inquire::Text::new("Access token for the web routes (leave empty to skip):")
        .prompt()
        .context("Failed to read access token")?;
    if !token.trim().is_empty() {
        config.add_access_token(token.trim().to_string());
    }

    config.save_to(path)?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

async fn search(config: &Config, city: &str) -> anyhow::Result<()> {
    let request = SearchRequest::new(city)?;
    let outcome = WeatherLookup::from_config(config)?.search(&request).await;

    println!("{}", serde_json::to_string_pretty(&outcome.into_response())?);
    Ok(())
}
