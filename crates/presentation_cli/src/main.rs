//! kachelmann-wetter CLI
//!
//! Command-line front end for the kachelmannwetter.com forecast scraper.

#![allow(clippy::print_stdout)]

mod render;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domain::{Location, LocationResult, StationId};
use integration_kachelmann::{ForecastClient, HeaderConfig, KachelmannClient};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::ForecastTable;
use crate::settings::{Overrides, Settings};

/// kachelmann-wetter CLI
#[derive(Parser)]
#[command(name = "kachelmann-cli")]
#[command(author, version, about = "Short-term forecasts from kachelmannwetter.com", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Site base URL, e.g. https://kachelmannwetter.com/de
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// User-Agent sent in front of the default one
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Send --user-agent on its own
    #[arg(long, global = true)]
    replace_user_agent: bool,

    /// Ask the site again for names it did not know
    #[arg(long, global = true)]
    no_negative_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the hourly and daily forecast for a location
    ///
    /// Example: kachelmann-cli forecast Berlin
    /// Example: kachelmann-cli forecast 2950159 --json
    Forecast {
        /// Location name or station id
        location: String,

        /// Print the forecast as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a location name to its station id
    Station {
        /// Location name
        name: String,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            replace_user_agent: self.replace_user_agent,
            no_negative_cache: self.no_negative_cache,
        }
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::load(cli.config.as_deref(), &cli.overrides())?;
    debug!(?settings, "Settings loaded");

    let headers = HeaderConfig::global();
    if let Some(user_agent) = &settings.user_agent {
        headers.set_user_agent(user_agent, settings.replace_user_agent)?;
    }

    let client = KachelmannClient::with_headers(&settings.kachelmann_config(), headers)?;

    match cli.command {
        Commands::Forecast { location, json } => {
            let Some(forecast) = client.next_hours_days(&Location::from(location.as_str())).await?
            else {
                println!("❌ No forecast available for {location}");
                std::process::exit(1);
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&forecast)?);
            } else {
                print!("{}", ForecastTable(&forecast));
            }
        },

        Commands::Station { name } => {
            let result = match name.parse::<StationId>() {
                Ok(id) => LocationResult::StationId(id),
                Err(_) => client.resolver().lookup(&name).await?,
            };

            match result {
                LocationResult::StationId(id) => println!("{id}"),
                LocationResult::NoSuchLocation => {
                    println!("❌ No such location: {name}");
                    std::process::exit(1);
                },
                LocationResult::CouldNotRetrieve => {
                    println!("⚠️  Could not look up {name}, try again later");
                    std::process::exit(2);
                },
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "kachelmann-cli",
            "forecast",
            "Berlin",
            "--json",
            "-vv",
            "--base-url",
            "http://localhost:8080/de",
            "--no-negative-cache",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let overrides = cli.overrides();
        assert_eq!(overrides.base_url.as_deref(), Some("http://localhost:8080/de"));
        assert!(overrides.no_negative_cache);
        assert!(!overrides.replace_user_agent);
        assert!(matches!(
            cli.command,
            Commands::Forecast { ref location, json: true } if location == "Berlin"
        ));
    }

    #[test]
    fn user_agent_flags() {
        let cli = Cli::try_parse_from([
            "kachelmann-cli",
            "--user-agent",
            "WetterBot/2.0",
            "--replace-user-agent",
            "station",
            "Berlin",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.user_agent.as_deref(), Some("WetterBot/2.0"));
        assert!(overrides.replace_user_agent);
        assert!(matches!(cli.command, Commands::Station { ref name } if name == "Berlin"));
    }

    #[test]
    fn forecast_requires_location() {
        assert!(Cli::try_parse_from(["kachelmann-cli", "forecast"]).is_err());
    }
}
