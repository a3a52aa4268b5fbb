use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cityweather_core::{Config, WeatherLookup, weather_code::WEATHER_CODES};
use inquire::{CustomType, InquireError, Text};

use crate::sink::{OutputFormat, TerminalSink};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London" or "São Paulo".
        city: String,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Prompt for city names until cancelled (Esc or Ctrl-C).
    Interactive {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Edit endpoints and timeout.
    Configure,

    /// List the weather codes and their descriptions.
    Codes,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { city, format } => {
                let lookup = WeatherLookup::from_config(&load_config(self.config.as_deref())?)?;
                match lookup.lookup(&city).await {
                    Ok(summary) => println!("{}", format.summary(&summary)),
                    Err(err) => {
                        tracing::debug!(error = ?err, "lookup failed");
                        eprintln!("{}", format.error(&err));
                        std::process::exit(1);
                    }
                }
            }
            Command::Interactive { format } => {
                let lookup = WeatherLookup::from_config(&load_config(self.config.as_deref())?)?;
                let sink = TerminalSink { format };

                loop {
                    let city = match Text::new("City:").prompt() {
                        Ok(city) => city,
                        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                            break;
                        }
                        Err(e) => return Err(e).context("Failed to read city name"),
                    };
                    lookup.submit(&city, &sink).await;
                }
            }
            Command::Configure => configure(self.config)?,
            Command::Codes => {
                for (code, description) in WEATHER_CODES.iter() {
                    println!("{code:>3}  {description}");
                }
            }
        }

        Ok(())
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let current = load_config(path.as_deref())?;

    let geocode_base_url = Text::new("Geocoding API base URL:")
        .with_default(&current.geocode_base_url)
        .prompt()?;
    let forecast_base_url = Text::new("Forecast API base URL:")
        .with_default(&current.forecast_base_url)
        .prompt()?;
    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(current.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    let updated = Config {
        geocode_base_url: geocode_base_url.trim().to_string(),
        forecast_base_url: forecast_base_url.trim().to_string(),
        timeout_secs,
    };
    updated.validate()?;

    let saved_to = match path {
        Some(path) => {
            updated.save_to(&path)?;
            path
        }
        None => updated.save()?,
    };
    println!("Saved configuration to {}", saved_to.display());

    Ok(())
}
