use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glasscast_core::{
    BackendId, Config, SettingsStore, TemperatureUnit, WeatherService,
    service::weather_service_from_config,
};
use inquire::{Password, PasswordDisplayMode, Text};

use crate::{app, output};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "glasscast", version, about = "Glasscast weather client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive session (default).
    App,

    /// Configure credentials for a backend, or all of them.
    Configure {
        /// Backend short name: "weatherapi" or "supabase".
        backend: Option<String>,
    },

    /// Show weather for a city.
    Weather {
        /// City name or any query weatherapi.com accepts (postcode, "lat,lon").
        city: String,

        /// Also show a daily forecast for this many days.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=14))]
        days: Option<u8>,
    },

    /// Set the temperature unit: celsius or fahrenheit.
    Units {
        unit: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command.unwrap_or(Command::App) {
            Command::App => app::run().await,
            Command::Configure { backend } => configure(backend.as_deref()),
            Command::Weather { city, days } => show_weather(&city, days).await,
            Command::Units { unit } => set_units(&unit),
        }
    }
}

fn configure(backend: Option<&str>) -> Result<()> {
    let mut config = Config::load()?;

    let targets: Vec<BackendId> = match backend {
        Some(name) => vec![BackendId::try_from(name)?],
        None => BackendId::all().to_vec(),
    };

    for id in targets {
        match id {
            BackendId::WeatherApi => {
                let api_key = prompt_secret("weatherapi.com API key:")?;
                config.set_weather_api_key(api_key);
            }
            BackendId::Supabase => {
                let url = Text::new("Supabase project URL:")
                    .with_placeholder("https://<project>.supabase.co")
                    .prompt()
                    .context("Failed to read Supabase URL")?;
                let anon_key = prompt_secret("Supabase anon key:")?;
                config.set_supabase(url.trim().to_string(), anon_key);
            }
        }
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn prompt_secret(message: &str) -> Result<String> {
    let value = Password::new(message)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .with_context(|| format!("Failed to read '{message}'"))?;

    Ok(value.trim().to_string())
}

async fn show_weather(city: &str, days: Option<u8>) -> Result<()> {
    let config = Config::load()?;
    let settings = SettingsStore::load()?;
    let service = weather_service_from_config(&config)?;

    let weather = match days {
        Some(days) => service.forecast(city, days).await,
        None => service.current_weather(city).await,
    }?;

    print!("{}", output::render_weather(&weather, settings.temperature_unit()));
    Ok(())
}

fn set_units(unit: &str) -> Result<()> {
    let unit = TemperatureUnit::try_from(unit)?;
    let settings = SettingsStore::load()?;
    settings.set_temperature_unit(unit)?;

    println!("Temperatures will be shown in {}", unit.symbol());
    Ok(())
}
