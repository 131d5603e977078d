use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use skypulse_core::{
    Config, Coordinates, StaticLocation, WeatherScreen, config::API_KEY_ENV,
    provider::provider_from_config,
};
use tracing::{debug, info};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skypulse", version, about = "SkyPulse weather forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// API key; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,

        /// Language for condition descriptions, e.g. "pt_br" or "en".
        #[arg(long)]
        lang: Option<String>,
    },

    /// Show current weather, the next hours and the 7-day outlook.
    Show {
        /// City name. Without it the weather at --lat/--lon is shown.
        city: Option<String>,

        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { api_key, lang } => configure(api_key, lang),
            Command::Show { city, lat, lon } => {
                let coordinates = lat.zip(lon).map(|(latitude, longitude)| Coordinates {
                    latitude,
                    longitude,
                });
                show(city, coordinates).await
            }
        }
    }
}

fn configure(api_key: Option<String>, lang: Option<String>) -> Result<()> {
    // Read the file only, so an env override is not persisted.
    let path = Config::config_file_path()?;
    debug!(path = %path.display(), "loading stored configuration");
    let mut cfg = Config::load_from(&path)?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?,
    };

    apply_settings(&mut cfg, &api_key, lang)?;

    let path = cfg.save()?;
    info!(path = %path.display(), lang = %cfg.lang, "configuration saved");
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Store a trimmed, non-blank key and an optional language.
fn apply_settings(cfg: &mut Config, api_key: &str, lang: Option<String>) -> Result<()> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    cfg.set_api_key(api_key.to_string());
    if let Some(lang) = lang {
        debug!(%lang, "overriding language");
        cfg.lang = lang;
    }
    Ok(())
}

async fn show(city: Option<String>, coordinates: Option<Coordinates>) -> Result<()> {
    let config = Config::load()?;
    debug!(
        ?city,
        ?coordinates,
        configured = config.is_configured(),
        "showing weather"
    );

    let screen = WeatherScreen::new(
        provider_from_config(&config),
        Box::new(StaticLocation::new(coordinates)),
    );

    match city {
        Some(city) => {
            screen.set_city_input(city);
            screen.fetch_by_city().await;
        }
        None => screen.start().await,
    }

    let state = screen.state();
    if let Some(error) = &state.last_error {
        if !config.is_configured() {
            bail!(
                "{error}\n\
                 Hint: run `skypulse configure` or set {API_KEY_ENV}."
            );
        }
        bail!("{error}");
    }

    print!("{}", render::render(&state));
    Ok(())
}
