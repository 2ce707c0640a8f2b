//! Command-line interface parsing for City Weather
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated [`StartupConfig`].

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use url::Url;

use crate::data::forecast::OPEN_METEO_FORECAST_URL;
use crate::data::geocoding::OPEN_METEO_GEOCODING_URL;

/// City looked up at startup and on retry
pub const DEFAULT_CITY: &str = "Berlin";

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The default city is empty or whitespace
    #[error("Default city must not be empty")]
    EmptyCity,

    /// An endpoint is not an http(s) URL
    #[error("Invalid {name} URL '{value}': {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// City Weather - look up the current hourly weather for any city
#[derive(Parser, Debug)]
#[command(name = "cityweather")]
#[command(about = "Current weather for a city, from Open-Meteo")]
#[command(version)]
pub struct Cli {
    /// City shown at startup and when retrying after an error
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CITY)]
    pub city: String,

    /// Geocoding endpoint
    #[arg(long, value_name = "URL", default_value = OPEN_METEO_GEOCODING_URL)]
    pub geocoding_url: String,

    /// Forecast endpoint
    #[arg(long, value_name = "URL", default_value = OPEN_METEO_FORECAST_URL)]
    pub forecast_url: String,

    /// Only show the result of the most recent lookup
    ///
    /// Without this flag, overlapping lookups are not sequenced and the one
    /// that finishes last is displayed.
    #[arg(long)]
    pub latest_only: bool,

    /// Write logs to this file instead of the cache directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Trimmed default city
    pub default_city: String,
    /// Geocoding endpoint
    pub geocoding_url: String,
    /// Forecast endpoint
    pub forecast_url: String,
    /// Whether stale lookup results are dropped
    pub latest_only: bool,
    /// Explicit log file location
    pub log_file: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            geocoding_url: OPEN_METEO_GEOCODING_URL.to_string(),
            forecast_url: OPEN_METEO_FORECAST_URL.to_string(),
            latest_only: false,
            log_file: None,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the city is blank or an endpoint is not http(s)
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let default_city = cli.city.trim();
        if default_city.is_empty() {
            return Err(CliError::EmptyCity);
        }

        Ok(StartupConfig {
            default_city: default_city.to_string(),
            geocoding_url: validate_endpoint("geocoding", &cli.geocoding_url)?,
            forecast_url: validate_endpoint("forecast", &cli.forecast_url)?,
            latest_only: cli.latest_only,
            log_file: cli.log_file.clone(),
        })
    }
}

/// Checks that an endpoint parses as an http or https URL
fn validate_endpoint(name: &'static str, value: &str) -> Result<String, CliError> {
    let invalid = |reason: String| CliError::InvalidUrl {
        name,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(value.to_string()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}
