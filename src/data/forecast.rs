//! Open-Meteo forecast client
//!
//! Fetches the raw hourly series for a pair of coordinates. The response is
//! returned as-is; checking that it actually contains usable hourly data is the
//! caller's job.

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::ForecastPayload;

/// Base URL for the Open-Meteo forecast API
pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Hourly variables requested from the forecast endpoint
pub const HOURLY_VARIABLES: &str =
    "temperature_2m,relativehumidity_2m,windspeed_10m,surface_pressure";

/// Errors that can occur when fetching a forecast
#[derive(Debug, Error)]
pub enum ForecastError {
    /// HTTP request failed to complete
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Response body was not JSON
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Client for the Open-Meteo forecast endpoint
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastClient {
    /// Create a new ForecastClient pointing at the public endpoint
    pub fn new() -> Self {
        Self::with_base_url(OPEN_METEO_FORECAST_URL)
    }

    /// Create a new ForecastClient with a custom endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the hourly forecast for the given coordinates
    ///
    /// The timezone is left to the service (`timezone=auto`), which infers it
    /// from the coordinates.
    ///
    /// # Arguments
    /// * `lat` - Latitude coordinate
    /// * `lon` - Longitude coordinate
    ///
    /// # Returns
    /// * `Ok(ForecastPayload)` - Whatever the service returned
    /// * `Err(ForecastError)` - If the request fails in transit or the body is not JSON
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<ForecastPayload, ForecastError> {
        let latitude = lat.to_string();
        let longitude = lon.to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("hourly", HOURLY_VARIABLES),
                ("timezone", "auto"),
            ])
            .send()
            .await?;
        let text = response.text().await?;
        let payload: ForecastPayload = serde_json::from_str(&text)?;

        debug!(
            lat,
            lon,
            samples = payload.hourly.as_ref().map_or(0, |h| h.len()),
            timezone = payload.timezone.as_deref().unwrap_or("unknown"),
            "Fetched forecast"
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_client_default() {
        let client = ForecastClient::default();
        assert_eq!(client.base_url, OPEN_METEO_FORECAST_URL);
    }

    #[test]
    fn test_forecast_client_with_base_url() {
        let client = ForecastClient::with_base_url("http://127.0.0.1:9000/v1/forecast");
        assert_eq!(client.base_url, "http://127.0.0.1:9000/v1/forecast");
    }

    #[test]
    fn test_hourly_variables_are_exactly_four() {
        let vars: Vec<&str> = HOURLY_VARIABLES.split(',').collect();
        assert_eq!(
            vars,
            vec![
                "temperature_2m",
                "relativehumidity_2m",
                "windspeed_10m",
                "surface_pressure"
            ]
        );
    }

    #[test]
    fn test_parse_error_wraps_serde_error() {
        let err = serde_json::from_str::<ForecastPayload>("not json").unwrap_err();
        let err = ForecastError::from(err);
        assert!(err.to_string().starts_with("Failed to parse JSON response"));
    }
}
