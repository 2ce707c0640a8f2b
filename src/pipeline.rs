//! Lookup pipeline: city name -> location -> hourly forecast
//!
//! A run resolves the city first and only then fetches the forecast for the
//! resolved coordinates. Runs are spawned as tokio tasks and report back to the
//! UI loop over a channel, so the UI owns every display state change.

use chrono::FixedOffset;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::StartupConfig;
use crate::data::{
    ForecastClient, ForecastError, GeocodingClient, GeocodingError, HourlySeries, Location,
};

/// Errors that can end a lookup
///
/// All of these are shown to the user the same way.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The city could not be resolved
    #[error(transparent)]
    Geocoding(#[from] GeocodingError),

    /// The forecast request failed
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// The forecast response had no hourly object
    #[error("Forecast response has no hourly data")]
    MissingHourly,

    /// The hourly series has no timestamps
    #[error("Forecast hourly series is empty")]
    EmptySeries,

    /// A value array does not line up with the timestamps
    #[error("Hourly field {field} has {actual} values, expected {expected}")]
    MismatchedSeries {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// A successful lookup ready to be displayed
#[derive(Debug, Clone)]
pub struct WeatherLookup {
    /// The resolved place
    pub location: Location,
    /// Validated hourly series
    pub hourly: HourlySeries,
    /// Offset of the hourly timestamps from UTC, when the service reported it
    pub utc_offset: Option<FixedOffset>,
}

/// A pipeline run to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    /// Sequence number of this run
    pub token: u64,
    /// City to look up
    pub city: String,
}

/// The result of a finished pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Sequence number of the run that produced this
    pub token: u64,
    /// City that was looked up
    pub city: String,
    /// Lookup result
    pub result: Result<WeatherLookup, LookupError>,
}

/// Runs the two lookups in order
#[derive(Debug, Clone, Default)]
pub struct WeatherService {
    geocoding: GeocodingClient,
    forecast: ForecastClient,
}

impl WeatherService {
    /// Creates a service from already built clients
    pub fn new(geocoding: GeocodingClient, forecast: ForecastClient) -> Self {
        Self {
            geocoding,
            forecast,
        }
    }

    /// Creates a service using the endpoints from the startup configuration
    pub fn from_config(config: &StartupConfig) -> Self {
        Self::new(
            GeocodingClient::with_base_url(config.geocoding_url.clone()),
            ForecastClient::with_base_url(config.forecast_url.clone()),
        )
    }

    /// Looks up the weather for a city
    ///
    /// # Arguments
    /// * `city` - Non-empty, trimmed city name
    ///
    /// # Returns
    /// * `Ok(WeatherLookup)` - Location plus a validated hourly series
    /// * `Err(LookupError)` - If either request fails or the series is unusable
    pub async fn lookup(&self, city: &str) -> Result<WeatherLookup, LookupError> {
        let location = self.geocoding.resolve(city).await?;
        let payload = self
            .forecast
            .fetch(location.latitude, location.longitude)
            .await?;

        let utc_offset = payload.utc_offset();
        let hourly = validate_hourly(payload.hourly)?;

        Ok(WeatherLookup {
            location,
            hourly,
            utc_offset,
        })
    }
}

/// Checks that an hourly series is present, non-empty and index-aligned
pub fn validate_hourly(hourly: Option<HourlySeries>) -> Result<HourlySeries, LookupError> {
    let hourly = hourly.ok_or(LookupError::MissingHourly)?;
    if hourly.is_empty() {
        return Err(LookupError::EmptySeries);
    }

    let expected = hourly.len();
    if let Some((field, values)) = hourly
        .value_columns()
        .into_iter()
        .find(|(_, values)| values.len() != expected)
    {
        return Err(LookupError::MismatchedSeries {
            field,
            expected,
            actual: values.len(),
        });
    }

    Ok(hourly)
}

/// Runs one pipeline request to completion
pub async fn run(service: &WeatherService, request: PipelineRequest) -> PipelineOutcome {
    info!(token = request.token, city = %request.city, "Lookup started");
    let result = service.lookup(&request.city).await;

    match &result {
        Ok(lookup) => debug!(
            token = request.token,
            label = %lookup.location.label,
            samples = lookup.hourly.len(),
            "Lookup finished"
        ),
        Err(e) => warn!(token = request.token, city = %request.city, error = %e, "Lookup failed"),
    }

    PipelineOutcome {
        token: request.token,
        city: request.city,
        result,
    }
}

/// Spawns a pipeline run in the background
///
/// The outcome is sent on `tx` once both requests have completed. Nothing
/// cancels a spawned run; an earlier run may still report after a later one.
pub fn spawn(
    service: WeatherService,
    request: PipelineRequest,
    tx: mpsc::Sender<PipelineOutcome>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = run(&service, request).await;
        // The receiver is gone only when the UI has quit
        let _ = tx.send(outcome).await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(len: usize) -> HourlySeries {
        HourlySeries {
            time: (0..len).map(|h| format!("2024-07-15T{:02}:00", h)).collect(),
            temperature_2m: vec![Some(20.0); len],
            relativehumidity_2m: vec![Some(50.0); len],
            windspeed_10m: vec![Some(10.0); len],
            surface_pressure: vec![Some(1013.0); len],
        }
    }

    #[test]
    fn test_validate_hourly_accepts_aligned_series() {
        let hourly = validate_hourly(Some(series(3))).unwrap();
        assert_eq!(hourly.len(), 3);
    }

    #[test]
    fn test_validate_hourly_missing() {
        assert!(matches!(
            validate_hourly(None),
            Err(LookupError::MissingHourly)
        ));
    }

    #[test]
    fn test_validate_hourly_empty() {
        assert!(matches!(
            validate_hourly(Some(HourlySeries::default())),
            Err(LookupError::EmptySeries)
        ));
    }

    #[test]
    fn test_validate_hourly_mismatched_lengths() {
        let mut hourly = series(3);
        hourly.windspeed_10m.pop();

        match validate_hourly(Some(hourly)) {
            Err(LookupError::MismatchedSeries {
                field,
                expected,
                actual,
            }) => {
                assert_eq!(field, "windspeed_10m");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("expected MismatchedSeries, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_hourly_null_samples_are_fine() {
        let mut hourly = series(2);
        hourly.temperature_2m = vec![None, None];
        assert!(validate_hourly(Some(hourly)).is_ok());
    }

    #[test]
    fn test_lookup_error_messages() {
        let err = LookupError::from(GeocodingError::NotFound("Gotham".to_string()));
        assert_eq!(err.to_string(), "City not found: Gotham");

        let err = LookupError::MismatchedSeries {
            field: "surface_pressure",
            expected: 24,
            actual: 23,
        };
        assert_eq!(
            err.to_string(),
            "Hourly field surface_pressure has 23 values, expected 24"
        );
    }

    #[test]
    fn test_service_from_config_uses_endpoints() {
        let config = StartupConfig {
            geocoding_url: "http://localhost:1/search".to_string(),
            forecast_url: "http://localhost:2/forecast".to_string(),
            ..Default::default()
        };
        let service = WeatherService::from_config(&config);
        let debug = format!("{:?}", service);
        assert!(debug.contains("http://localhost:1/search"));
        assert!(debug.contains("http://localhost:2/forecast"));
    }
}
