//! Open-Meteo geocoding client
//!
//! Resolves a free-text city name into coordinates and a display label. Every
//! way a lookup can go wrong collapses into [`GeocodingError::NotFound`].

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::Location;

/// Base URL for the Open-Meteo geocoding API
pub const OPEN_METEO_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Errors that can occur when resolving a city
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// No usable match: zero results, a malformed body, or a failed request
    #[error("City not found: {0}")]
    NotFound(String),
}

/// Client for the Open-Meteo geocoding endpoint
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodingClient {
    /// Create a new GeocodingClient pointing at the public endpoint
    pub fn new() -> Self {
        Self::with_base_url(OPEN_METEO_GEOCODING_URL)
    }

    /// Create a new GeocodingClient with a custom endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve a city name to a location
    ///
    /// Asks the service for exactly one match and takes it.
    ///
    /// # Arguments
    /// * `city` - Non-empty, already trimmed city name
    ///
    /// # Returns
    /// * `Ok(Location)` - Coordinates and label of the first match
    /// * `Err(GeocodingError::NotFound)` - For any failure
    pub async fn resolve(&self, city: &str) -> Result<Location, GeocodingError> {
        let text = match self.search(city).await {
            Ok(text) => text,
            Err(e) => {
                warn!(city, error = %e, "Geocoding request failed");
                return Err(GeocodingError::NotFound(city.to_string()));
            }
        };

        let location = parse_response(city, &text)?;
        debug!(
            city,
            label = %location.label,
            latitude = location.latitude,
            longitude = location.longitude,
            "Resolved location"
        );
        Ok(location)
    }

    async fn search(&self, city: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(&self.base_url)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

/// Parse a geocoding response body into the first matching location
fn parse_response(city: &str, body: &str) -> Result<Location, GeocodingError> {
    let response: GeocodingResponse = serde_json::from_str(body).map_err(|e| {
        debug!(city, error = %e, "Malformed geocoding response");
        GeocodingError::NotFound(city.to_string())
    })?;

    let first = response
        .results
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| {
            debug!(city, "Geocoding returned no results");
            GeocodingError::NotFound(city.to_string())
        })?;

    Ok(Location::new(
        first.latitude,
        first.longitude,
        &first.name,
        first.country.as_deref(),
    ))
}

/// Geocoding API response structure
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

/// A single geocoding match
#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
    name: String,
    #[serde(default)]
    country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN_RESPONSE: &str = r#"{
        "results": [
            {
                "id": 2950159,
                "name": "Berlin",
                "latitude": 52.52437,
                "longitude": 13.41053,
                "elevation": 74.0,
                "feature_code": "PPLC",
                "country_code": "DE",
                "timezone": "Europe/Berlin",
                "population": 3426354,
                "country": "Germany"
            }
        ],
        "generationtime_ms": 0.8
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let location = parse_response("Berlin", BERLIN_RESPONSE).unwrap();
        assert_eq!(location.label, "Berlin, Germany");
        assert!((location.latitude - 52.52437).abs() < 0.0001);
        assert!((location.longitude - 13.41053).abs() < 0.0001);
    }

    #[test]
    fn test_parse_result_without_country() {
        let body = r#"{"results": [{"latitude": 1.0, "longitude": 2.0, "name": "Atlantis"}]}"#;
        let location = parse_response("Atlantis", body).unwrap();
        assert_eq!(location.label, "Atlantis");
    }

    #[test]
    fn test_parse_takes_first_result() {
        let body = r#"{"results": [
            {"latitude": 1.0, "longitude": 2.0, "name": "Paris", "country": "France"},
            {"latitude": 3.0, "longitude": 4.0, "name": "Paris", "country": "United States"}
        ]}"#;
        let location = parse_response("Paris", body).unwrap();
        assert_eq!(location.label, "Paris, France");
    }

    #[test]
    fn test_parse_missing_results_is_not_found() {
        let err = parse_response("Nowhere", r#"{"generationtime_ms": 0.5}"#).unwrap_err();
        assert!(matches!(err, GeocodingError::NotFound(ref city) if city == "Nowhere"));
    }

    #[test]
    fn test_parse_empty_results_is_not_found() {
        let result = parse_response("Nowhere", r#"{"results": []}"#);
        assert!(matches!(result, Err(GeocodingError::NotFound(_))));
    }

    #[test]
    fn test_parse_malformed_json_is_not_found() {
        let result = parse_response("Berlin", "<html>oops</html>");
        assert!(matches!(result, Err(GeocodingError::NotFound(_))));
    }

    #[test]
    fn test_parse_result_missing_coordinates_is_not_found() {
        let result = parse_response("Berlin", r#"{"results": [{"name": "Berlin"}]}"#);
        assert!(matches!(result, Err(GeocodingError::NotFound(_))));
    }

    #[test]
    fn test_not_found_message_names_city() {
        let err = GeocodingError::NotFound("Gotham".to_string());
        assert_eq!(err.to_string(), "City not found: Gotham");
    }

    #[test]
    fn test_geocoding_client_default() {
        let client = GeocodingClient::default();
        assert_eq!(client.base_url, OPEN_METEO_GEOCODING_URL);
    }
}
