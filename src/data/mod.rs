//! Core data models for City Weather
//!
//! This module contains the values that flow through one lookup: the resolved
//! location, and the raw hourly forecast payload returned by Open-Meteo.

pub mod forecast;
pub mod geocoding;

pub use forecast::{ForecastClient, ForecastError};
pub use geocoding::{GeocodingClient, GeocodingError};

use chrono::FixedOffset;
use serde::Deserialize;

/// A geocoded place, produced fresh for every lookup
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// Human-readable label, "City, Country" or just "City"
    pub label: String,
}

impl Location {
    /// Creates a location, deriving the label from the place name and optional country
    pub fn new(latitude: f64, longitude: f64, name: &str, country: Option<&str>) -> Self {
        Self {
            latitude,
            longitude,
            label: display_label(name, country),
        }
    }
}

/// Builds the "City, Country" label.
///
/// When the country is missing or blank the separator is dropped as well, so the
/// label reads as just the name.
pub fn display_label(name: &str, country: Option<&str>) -> String {
    let label = format!("{}, {}", name, country.unwrap_or(""));
    label.trim().trim_end_matches(',').trim_end().to_string()
}

/// Raw forecast response from the Open-Meteo forecast endpoint
///
/// Nothing here is validated. The service may omit `hourly` entirely (for
/// example on an error reply), and the caller decides what to do about it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastPayload {
    /// Hourly series, if the service returned any
    #[serde(default)]
    pub hourly: Option<HourlySeries>,
    /// Offset of the returned local timestamps from UTC
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
    /// Timezone the service resolved for the coordinates (`timezone=auto`)
    #[serde(default)]
    pub timezone: Option<String>,
}

impl ForecastPayload {
    /// Returns the offset the hourly timestamps are expressed in, if known
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_seconds.and_then(FixedOffset::east_opt)
    }
}

/// Index-aligned hourly arrays
///
/// Values are optional because Open-Meteo emits `null` for hours it has no
/// sample for.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HourlySeries {
    /// ISO 8601 timestamps
    #[serde(default)]
    pub time: Vec<String>,
    /// Temperature at 2m in Celsius
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    /// Relative humidity at 2m in percent
    #[serde(default)]
    pub relativehumidity_2m: Vec<Option<f64>>,
    /// Wind speed at 10m in km/h
    #[serde(default)]
    pub windspeed_10m: Vec<Option<f64>>,
    /// Surface pressure in hPa
    #[serde(default)]
    pub surface_pressure: Vec<Option<f64>>,
}

impl HourlySeries {
    /// Number of timestamps in the series
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the series has no timestamps
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// The value arrays paired with their API field names
    pub fn value_columns(&self) -> [(&'static str, &[Option<f64>]); 4] {
        [
            ("temperature_2m", self.temperature_2m.as_slice()),
            ("relativehumidity_2m", self.relativehumidity_2m.as_slice()),
            ("windspeed_10m", self.windspeed_10m.as_slice()),
            ("surface_pressure", self.surface_pressure.as_slice()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_with_country() {
        assert_eq!(display_label("Berlin", Some("Germany")), "Berlin, Germany");
    }

    #[test]
    fn test_display_label_without_country() {
        assert_eq!(display_label("Atlantis", None), "Atlantis");
    }

    #[test]
    fn test_display_label_with_blank_country() {
        assert_eq!(display_label("Atlantis", Some("")), "Atlantis");
        assert_eq!(display_label("Atlantis", Some("   ")), "Atlantis");
    }

    #[test]
    fn test_location_new_builds_label() {
        let location = Location::new(52.52, 13.405, "Berlin", Some("Germany"));
        assert_eq!(location.label, "Berlin, Germany");
        assert!((location.latitude - 52.52).abs() < 0.0001);
        assert!((location.longitude - 13.405).abs() < 0.0001);
    }

    #[test]
    fn test_payload_without_hourly_deserializes() {
        let payload: ForecastPayload =
            serde_json::from_str(r#"{"error": true, "reason": "bad latitude"}"#).unwrap();
        assert!(payload.hourly.is_none());
        assert!(payload.utc_offset().is_none());
    }

    #[test]
    fn test_payload_accepts_null_samples() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{
                "utc_offset_seconds": 3600,
                "timezone": "Europe/Berlin",
                "hourly": {
                    "time": ["2024-01-15T00:00", "2024-01-15T01:00"],
                    "temperature_2m": [1.5, null],
                    "relativehumidity_2m": [80, 82],
                    "windspeed_10m": [10.2, 9.8],
                    "surface_pressure": [1012.3, null]
                }
            }"#,
        )
        .unwrap();

        let hourly = payload.hourly.as_ref().unwrap();
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly.temperature_2m, vec![Some(1.5), None]);
        assert_eq!(hourly.surface_pressure[1], None);
        assert_eq!(payload.utc_offset(), FixedOffset::east_opt(3600));
        assert_eq!(payload.timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn test_missing_value_arrays_default_to_empty() {
        let hourly: HourlySeries =
            serde_json::from_str(r#"{"time": ["2024-01-15T00:00"]}"#).unwrap();
        assert_eq!(hourly.len(), 1);
        assert!(hourly.temperature_2m.is_empty());
        assert!(hourly
            .value_columns()
            .iter()
            .all(|(_, values)| values.is_empty()));
    }
}
