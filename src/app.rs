//! Application state management for City Weather
//!
//! This module owns the display state (loading, error or result), the city
//! input line, and keyboard handling. The `enter_*` methods are the only way
//! the visible state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::cli::StartupConfig;
use crate::data::HourlySeries;
use crate::pipeline::{PipelineOutcome, PipelineRequest, WeatherLookup};
use crate::selector::nearest_index;

/// The view currently shown; exactly one is visible at a time
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    /// A lookup is in flight
    Loading,
    /// The last lookup failed
    Error,
    /// The last lookup succeeded
    Result(ResultView),
}

/// Display slots for a successful lookup, already formatted
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// "City, Country" label
    pub label: String,
    /// Temperature, e.g. "12 °C"
    pub temperature: String,
    /// Relative humidity, e.g. "80 %"
    pub humidity: String,
    /// Wind speed, e.g. "5.4 km/h"
    pub wind: String,
    /// Surface pressure, e.g. "1013.2 hPa"
    pub pressure: String,
    /// Raw timestamp of the selected sample
    pub sample_time: String,
    /// Index of the selected sample in the hourly series
    pub index: usize,
}

impl ResultView {
    /// Builds the display slots for the sample at `index`
    pub fn from_sample(label: &str, hourly: &HourlySeries, index: usize) -> Self {
        Self {
            label: label.to_string(),
            temperature: format_slot(sample(&hourly.temperature_2m, index), "°C"),
            humidity: format_slot(sample(&hourly.relativehumidity_2m, index), "%"),
            wind: format_slot(sample(&hourly.windspeed_10m, index), "km/h"),
            pressure: format_slot(sample(&hourly.surface_pressure, index), "hPa"),
            sample_time: hourly.time.get(index).cloned().unwrap_or_default(),
            index,
        }
    }
}

fn sample(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

/// Formats a sampled value with its unit, e.g. `12 °C`
///
/// Missing samples render as `n/a`. Negative zero renders as `0`.
pub fn format_slot(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {}", v + 0.0, unit),
        None => format!("n/a {}", unit),
    }
}

/// Main application struct managing state and input
pub struct App {
    /// Currently visible view
    pub state: DisplayState,
    /// Text in the city input line
    pub input: String,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// City used at startup and by retry
    default_city: String,
    /// Whether outcomes of superseded runs are dropped
    latest_only: bool,
    /// Token of the most recently issued run
    last_token: u64,
}

impl App {
    /// Creates a new App in the loading state
    pub fn new(config: &StartupConfig) -> Self {
        Self {
            state: DisplayState::Loading,
            input: String::new(),
            should_quit: false,
            show_help: false,
            default_city: config.default_city.clone(),
            latest_only: config.latest_only,
            last_token: 0,
        }
    }

    /// City used at startup and by retry
    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    /// Token of the most recently issued run (0 before any run)
    pub fn last_token(&self) -> u64 {
        self.last_token
    }

    /// Shows the loading view
    pub fn enter_loading(&mut self) {
        self.state = DisplayState::Loading;
    }

    /// Shows the error view
    pub fn enter_error(&mut self) {
        self.state = DisplayState::Error;
    }

    /// Selects the sample nearest to now and shows it
    pub fn enter_result(&mut self, lookup: &WeatherLookup) {
        let index = nearest_index(&lookup.hourly.time, lookup.utc_offset);
        debug!(index, time = ?lookup.hourly.time.get(index), "Selected nearest sample");
        self.state = DisplayState::Result(ResultView::from_sample(
            &lookup.location.label,
            &lookup.hourly,
            index,
        ));
    }

    /// Starts a lookup for the default city
    pub fn start_default(&mut self) -> PipelineRequest {
        let city = self.default_city.clone();
        self.begin(city)
    }

    /// Submits the input line
    ///
    /// Blank input is ignored: no lookup is started and the view is unchanged.
    pub fn submit(&mut self) -> Option<PipelineRequest> {
        let city = self.input.trim();
        if city.is_empty() {
            return None;
        }
        let city = city.to_string();
        Some(self.begin(city))
    }

    /// Retries after an error, always with the default city
    ///
    /// Only available while the error view is visible.
    pub fn retry(&mut self) -> Option<PipelineRequest> {
        if self.state != DisplayState::Error {
            return None;
        }
        Some(self.start_default())
    }

    fn begin(&mut self, city: String) -> PipelineRequest {
        self.last_token += 1;
        self.enter_loading();
        PipelineRequest {
            token: self.last_token,
            city,
        }
    }

    /// Applies a finished run to the display
    ///
    /// Returns `false` when the outcome was dropped because a newer run has
    /// been issued and `--latest-only` is on.
    pub fn apply_outcome(&mut self, outcome: PipelineOutcome) -> bool {
        if self.latest_only && outcome.token != self.last_token {
            info!(
                token = outcome.token,
                latest = self.last_token,
                city = %outcome.city,
                "Dropping stale lookup result"
            );
            return false;
        }

        match outcome.result {
            Ok(lookup) => self.enter_result(&lookup),
            Err(_) => self.enter_error(),
        }
        true
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Returns
    /// A lookup to start, if the key submitted one
    ///
    /// # Key Bindings
    /// - Printable characters: edit the city input
    /// - `Backspace`: delete the last character
    /// - `Enter`: look up the typed city
    /// - `Ctrl+R` (error view only): retry with the default city
    /// - `F1`: toggle help overlay
    /// - `Esc`: close help, or quit
    /// - `Ctrl+C`: quit
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Option<PipelineRequest> {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key_event.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return None;
        }

        match key_event.code {
            KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::F(1) => {
                self.show_help = true;
                None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char('r') if ctrl => self.retry(),
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }
}
