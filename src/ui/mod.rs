//! UI rendering module for City Weather
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod weather_view;

use ratatui::Frame;

use crate::app::App;

/// Renders the whole screen, with the help overlay on top when open
pub fn render(frame: &mut Frame, app: &App) {
    weather_view::render(frame, app);

    if app.show_help {
        help_overlay::render(frame, app.default_city());
    }
}
