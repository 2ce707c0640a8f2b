//! Main screen rendering
//!
//! Renders the city input line, then whichever of the loading, error or
//! result panels matches the current display state, then a key hint footer.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, DisplayState, ResultView};

/// Renders the main screen for the current state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Min(8),    // State panel
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_input(frame, app, chunks[0]);

    match &app.state {
        DisplayState::Loading => render_loading(frame, chunks[1]),
        DisplayState::Error => render_error(frame, app, chunks[1]),
        DisplayState::Result(view) => render_result(frame, view, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);
}

/// Renders the city input line with a block cursor
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::raw(app.input.clone()),
        Span::styled("█", Style::default().fg(Color::DarkGray)),
    ]);

    let input = Paragraph::new(line).block(
        Block::default()
            .title(" Search city ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(input, area);
}

/// Renders a loading message while a lookup is in flight
fn render_loading(frame: &mut Frame, area: Rect) {
    let loading_text = Paragraph::new("Loading weather data...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(loading_text, area);
}

/// Renders the error panel with the retry hint
fn render_error(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("The city could not be found or the forecast is unavailable."),
        Line::from(""),
        Line::from(vec![
            Span::styled("Ctrl+R", Style::default().fg(Color::Yellow)),
            Span::raw(format!(" Retry with {}", app.default_city())),
        ]),
    ];

    let error = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Error ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );

    frame.render_widget(error, area);
}

/// Renders the selected sample for the resolved city
fn render_result(frame: &mut Frame, view: &ResultView, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            view.label.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Forecast for {}", view.sample_time),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        value_line("Temperature", &view.temperature, Color::Yellow),
        value_line("Humidity", &view.humidity, Color::Blue),
        value_line("Wind", &view.wind, Color::Green),
        value_line("Pressure", &view.pressure, Color::Magenta),
    ];

    let result = Paragraph::new(lines).block(
        Block::default()
            .title(" Weather ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(result, area);
}

/// Creates a labelled value line
fn value_line(label: &str, value: &str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", label), Style::default().fg(Color::Gray)),
        Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Renders the key hints for the current state
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec!["Enter search", "F1 help", "Esc quit"];
    if app.state == DisplayState::Error {
        hints.insert(1, "Ctrl+R retry");
    }

    let footer = Paragraph::new(hints.join("  |  "))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StartupConfig;
    use crate::data::HourlySeries;
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                render(frame, app);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn result_view() -> ResultView {
        let hourly = HourlySeries {
            time: vec!["2024-07-15T14:00".to_string()],
            temperature_2m: vec![Some(12.0)],
            relativehumidity_2m: vec![Some(65.0)],
            windspeed_10m: vec![Some(5.4)],
            surface_pressure: vec![Some(1013.2)],
        };
        ResultView::from_sample("Berlin, Germany", &hourly, 0)
    }

    #[test]
    fn test_loading_renders() {
        let app = App::new(&StartupConfig::default());
        let content = render_to_string(&app);

        assert!(content.contains("Loading weather data"));
        assert!(!content.contains("Something went wrong"));
        assert!(!content.contains("Temperature"));
    }

    #[test]
    fn test_error_renders_retry_hint() {
        let mut app = App::new(&StartupConfig::default());
        app.enter_error();
        let content = render_to_string(&app);

        assert!(content.contains("Something went wrong"));
        assert!(content.contains("Retry with Berlin"));
        assert!(content.contains("Ctrl+R retry"));
        assert!(!content.contains("Loading weather data"));
    }

    #[test]
    fn test_result_renders_slots() {
        let mut app = App::new(&StartupConfig::default());
        app.state = DisplayState::Result(result_view());
        let content = render_to_string(&app);

        assert!(content.contains("Berlin, Germany"));
        assert!(content.contains("12 °C"));
        assert!(content.contains("65 %"));
        assert!(content.contains("5.4 km/h"));
        assert!(content.contains("1013.2 hPa"));
        assert!(content.contains("2024-07-15T14:00"));
        assert!(!content.contains("Ctrl+R retry"));
    }

    #[test]
    fn test_input_line_shows_typed_text() {
        let mut app = App::new(&StartupConfig::default());
        app.input = "Lisbon".to_string();
        let content = render_to_string(&app);

        assert!(content.contains("Search city"));
        assert!(content.contains("Lisbon"));
    }
}
