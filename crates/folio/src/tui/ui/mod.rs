pub mod components;
pub mod presence;
pub mod weather;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::App;
use components::{colors, footer_line, header_line};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Per-frame inputs the presenters need besides widget state.
#[derive(Debug, Clone, Copy)]
pub struct Tick<'a> {
    /// Epoch milliseconds, for playback progress.
    pub now_ms: i64,
    pub clock_text: &'a str,
    pub spinner_frame: usize,
    pub pulse_on: bool,
}

/// Main render function
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Widgets
            Constraint::Length(1), // Footer border
            Constraint::Length(1), // Hints
        ])
        .split(area);

    let header = header_line("Folio", VERSION, area.width as usize);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let tick = app.tick_view();
    presence::render(f, columns[0], &app.presence_state, &tick);
    weather::render(f, columns[1], &app.weather_state, app.spinner_frame);

    let footer = footer_line(area.width as usize);
    f.render_widget(Paragraph::new(footer), chunks[2]);

    render_hints(f, chunks[3]);
}

fn render_hints(f: &mut Frame, area: ratatui::layout::Rect) {
    let key = Style::default().fg(colors::PRIMARY);
    let dim = Style::default().fg(colors::DIMMED);
    let hints = Line::from(vec![
        Span::styled(" r", key),
        Span::styled(" refresh  ", dim),
        Span::styled("q", key),
        Span::styled(" quit", dim),
    ]);
    f.render_widget(Paragraph::new(hints), area);
}
