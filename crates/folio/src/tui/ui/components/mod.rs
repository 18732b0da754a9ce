pub mod spinner;

pub use spinner::{flower_spinner, loading_verb};

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::presence::Status;

/// Color palette
pub mod colors {
    use ratatui::style::Color;

    pub const PRIMARY: Color = Color::Rgb(99, 102, 241); // #6366F1
    pub const ACCENT: Color = Color::Rgb(56, 189, 248); // #38BDF8
    pub const SUCCESS: Color = Color::Rgb(74, 222, 128); // #4ADE80
    pub const WARNING: Color = Color::Rgb(255, 217, 61); // #FFD93D
    pub const ERROR: Color = Color::Rgb(255, 107, 107); // #FF6B6B
    pub const DIMMED: Color = Color::Rgb(113, 113, 122); // #71717A
    pub const TEXT: Color = Color::Rgb(204, 204, 204); // #CCC
    pub const BRIGHT: Color = Color::Rgb(255, 255, 255);
    pub const SKELETON: Color = Color::Rgb(63, 63, 70); // #3F3F46
    pub const BORDER: Color = Color::Rgb(68, 68, 68); // #444
}

/// Create a styled header line with rounded borders
pub fn header_line(title: &str, version: &str, width: usize) -> Line<'static> {
    let title_part = format!("─── {} ", title);
    let version_part = format!("v{} ", version);
    let used = title_part.chars().count() + version_part.chars().count() + 2; // 2 for ╭ and ╮
    let remaining = width.saturating_sub(used);

    Line::from(vec![
        Span::styled("╭", Style::default().fg(colors::PRIMARY)),
        Span::styled(title_part, Style::default().fg(colors::PRIMARY)),
        Span::styled(version_part, Style::default().fg(colors::DIMMED)),
        Span::styled("─".repeat(remaining), Style::default().fg(colors::PRIMARY)),
        Span::styled("╮", Style::default().fg(colors::PRIMARY)),
    ])
}

/// Create a footer line
pub fn footer_line(width: usize) -> Line<'static> {
    let inner = "─".repeat(width.saturating_sub(2));
    Line::from(vec![
        Span::styled("╰", Style::default().fg(colors::PRIMARY)),
        Span::styled(inner, Style::default().fg(colors::PRIMARY)),
        Span::styled("╯", Style::default().fg(colors::PRIMARY)),
    ])
}

/// Small uppercase caption above a card section
pub fn section_label(text: &str) -> Span<'static> {
    Span::styled(
        text.to_uppercase(),
        Style::default()
            .fg(colors::DIMMED)
            .add_modifier(Modifier::BOLD),
    )
}

/// Grey placeholder bar standing in for text that has not loaded yet
pub fn skeleton_bar(width: usize) -> Span<'static> {
    Span::styled("▒".repeat(width), Style::default().fg(colors::SKELETON))
}

/// Items joined with a dimmed middle dot
pub fn joined(items: Vec<String>) -> Line<'static> {
    let mut spans = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(colors::DIMMED)));
        }
        spans.push(Span::styled(item, Style::default().fg(colors::TEXT)));
    }
    Line::from(spans)
}

/// Lines as unstyled text, for non-interactive output
pub fn to_plain(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn status_color(status: Status) -> ratatui::style::Color {
    use ratatui::style::Color;
    match status {
        Status::Online => Color::Rgb(34, 197, 94), // #22C55E
        Status::Idle => Color::Rgb(234, 179, 8), // #EAB308
        Status::DoNotDisturb => Color::Rgb(239, 68, 68), // #EF4444
        Status::Offline => colors::DIMMED,
    }
}
