use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::components::{
    colors, flower_spinner, joined, loading_verb, section_label, skeleton_bar, status_color,
};
use super::Tick;
use crate::poller::{WidgetState, WidgetView};
use crate::presence::progress::{format_clock, Playback};
use crate::presence::{Activity, ActivityKind, CustomStatus, PresenceSnapshot, Status};

const PROGRESS_WIDTH: usize = 20;

pub fn render(f: &mut Frame, area: Rect, state: &WidgetState<PresenceSnapshot>, tick: &Tick) {
    let block = Block::default()
        .title(Span::styled(" Discord ", Style::default().fg(colors::PRIMARY)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER));
    f.render_widget(Paragraph::new(presence_lines(state, tick)).block(block), area);
}

/// Card content for the current presence state.
pub fn presence_lines(
    state: &WidgetState<PresenceSnapshot>,
    tick: &Tick,
) -> Vec<Line<'static>> {
    match state.view() {
        WidgetView::Loading => skeleton(tick.spinner_frame),
        WidgetView::Unavailable => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Presence unavailable",
                Style::default().fg(colors::ERROR),
            )),
        ],
        WidgetView::Ready(snapshot) => card(snapshot, tick),
    }
}

fn skeleton(frame: usize) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            flower_spinner(frame),
            Span::styled(
                format!(" {} presence…", loading_verb(frame)),
                Style::default().fg(colors::DIMMED),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::raw("  "), skeleton_bar(16)]),
        Line::from(vec![Span::raw("  "), skeleton_bar(10)]),
        Line::from(""),
        Line::from(vec![Span::raw("  "), skeleton_bar(24)]),
    ]
}

fn card(snapshot: &PresenceSnapshot, tick: &Tick) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Online users get a pulsing dot
    let dot = if snapshot.status == Status::Online && !tick.pulse_on {
        "○"
    } else {
        "●"
    };
    lines.push(Line::from(vec![
        Span::styled(dot, Style::default().fg(status_color(snapshot.status))),
        Span::raw(" "),
        Span::styled(
            snapshot.identity.display_name.clone(),
            Style::default()
                .fg(colors::BRIGHT)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    let mut status_parts = vec![snapshot.status.label().to_string()];
    let devices = snapshot.devices.labels();
    if !devices.is_empty() {
        status_parts.push(format!("on {}", devices.join(", ")));
    }
    let mut status_line = joined(status_parts);
    status_line.spans.insert(0, Span::raw("  "));
    lines.push(status_line);

    if let Some(activity) = &snapshot.activity {
        lines.push(Line::from(""));
        lines.extend(activity_lines(activity, tick.now_ms));
    }

    if let Some(custom) = &snapshot.custom_status {
        if let Some(line) = custom_status_line(custom) {
            lines.push(Line::from(""));
            lines.push(line);
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(section_label("Local Time")));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            tick.clock_text.to_string(),
            Style::default()
                .fg(colors::BRIGHT)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    lines
}

fn activity_lines(activity: &Activity, now_ms: i64) -> Vec<Line<'static>> {
    let glyph = match activity.kind {
        ActivityKind::Playing => "▶",
        ActivityKind::Listening => "♫",
    };
    let accent = Style::default().fg(colors::SUCCESS);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(glyph, accent),
            Span::raw(" "),
            Span::styled(
                activity.kind.label().to_uppercase(),
                accent.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                activity.title.clone(),
                Style::default()
                    .fg(colors::BRIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    if let Some(details) = &activity.details {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(details.clone(), Style::default().fg(colors::TEXT)),
        ]));
    }
    if let Some(state) = &activity.state {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(state.clone(), Style::default().fg(colors::DIMMED)),
        ]));
    }

    if let Some(range) = &activity.time_range {
        match Playback::at(range, now_ms) {
            Some(playback) => lines.push(progress_line(&playback)),
            None => lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{} elapsed", format_clock(now_ms.saturating_sub(range.start))),
                    Style::default().fg(colors::DIMMED),
                ),
            ])),
        }
    }

    lines
}

fn progress_line(playback: &Playback) -> Line<'static> {
    let (filled, empty) = progress_bar(playback.percent, PROGRESS_WIDTH);
    Line::from(vec![
        Span::raw("  "),
        Span::styled(filled, Style::default().fg(colors::SUCCESS)),
        Span::styled(empty, Style::default().fg(colors::SKELETON)),
        Span::styled(
            format!(" {} / {}", playback.elapsed, playback.duration),
            Style::default().fg(colors::DIMMED),
        ),
    ])
}

/// Filled and empty halves of a fixed-width bar.
pub fn progress_bar(percent: f64, width: usize) -> (String, String) {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    ("━".repeat(filled), "─".repeat(width - filled))
}

fn custom_status_line(custom: &CustomStatus) -> Option<Line<'static>> {
    let emoji = custom.emoji.as_ref().and_then(|emoji| {
        let name = emoji.name.as_deref()?;
        // Custom emoji only have a shortcode name; unicode emoji are the name itself
        Some(if emoji.url.is_some() {
            format!(":{}:", name)
        } else {
            name.to_string()
        })
    });

    let text = match (emoji, custom.text.as_deref()) {
        (Some(emoji), Some(text)) => format!("{} {}", emoji, text),
        (Some(emoji), None) => emoji,
        (None, Some(text)) => text.to_string(),
        (None, None) => return None,
    };

    Some(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("“{}”", text),
            Style::default()
                .fg(colors::TEXT)
                .add_modifier(Modifier::ITALIC),
        ),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::{DeviceFlags, Emoji, Identity, TimeRange};
    use crate::tui::ui::components::to_plain;

    const NOW: i64 = 1_760_000_090_000;

    fn tick() -> Tick<'static> {
        Tick {
            now_ms: NOW,
            clock_text: "Monday 19th 3:04 PM",
            spinner_frame: 0,
            pulse_on: true,
        }
    }

    fn snapshot() -> PresenceSnapshot {
        PresenceSnapshot {
            identity: Identity {
                display_name: "Nova".into(),
                user_id: "10".into(),
                avatar_hash: None,
                avatar_url: "https://cdn.discordapp.com/embed/avatars/0.png".into(),
            },
            status: Status::Online,
            activity: Some(Activity {
                kind: ActivityKind::Listening,
                title: "Spotify".into(),
                details: Some("Song".into()),
                state: Some("Artist".into()),
                image_url: None,
                time_range: Some(TimeRange {
                    start: NOW - 90_000,
                    end: Some(NOW + 90_000),
                }),
            }),
            custom_status: Some(CustomStatus {
                text: Some("building things".into()),
                emoji: Some(Emoji {
                    name: Some("🛠".into()),
                    url: None,
                }),
            }),
            devices: DeviceFlags {
                desktop: true,
                mobile: false,
                web: true,
            },
            spotify: None,
        }
    }

    fn ready(snapshot: PresenceSnapshot) -> WidgetState<PresenceSnapshot> {
        let mut state = WidgetState::default();
        state.apply::<String>("presence", Ok(snapshot));
        state
    }

    #[test]
    fn loading_shows_skeleton() {
        let lines = presence_lines(&WidgetState::default(), &tick());
        let out = to_plain(&lines);
        assert!(out.contains("presence…"));
        assert!(out.contains('▒'));
        assert!(!out.contains("Local Time"));
    }

    #[test]
    fn first_failure_shows_unavailable() {
        let mut state = WidgetState::<PresenceSnapshot>::default();
        state.apply("presence", Err("offline"));
        let lines = presence_lines(&state, &tick());
        assert!(to_plain(&lines).contains("Presence unavailable"));
        assert_eq!(lines[1].spans[0].style.fg, Some(colors::ERROR));
    }

    #[test]
    fn populated_card() {
        let out = to_plain(&presence_lines(&ready(snapshot()), &tick()));
        assert!(out.contains("● Nova"));
        assert!(out.contains("Online · on desktop, web"));
        assert!(out.contains("♫ LISTENING"));
        assert!(out.contains("Song"));
        assert!(out.contains("1:30 / 3:00"));
        assert!(out.contains("“🛠 building things”"));
        assert!(out.contains("LOCAL TIME"));
        assert!(out.contains("Monday 19th 3:04 PM"));
    }

    #[test]
    fn open_ended_activity_shows_elapsed() {
        let mut snap = snapshot();
        if let Some(activity) = snap.activity.as_mut() {
            activity.kind = ActivityKind::Playing;
            activity.time_range = Some(TimeRange {
                start: NOW - 125_000,
                end: None,
            });
        }
        let out = to_plain(&presence_lines(&ready(snap), &tick()));
        assert!(out.contains("▶ PLAYING"));
        assert!(out.contains("2:05 elapsed"));
    }

    #[test]
    fn extreme_start_renders_without_overflow() {
        let mut snap = snapshot();
        if let Some(activity) = snap.activity.as_mut() {
            activity.kind = ActivityKind::Playing;
            activity.time_range = Some(TimeRange {
                start: i64::MIN,
                end: None,
            });
        }
        let past = Tick {
            now_ms: i64::MAX,
            ..tick()
        };
        let out = to_plain(&presence_lines(&ready(snap), &past));
        assert!(out.contains(" elapsed"));
    }

    #[test]
    fn online_dot_pulses() {
        let state = ready(snapshot());
        let off = Tick {
            pulse_on: false,
            ..tick()
        };
        assert!(to_plain(&presence_lines(&state, &off)).starts_with("○ Nova"));

        let mut idle = snapshot();
        idle.status = Status::Idle;
        assert!(to_plain(&presence_lines(&ready(idle), &off)).starts_with("● Nova"));
    }

    #[test]
    fn custom_emoji_uses_shortcode() {
        let custom = CustomStatus {
            text: None,
            emoji: Some(Emoji {
                name: Some("blobwave".into()),
                url: Some("https://cdn.discordapp.com/emojis/1.png".into()),
            }),
        };
        let line = custom_status_line(&custom).unwrap();
        assert!(to_plain(&[line]).contains(":blobwave:"));

        let empty = CustomStatus {
            text: None,
            emoji: None,
        };
        assert!(custom_status_line(&empty).is_none());
    }

    #[test]
    fn progress_bar_splits_width() {
        assert_eq!(progress_bar(50.0, 10), ("━".repeat(5), "─".repeat(5)));
        assert_eq!(progress_bar(0.0, 4), (String::new(), "─".repeat(4)));
        assert_eq!(progress_bar(150.0, 4), ("━".repeat(4), String::new()));
    }
}
