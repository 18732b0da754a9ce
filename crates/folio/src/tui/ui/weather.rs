use chrono::NaiveDateTime;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::components::{colors, flower_spinner, joined, loading_verb, section_label, skeleton_bar};
use crate::poller::{WidgetState, WidgetView};
use crate::weather::WeatherSnapshot;

pub fn render(
    f: &mut Frame,
    area: Rect,
    state: &WidgetState<WeatherSnapshot>,
    spinner_frame: usize,
) {
    let block = Block::default()
        .title(Span::styled(" Weather ", Style::default().fg(colors::ACCENT)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER));
    f.render_widget(
        Paragraph::new(weather_lines(state, spinner_frame)).block(block),
        area,
    );
}

/// Card content for the current weather state.
///
/// Only the snapshot is consulted, so a failed refresh after a success draws
/// exactly what was there before.
pub fn weather_lines(
    state: &WidgetState<WeatherSnapshot>,
    spinner_frame: usize,
) -> Vec<Line<'static>> {
    match state.view() {
        WidgetView::Loading => skeleton(spinner_frame),
        WidgetView::Unavailable => vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  ☁ ", Style::default().fg(colors::DIMMED)),
                Span::styled("Weather unavailable", Style::default().fg(colors::ERROR)),
            ]),
        ],
        WidgetView::Ready(snapshot) => card(snapshot),
    }
}

fn skeleton(frame: usize) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            flower_spinner(frame),
            Span::styled(
                format!(" {} forecast…", loading_verb(frame)),
                Style::default().fg(colors::DIMMED),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::raw("  "), skeleton_bar(8)]),
        Line::from(vec![Span::raw("  "), skeleton_bar(20)]),
        Line::from(""),
        Line::from(vec![Span::raw("  "), skeleton_bar(14)]),
        Line::from(vec![Span::raw("  "), skeleton_bar(14)]),
    ]
}

fn card(w: &WeatherSnapshot) -> Vec<Line<'static>> {
    let accent = Style::default().fg(colors::ACCENT);
    let bright = Style::default()
        .fg(colors::BRIGHT)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(colors::DIMMED);

    let mut lines = vec![Line::from(vec![
        section_label("Weather near me"),
        Span::styled(format!("  {}", w.location), dim),
    ])];

    // Current
    let (description, icon) = w.current_condition();
    lines.push(Line::from(vec![
        Span::styled(format!("  {} ", icon.glyph()), accent),
        Span::styled(format!("{}°C", w.current.temperature), bright),
        Span::styled(format!("  {}", description), Style::default().fg(colors::TEXT)),
    ]));
    lines.push(indent(joined(vec![
        format!("Humidity {}%", w.current.humidity),
        format!("Wind {} km/h", w.current.wind_speed),
    ])));

    let mut extra = Vec::new();
    if let Some(feels) = w.current.feels_like {
        extra.push(format!("Feels like {}°C", feels));
    }
    if let Some(pressure) = w.current.pressure {
        extra.push(format!("Pressure {} hPa", pressure));
    }
    if let Some(uv) = w.current.uv_index {
        extra.push(format!("UV {}", uv));
    }
    if !extra.is_empty() {
        lines.push(indent(joined(extra)));
    }
    let sun = sun_times(w.current.sunrise, w.current.sunset);
    if !sun.is_empty() {
        lines.push(indent(joined(sun)));
    }

    // Next hour
    let next = &w.next_hour;
    let (description, icon) = w.next_hour_condition();
    lines.push(Line::from(""));
    let mut heading = vec![section_label("Next hour")];
    if let Some(time) = next.time {
        heading.push(Span::styled(format!("  {}", time.format("%H:%M")), dim));
    }
    lines.push(Line::from(heading));
    let mut spans = vec![
        Span::styled(format!("  {} ", icon.glyph()), accent),
        Span::styled(format!("{}°", next.temperature), bright),
        Span::styled(format!("  {}", description), Style::default().fg(colors::TEXT)),
    ];
    if next.precipitation_probability > 0 {
        spans.push(Span::styled(
            format!("  ☂ {}%", next.precipitation_probability),
            accent,
        ));
    }
    lines.push(Line::from(spans));
    let mut details = Vec::new();
    if let Some(feels) = next.feels_like {
        details.push(format!("Feels like {}°C", feels));
    }
    if let Some(humidity) = next.humidity {
        details.push(format!("Humidity {}%", humidity));
    }
    if let Some(wind) = next.wind_speed {
        details.push(format!("Wind {} km/h", wind));
    }
    if !details.is_empty() {
        lines.push(indent(joined(details)));
    }

    // Tomorrow
    let day = &w.next_day;
    let (description, icon) = w.next_day_condition();
    lines.push(Line::from(""));
    lines.push(Line::from(section_label("Tomorrow")));
    let mut spans = vec![
        Span::styled(format!("  {} ", icon.glyph()), accent),
        Span::styled(format!("{}°", day.temp_max), bright),
        Span::styled(format!(" {}°", day.temp_min), dim),
        Span::styled(format!("  {}", description), Style::default().fg(colors::TEXT)),
    ];
    if day.precipitation_sum > 0.0 {
        spans.push(Span::styled(
            format!("  ☂ {:.1}mm", day.precipitation_sum),
            accent,
        ));
    }
    lines.push(Line::from(spans));
    let mut details = Vec::new();
    if let Some(humidity) = day.humidity {
        details.push(format!("Humidity {}%", humidity));
    }
    if let Some(wind) = day.wind_speed {
        details.push(format!("Wind {} km/h", wind));
    }
    details.extend(sun_times(day.sunrise, day.sunset));
    if !details.is_empty() {
        lines.push(indent(joined(details)));
    }

    lines
}

fn sun_times(sunrise: Option<NaiveDateTime>, sunset: Option<NaiveDateTime>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(t) = sunrise {
        out.push(format!("Sunrise {}", t.format("%H:%M")));
    }
    if let Some(t) = sunset {
        out.push(format!("Sunset {}", t.format("%H:%M")));
    }
    out
}

fn indent(mut line: Line<'static>) -> Line<'static> {
    line.spans.insert(0, Span::raw("  "));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::ui::components::to_plain;
    use crate::weather::{CurrentConditions, NextDay, NextHour};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            current: CurrentConditions {
                temperature: 12,
                feels_like: Some(10),
                weather_code: 2,
                humidity: 81,
                wind_speed: 14,
                pressure: Some(1013),
                uv_index: None,
                sunrise: Some(at(7, 31)),
                sunset: Some(at(17, 52)),
                is_day: false,
            },
            next_hour: NextHour {
                time: Some(at(21, 0)),
                temperature: 11,
                weather_code: 61,
                precipitation_probability: 40,
                humidity: Some(85),
                wind_speed: None,
                feels_like: None,
            },
            next_day: NextDay {
                temp_max: 15,
                temp_min: 8,
                weather_code: 0,
                precipitation_sum: 0.0,
                sunrise: None,
                sunset: None,
                humidity: None,
                wind_speed: Some(20),
            },
            location: "Uk".into(),
        }
    }

    fn ready() -> WidgetState<WeatherSnapshot> {
        let mut state = WidgetState::default();
        state.apply::<String>("weather", Ok(snapshot()));
        state
    }

    #[test]
    fn loading_and_unavailable() {
        let mut state = WidgetState::<WeatherSnapshot>::default();
        assert!(to_plain(&weather_lines(&state, 0)).contains("forecast…"));
        state.apply("weather", Err("timeout"));
        let lines = weather_lines(&state, 0);
        assert!(to_plain(&lines).contains("Weather unavailable"));
        assert_eq!(lines[1].spans[1].style.fg, Some(colors::ERROR));
    }

    #[test]
    fn populated_card() {
        let out = to_plain(&weather_lines(&ready(), 0));
        assert!(out.contains("WEATHER NEAR ME  Uk"));
        assert!(out.contains("12°C  Partly cloudy"));
        assert!(out.contains("Humidity 81% · Wind 14 km/h"));
        assert!(out.contains("Feels like 10°C · Pressure 1013 hPa"));
        assert!(!out.contains("UV"));
        assert!(out.contains("Sunrise 07:31 · Sunset 17:52"));
        assert!(out.contains("NEXT HOUR  21:00"));
        assert!(out.contains("11°  Light rain  ☂ 40%"));
        assert!(out.contains("15° 8°  Clear sky"));
        assert!(!out.contains("mm"));
        assert!(out.contains("Wind 20 km/h"));
    }

    #[test]
    fn icons_follow_day_night_rules() {
        let w = snapshot();
        let out = to_plain(&weather_lines(&ready(), 0));
        let (_, current) = w.current_condition();
        let (_, tomorrow) = w.next_day_condition();
        assert!(out.contains(&format!("{} 12°C", current.glyph())));
        assert!(out.contains(&format!("{} 15°", tomorrow.glyph())));
    }

    #[test]
    fn stale_state_renders_like_fresh() {
        let fresh = ready();
        let mut stale = fresh.clone();
        stale.apply("weather", Err("HTTP error: connection reset"));
        assert!(stale.is_stale());
        assert_eq!(weather_lines(&fresh, 3), weather_lines(&stale, 3));
    }

    #[test]
    fn precipitation_sum_has_one_decimal() {
        let mut w = snapshot();
        w.next_day.precipitation_sum = 2.4;
        let mut state = WidgetState::default();
        state.apply::<String>("weather", Ok(w));
        assert!(to_plain(&weather_lines(&state, 0)).contains("☂ 2.4mm"));
    }
}
