use ratatui::{style::Style, text::Span};

use super::colors;

/// Flower spinner frames
pub const FLOWER_FRAMES: &[char] = &['✻', '✼', '✽', '✾', '✿', '❀', '❁'];

/// Get flower spinner character for current frame
pub fn flower_spinner(frame: usize) -> Span<'static> {
    let ch = FLOWER_FRAMES[frame % FLOWER_FRAMES.len()];
    Span::styled(ch.to_string(), Style::default().fg(colors::WARNING))
}

/// Verb shown next to the spinner while a widget waits for its first snapshot
pub fn loading_verb(frame: usize) -> &'static str {
    const VERBS: &[&str] = &["Fetching", "Listening", "Tuning in", "Asking around"];
    VERBS[(frame / 10) % VERBS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_wraps_around() {
        assert_eq!(flower_spinner(0).content, "✻");
        assert_eq!(flower_spinner(FLOWER_FRAMES.len()).content, "✻");
        assert_eq!(flower_spinner(4).content, "✿");
    }

    #[test]
    fn verb_changes_slowly() {
        assert_eq!(loading_verb(0), loading_verb(9));
        assert_ne!(loading_verb(0), loading_verb(10));
    }
}
