//! Discord presence widget data, sourced from the Lanyard API.

pub mod api;
pub mod normalize;
pub mod payload;
pub mod progress;

use serde::Serialize;

pub use api::{LanyardClient, PresenceError};
pub use normalize::normalize;

/// Online status as reported by Discord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Online,
    Idle,
    DoNotDisturb,
    Offline,
}

impl Status {
    /// Parse Lanyard's status string. Anything unrecognised is offline.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "online" => Status::Online,
            "idle" => Status::Idle,
            "dnd" => Status::DoNotDisturb,
            _ => Status::Offline,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Online => "Online",
            Status::Idle => "Idle",
            Status::DoNotDisturb => "Do Not Disturb",
            Status::Offline => "Offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub display_name: String,
    pub user_id: String,
    pub avatar_hash: Option<String>,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Playing,
    Listening,
}

impl ActivityKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Playing => "Playing",
            ActivityKind::Listening => "Listening",
        }
    }
}

/// Start/end of an activity in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub title: String,
    pub details: Option<String>,
    pub state: Option<String>,
    pub image_url: Option<String>,
    pub time_range: Option<TimeRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emoji {
    pub name: Option<String>,
    /// CDN image for custom emoji; unicode emoji have only a name.
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomStatus {
    pub text: Option<String>,
    pub emoji: Option<Emoji>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeviceFlags {
    pub desktop: bool,
    pub mobile: bool,
    pub web: bool,
}

impl DeviceFlags {
    pub fn labels(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.desktop {
            out.push("desktop");
        }
        if self.mobile {
            out.push("mobile");
        }
        if self.web {
            out.push("web");
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotifyTrack {
    pub song: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_art_url: Option<String>,
    pub time_range: Option<TimeRange>,
}

/// Everything the presence card shows, normalized from one Lanyard response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresenceSnapshot {
    pub identity: Identity,
    pub status: Status,
    pub activity: Option<Activity>,
    pub custom_status: Option<CustomStatus>,
    pub devices: DeviceFlags,
    pub spotify: Option<SpotifyTrack>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing() {
        assert_eq!(Status::parse("online"), Status::Online);
        assert_eq!(Status::parse("idle"), Status::Idle);
        assert_eq!(Status::parse("dnd"), Status::DoNotDisturb);
        assert_eq!(Status::parse("offline"), Status::Offline);
        assert_eq!(Status::parse("invisible"), Status::Offline);
        assert_eq!(Status::DoNotDisturb.label(), "Do Not Disturb");
    }

    #[test]
    fn device_labels_in_fixed_order() {
        let flags = DeviceFlags {
            desktop: true,
            mobile: false,
            web: true,
        };
        assert_eq!(flags.labels(), vec!["desktop", "web"]);
        assert!(DeviceFlags::default().labels().is_empty());
    }
}
