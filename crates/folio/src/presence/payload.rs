//! Wire format of the Lanyard `/v1/users/{id}` response.
//!
//! Everything the API might omit is optional or defaulted here; deciding what
//! is actually required happens in [`super::normalize`].

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanyardResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<PresencePayload>,
    #[serde(default)]
    pub error: Option<LanyardError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanyardError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresencePayload {
    #[serde(default)]
    pub discord_user: Option<DiscordUser>,
    #[serde(default)]
    pub discord_status: Option<String>,
    #[serde(default)]
    pub activities: Vec<RawActivity>,
    #[serde(default)]
    pub spotify: Option<RawSpotify>,
    #[serde(default)]
    pub listening_to_spotify: bool,
    #[serde(default)]
    pub active_on_discord_desktop: bool,
    #[serde(default)]
    pub active_on_discord_mobile: bool,
    #[serde(default)]
    pub active_on_discord_web: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawActivity {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub timestamps: Option<RawTimestamps>,
    #[serde(default)]
    pub assets: Option<RawAssets>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub application_id: Option<String>,
    #[serde(default)]
    pub emoji: Option<RawEmoji>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawTimestamps {
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAssets {
    #[serde(default)]
    pub large_image: Option<String>,
    #[serde(default)]
    pub large_text: Option<String>,
    #[serde(default)]
    pub small_image: Option<String>,
    #[serde(default)]
    pub small_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEmoji {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub animated: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSpotify {
    #[serde(default)]
    pub track_id: Option<String>,
    #[serde(default)]
    pub timestamps: Option<RawTimestamps>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub album_art_url: Option<String>,
}

/// Snowflakes arrive as strings, but tolerate bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(u64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Num(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_success() {
        let json = r#"{"success": true, "data": {"discord_user": {"id": "1"}}}"#;
        let resp: LanyardResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data.discord_user.unwrap().id, "1");
        assert!(data.activities.is_empty());
        assert!(!data.listening_to_spotify);
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let json = r#"{"id": 714702739908722742, "username": "nova"}"#;
        let user: DiscordUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "714702739908722742");
    }

    #[test]
    fn null_optional_fields_are_none() {
        let json = r#"{"name": "Game", "type": 0, "state": null, "application_id": null}"#;
        let activity: RawActivity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, 0);
        assert!(activity.state.is_none());
        assert!(activity.application_id.is_none());
    }

    #[test]
    fn failure_envelope_carries_message() {
        let json = r#"{"success": false, "error": {"code": "user_not_monitored", "message": "User is not being monitored by Lanyard"}}"#;
        let resp: LanyardResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.error.unwrap().code.as_deref(), Some("user_not_monitored"));
    }
}
