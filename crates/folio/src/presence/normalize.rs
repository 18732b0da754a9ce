//! Lanyard payload → [`PresenceSnapshot`].

use super::api::PresenceError;
use super::payload::{LanyardResponse, PresencePayload, RawActivity, RawEmoji, RawSpotify};
use super::{
    Activity, ActivityKind, CustomStatus, DeviceFlags, Emoji, Identity, PresenceSnapshot,
    SpotifyTrack, Status, TimeRange,
};

const DISCORD_CDN: &str = "https://cdn.discordapp.com";
const DISCORD_MEDIA_PROXY: &str = "https://media.discordapp.net";
const SPOTIFY_IMAGE_CDN: &str = "https://i.scdn.co/image";

const ACTIVITY_PLAYING: u8 = 0;
const ACTIVITY_LISTENING: u8 = 2;
const ACTIVITY_CUSTOM: u8 = 4;

/// Validate a Lanyard response and build the snapshot.
pub fn normalize(response: LanyardResponse) -> Result<PresenceSnapshot, PresenceError> {
    if !response.success {
        let message = response
            .error
            .and_then(|e| e.message.or(e.code))
            .unwrap_or_else(|| "response did not report success".to_string());
        return Err(PresenceError::Unsuccessful(message));
    }
    let data = response
        .data
        .ok_or_else(|| PresenceError::Malformed("missing data".to_string()))?;
    from_payload(data)
}

fn from_payload(data: PresencePayload) -> Result<PresenceSnapshot, PresenceError> {
    let user = data
        .discord_user
        .ok_or_else(|| PresenceError::Malformed("missing discord_user".to_string()))?;

    let display_name = user
        .global_name
        .filter(|n| !n.is_empty())
        .or(user.display_name.filter(|n| !n.is_empty()))
        .unwrap_or_else(|| user.username.clone());

    let identity = Identity {
        avatar_url: avatar_url(&user.id, user.avatar.as_deref()),
        display_name,
        user_id: user.id,
        avatar_hash: user.avatar,
    };

    let spotify = data
        .spotify
        .as_ref()
        .filter(|_| data.listening_to_spotify)
        .map(spotify_track);

    let activity = select_primary_activity(&data.activities).map(|raw| Activity {
        kind: if raw.kind == ACTIVITY_PLAYING {
            ActivityKind::Playing
        } else {
            ActivityKind::Listening
        },
        title: raw.name.clone(),
        details: raw.details.clone().filter(|s| !s.is_empty()),
        state: raw.state.clone().filter(|s| !s.is_empty()),
        image_url: resolve_activity_image(raw, spotify.as_ref()),
        time_range: raw
            .timestamps
            .and_then(|ts| time_range(ts.start, ts.end))
            .or_else(|| spotify.as_ref().and_then(|s| s.time_range)),
    });

    let custom_status = data
        .activities
        .iter()
        .find(|a| a.kind == ACTIVITY_CUSTOM)
        .and_then(custom_status);

    Ok(PresenceSnapshot {
        identity,
        status: Status::parse(data.discord_status.as_deref().unwrap_or("offline")),
        activity,
        custom_status,
        devices: DeviceFlags {
            desktop: data.active_on_discord_desktop,
            mobile: data.active_on_discord_mobile,
            web: data.active_on_discord_web,
        },
        spotify,
    })
}

/// Avatar URL for a user, falling back to one of Discord's default avatars.
pub fn avatar_url(user_id: &str, avatar_hash: Option<&str>) -> String {
    match avatar_hash.filter(|h| !h.is_empty()) {
        Some(hash) => {
            let ext = if hash.starts_with("a_") { "gif" } else { "webp" };
            format!(
                "{}/avatars/{}/{}.{}?size=128",
                DISCORD_CDN, user_id, hash, ext
            )
        }
        None => format!(
            "{}/embed/avatars/{}.png",
            DISCORD_CDN,
            default_avatar_index(user_id)
        ),
    }
}

/// `id mod 5`; ids that are not numbers use index 0.
pub fn default_avatar_index(user_id: &str) -> u64 {
    user_id.trim().parse::<u64>().map(|id| id % 5).unwrap_or(0)
}

/// First activity, in list order, that is playing or listening.
pub fn select_primary_activity(activities: &[RawActivity]) -> Option<&RawActivity> {
    activities
        .iter()
        .find(|a| a.kind == ACTIVITY_PLAYING || a.kind == ACTIVITY_LISTENING)
}

/// Art for the primary activity.
///
/// Spotify album art wins when the user is listening; otherwise the large
/// asset image is resolved by its prefix.
pub fn resolve_activity_image(
    activity: &RawActivity,
    spotify: Option<&SpotifyTrack>,
) -> Option<String> {
    if let Some(url) = spotify.and_then(|s| s.album_art_url.clone()) {
        return Some(url);
    }

    let image = activity
        .assets
        .as_ref()
        .and_then(|a| a.large_image.as_deref())
        .filter(|s| !s.is_empty())?;

    if let Some(id) = image.strip_prefix("spotify:") {
        Some(format!("{}/{}", SPOTIFY_IMAGE_CDN, id))
    } else if let Some(rest) = image.strip_prefix("mp:external/") {
        Some(format!("{}/external/{}", DISCORD_MEDIA_PROXY, rest))
    } else {
        activity
            .application_id
            .as_deref()
            .map(|app| format!("{}/app-assets/{}/{}.png", DISCORD_CDN, app, image))
    }
}

fn time_range(start: Option<i64>, end: Option<i64>) -> Option<TimeRange> {
    start.map(|start| TimeRange { start, end })
}

fn spotify_track(raw: &RawSpotify) -> SpotifyTrack {
    SpotifyTrack {
        song: raw.song.clone().unwrap_or_default(),
        artist: raw.artist.clone(),
        album: raw.album.clone(),
        album_art_url: raw.album_art_url.clone().filter(|s| !s.is_empty()),
        time_range: raw
            .timestamps
            .and_then(|ts| time_range(ts.start, ts.end)),
    }
}

fn custom_status(raw: &RawActivity) -> Option<CustomStatus> {
    let text = raw.state.clone().filter(|s| !s.is_empty());
    let emoji = raw.emoji.as_ref().and_then(emoji);
    if text.is_none() && emoji.is_none() {
        return None;
    }
    Some(CustomStatus { text, emoji })
}

fn emoji(raw: &RawEmoji) -> Option<Emoji> {
    let url = raw.id.as_ref().map(|id| {
        let ext = if raw.animated { "gif" } else { "png" };
        format!("{}/emojis/{}.{}", DISCORD_CDN, id, ext)
    });
    if raw.name.is_none() && url.is_none() {
        return None;
    }
    Some(Emoji {
        name: raw.name.clone(),
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::payload::{DiscordUser, RawAssets, RawTimestamps};
    use serde_json::json;

    fn activity(kind: u8, name: &str) -> RawActivity {
        RawActivity {
            name: name.to_string(),
            kind,
            ..Default::default()
        }
    }

    fn response(data: serde_json::Value) -> LanyardResponse {
        serde_json::from_value(json!({ "success": true, "data": data })).unwrap()
    }

    #[test]
    fn animated_avatar_uses_gif() {
        let url = avatar_url("42", Some("a_abc"));
        assert_eq!(url, "https://cdn.discordapp.com/avatars/42/a_abc.gif?size=128");
    }

    #[test]
    fn static_avatar_uses_webp() {
        let url = avatar_url("42", Some("abc"));
        assert_eq!(url, "https://cdn.discordapp.com/avatars/42/abc.webp?size=128");
    }

    #[test]
    fn missing_avatar_uses_id_mod_five() {
        assert_eq!(
            avatar_url("10", None),
            "https://cdn.discordapp.com/embed/avatars/0.png"
        );
        assert_eq!(default_avatar_index("714702739908722742"), 2);
        assert_eq!(default_avatar_index("not-a-number"), 0);
        assert_eq!(
            avatar_url("13", Some("")),
            "https://cdn.discordapp.com/embed/avatars/3.png"
        );
    }

    #[test]
    fn primary_activity_is_first_playing_or_listening() {
        let list = vec![activity(3, "watching"), activity(2, "music"), activity(0, "game")];
        let picked = select_primary_activity(&list).unwrap();
        assert_eq!(picked.kind, 2);
        assert_eq!(picked.name, "music");

        let none = vec![activity(4, "custom"), activity(3, "watching")];
        assert!(select_primary_activity(&none).is_none());
    }

    #[test]
    fn image_prefixes_resolve() {
        let mut a = activity(0, "x");
        a.assets = Some(RawAssets {
            large_image: Some("spotify:ab67616d0000b273".to_string()),
            ..Default::default()
        });
        assert_eq!(
            resolve_activity_image(&a, None).as_deref(),
            Some("https://i.scdn.co/image/ab67616d0000b273")
        );

        a.assets = Some(RawAssets {
            large_image: Some("mp:external/abc/https/example.com/x.png".to_string()),
            ..Default::default()
        });
        assert_eq!(
            resolve_activity_image(&a, None).as_deref(),
            Some("https://media.discordapp.net/external/abc/https/example.com/x.png")
        );

        a.assets = Some(RawAssets {
            large_image: Some("123456".to_string()),
            ..Default::default()
        });
        assert_eq!(resolve_activity_image(&a, None), None);

        a.application_id = Some("999".to_string());
        assert_eq!(
            resolve_activity_image(&a, None).as_deref(),
            Some("https://cdn.discordapp.com/app-assets/999/123456.png")
        );
    }

    #[test]
    fn spotify_art_takes_priority() {
        let mut a = activity(2, "Spotify");
        a.assets = Some(RawAssets {
            large_image: Some("spotify:zzz".to_string()),
            ..Default::default()
        });
        let track = SpotifyTrack {
            song: "Song".to_string(),
            artist: None,
            album: None,
            album_art_url: Some("https://i.scdn.co/image/album".to_string()),
            time_range: None,
        };
        assert_eq!(
            resolve_activity_image(&a, Some(&track)).as_deref(),
            Some("https://i.scdn.co/image/album")
        );
    }

    #[test]
    fn unsuccessful_response_is_rejected() {
        let resp: LanyardResponse =
            serde_json::from_value(json!({ "success": false, "error": { "message": "nope" } }))
                .unwrap();
        match normalize(resp) {
            Err(PresenceError::Unsuccessful(msg)) => assert_eq!(msg, "nope"),
            other => panic!("expected Unsuccessful, got {:?}", other),
        }

        let missing: LanyardResponse = serde_json::from_value(json!({ "data": {} })).unwrap();
        assert!(matches!(
            normalize(missing),
            Err(PresenceError::Unsuccessful(_))
        ));
    }

    #[test]
    fn missing_user_is_malformed() {
        let resp = response(json!({ "discord_status": "online" }));
        assert!(matches!(normalize(resp), Err(PresenceError::Malformed(_))));
    }

    #[test]
    fn full_payload_normalizes() {
        let resp = response(json!({
            "discord_user": {
                "id": "714702739908722742",
                "username": "nova",
                "global_name": "Nova",
                "avatar": "a_1234"
            },
            "discord_status": "dnd",
            "listening_to_spotify": true,
            "active_on_discord_desktop": true,
            "active_on_discord_mobile": true,
            "spotify": {
                "track_id": "t1",
                "song": "Midnight City",
                "artist": "M83",
                "album": "Hurry Up, We're Dreaming",
                "album_art_url": "https://i.scdn.co/image/cover",
                "timestamps": { "start": 1000, "end": 245000 }
            },
            "activities": [
                {
                    "type": 4,
                    "name": "Custom Status",
                    "state": "building things",
                    "emoji": { "name": "rocket", "id": "55", "animated": true }
                },
                {
                    "type": 2,
                    "name": "Spotify",
                    "details": "Midnight City",
                    "state": "M83",
                    "assets": { "large_image": "spotify:cover" }
                }
            ]
        }));

        let snap = normalize(resp).unwrap();
        assert_eq!(snap.identity.display_name, "Nova");
        assert_eq!(
            snap.identity.avatar_url,
            "https://cdn.discordapp.com/avatars/714702739908722742/a_1234.gif?size=128"
        );
        assert_eq!(snap.status, Status::DoNotDisturb);
        assert!(snap.devices.desktop && snap.devices.mobile && !snap.devices.web);

        let activity = snap.activity.unwrap();
        assert_eq!(activity.kind, ActivityKind::Listening);
        assert_eq!(activity.title, "Spotify");
        assert_eq!(activity.details.as_deref(), Some("Midnight City"));
        assert_eq!(
            activity.image_url.as_deref(),
            Some("https://i.scdn.co/image/cover")
        );
        assert_eq!(
            activity.time_range,
            Some(TimeRange {
                start: 1000,
                end: Some(245000)
            })
        );

        let custom = snap.custom_status.unwrap();
        assert_eq!(custom.text.as_deref(), Some("building things"));
        let emoji = custom.emoji.unwrap();
        assert_eq!(
            emoji.url.as_deref(),
            Some("https://cdn.discordapp.com/emojis/55.gif")
        );

        assert_eq!(snap.spotify.unwrap().artist.as_deref(), Some("M83"));
    }

    #[test]
    fn spotify_ignored_unless_listening() {
        let resp = response(json!({
            "discord_user": { "id": "10", "username": "nova" },
            "listening_to_spotify": false,
            "spotify": { "album_art_url": "https://i.scdn.co/image/old" },
            "activities": [
                { "type": 0, "name": "Factorio", "application_id": "77",
                  "assets": { "large_image": "logo" },
                  "timestamps": { "start": 5 } }
            ]
        }));
        let snap = normalize(resp).unwrap();
        assert!(snap.spotify.is_none());
        assert_eq!(snap.identity.display_name, "nova");
        assert_eq!(snap.status, Status::Offline);
        let activity = snap.activity.unwrap();
        assert_eq!(activity.kind, ActivityKind::Playing);
        assert_eq!(
            activity.image_url.as_deref(),
            Some("https://cdn.discordapp.com/app-assets/77/logo.png")
        );
        assert_eq!(
            activity.time_range,
            Some(TimeRange {
                start: 5,
                end: None
            })
        );
    }

    #[test]
    fn empty_custom_status_is_dropped() {
        let raw = RawActivity {
            kind: ACTIVITY_CUSTOM,
            ..Default::default()
        };
        assert!(custom_status(&raw).is_none());

        let unicode = RawActivity {
            kind: ACTIVITY_CUSTOM,
            emoji: Some(RawEmoji {
                name: Some("🌙".to_string()),
                id: None,
                animated: false,
            }),
            ..Default::default()
        };
        let status = custom_status(&unicode).unwrap();
        assert!(status.text.is_none());
        assert_eq!(status.emoji.unwrap().url, None);
    }

    #[test]
    fn timestamps_without_start_give_no_range() {
        let mut a = activity(0, "game");
        a.timestamps = Some(RawTimestamps {
            start: None,
            end: Some(10),
        });
        let resp = LanyardResponse {
            success: true,
            data: Some(PresencePayload {
                discord_user: Some(DiscordUser {
                    id: "1".to_string(),
                    username: "u".to_string(),
                    ..Default::default()
                }),
                activities: vec![a],
                ..Default::default()
            }),
            error: None,
        };
        let snap = normalize(resp).unwrap();
        assert!(snap.activity.unwrap().time_range.is_none());
    }
}
