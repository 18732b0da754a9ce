//! WMO weather interpretation codes.

use serde::Serialize;

/// Icon family for a condition. Rendering decides the glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Sun,
    Moon,
    CloudSun,
    CloudMoon,
    Cloud,
    CloudFog,
    CloudRain,
    CloudSnow,
    CloudLightning,
}

impl Icon {
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Sun => "☀",
            Icon::Moon => "☾",
            Icon::CloudSun => "⛅",
            Icon::CloudMoon => "☁☾",
            Icon::Cloud => "☁",
            Icon::CloudFog => "≋",
            Icon::CloudRain => "☂",
            Icon::CloudSnow => "❄",
            Icon::CloudLightning => "ϟ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub code: u16,
    pub description: &'static str,
    pub day: Icon,
    pub night: Icon,
}

impl Condition {
    pub fn icon(&self, is_day: bool) -> Icon {
        if is_day {
            self.day
        } else {
            self.night
        }
    }
}

const fn entry(code: u16, description: &'static str, day: Icon, night: Icon) -> Condition {
    Condition {
        code,
        description,
        day,
        night,
    }
}

/// Returned for any code not in [`CONDITIONS`].
pub static UNKNOWN: Condition = entry(u16::MAX, "Unknown", Icon::Cloud, Icon::Cloud);

/// Sorted by code.
pub static CONDITIONS: &[Condition] = &[
    entry(0, "Clear sky", Icon::Sun, Icon::Moon),
    entry(1, "Mainly clear", Icon::Sun, Icon::Moon),
    entry(2, "Partly cloudy", Icon::CloudSun, Icon::CloudMoon),
    entry(3, "Overcast", Icon::Cloud, Icon::Cloud),
    entry(45, "Foggy", Icon::CloudFog, Icon::CloudFog),
    entry(48, "Rime fog", Icon::CloudFog, Icon::CloudFog),
    entry(51, "Light drizzle", Icon::CloudRain, Icon::CloudRain),
    entry(53, "Drizzle", Icon::CloudRain, Icon::CloudRain),
    entry(55, "Heavy drizzle", Icon::CloudRain, Icon::CloudRain),
    entry(56, "Freezing drizzle", Icon::CloudSnow, Icon::CloudSnow),
    entry(57, "Heavy freezing drizzle", Icon::CloudSnow, Icon::CloudSnow),
    entry(61, "Light rain", Icon::CloudRain, Icon::CloudRain),
    entry(63, "Rain", Icon::CloudRain, Icon::CloudRain),
    entry(65, "Heavy rain", Icon::CloudRain, Icon::CloudRain),
    entry(66, "Freezing rain", Icon::CloudSnow, Icon::CloudSnow),
    entry(67, "Heavy freezing rain", Icon::CloudSnow, Icon::CloudSnow),
    entry(71, "Light snow", Icon::CloudSnow, Icon::CloudSnow),
    entry(73, "Snow", Icon::CloudSnow, Icon::CloudSnow),
    entry(75, "Heavy snow", Icon::CloudSnow, Icon::CloudSnow),
    entry(77, "Snow grains", Icon::CloudSnow, Icon::CloudSnow),
    entry(80, "Light showers", Icon::CloudRain, Icon::CloudRain),
    entry(81, "Showers", Icon::CloudRain, Icon::CloudRain),
    entry(82, "Heavy showers", Icon::CloudRain, Icon::CloudRain),
    entry(85, "Light snow showers", Icon::CloudSnow, Icon::CloudSnow),
    entry(86, "Heavy snow showers", Icon::CloudSnow, Icon::CloudSnow),
    entry(95, "Thunderstorm", Icon::CloudLightning, Icon::CloudLightning),
    entry(96, "Thunderstorm with hail", Icon::CloudLightning, Icon::CloudLightning),
    entry(
        99,
        "Thunderstorm with heavy hail",
        Icon::CloudLightning,
        Icon::CloudLightning,
    ),
];

pub fn lookup(code: u16) -> &'static Condition {
    CONDITIONS
        .binary_search_by_key(&code, |c| c.code)
        .map(|i| &CONDITIONS[i])
        .unwrap_or(&UNKNOWN)
}

/// Description and icon variant for a code.
pub fn describe(code: u16, is_day: bool) -> (&'static str, Icon) {
    let condition = lookup(code);
    (condition.description, condition.icon(is_day))
}
