//! Open-Meteo payload → [`WeatherSnapshot`].

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

use super::api::WeatherError;
use super::payload::{at, DailyBlock, ForecastResponse, HourlyBlock};
use super::{CurrentConditions, NextDay, NextHour, WeatherSnapshot};

/// Hourly slot used when no sample lies an hour or more ahead.
pub const FALLBACK_HOUR_INDEX: usize = 1;

/// Daily slot for tomorrow in a two-day forecast.
pub const TOMORROW_INDEX: usize = 1;

const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Validate a forecast and build the snapshot as seen at `now`.
pub fn normalize(
    response: ForecastResponse,
    now: DateTime<Utc>,
    location: &str,
) -> Result<WeatherSnapshot, WeatherError> {
    let offset = response
        .utc_offset_seconds
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(utc);

    let current = response.current.ok_or_else(|| missing("current"))?;
    let hourly = response.hourly.ok_or_else(|| missing("hourly"))?;
    let daily = response.daily.ok_or_else(|| missing("daily"))?;

    let current = CurrentConditions {
        temperature: round(
            current
                .temperature_2m
                .ok_or_else(|| missing("current.temperature_2m"))?,
        ),
        feels_like: current.apparent_temperature.map(round),
        weather_code: current
            .weather_code
            .ok_or_else(|| missing("current.weather_code"))?,
        humidity: round(
            current
                .relative_humidity_2m
                .ok_or_else(|| missing("current.relative_humidity_2m"))?,
        ),
        wind_speed: round(
            current
                .wind_speed_10m
                .ok_or_else(|| missing("current.wind_speed_10m"))?,
        ),
        pressure: current.surface_pressure.map(round),
        uv_index: current.uv_index.map(round),
        sunrise: at(daily.sunrise.as_ref(), 0).and_then(|s| parse_naive(&s)),
        sunset: at(daily.sunset.as_ref(), 0).and_then(|s| parse_naive(&s)),
        is_day: current.is_day == Some(1),
    };

    Ok(WeatherSnapshot {
        current,
        next_hour: next_hour(&hourly, now, offset)?,
        next_day: next_day(&daily)?,
        location: location.to_string(),
    })
}

fn next_hour(
    hourly: &HourlyBlock,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<NextHour, WeatherError> {
    if hourly.time.is_empty() {
        return Err(missing("hourly.time"));
    }
    let times: Vec<Option<DateTime<Utc>>> = hourly
        .time
        .iter()
        .map(|t| parse_local(t, offset))
        .collect();
    let index = next_hour_index(&times, now);

    let or_fallback = |series: &Vec<Option<f64>>| {
        at(Some(series), index).or_else(|| at(Some(series), FALLBACK_HOUR_INDEX))
    };

    let temperature = or_fallback(&hourly.temperature_2m)
        .ok_or_else(|| missing("hourly.temperature_2m"))?;
    let weather_code = at(Some(&hourly.weather_code), index)
        .or_else(|| at(Some(&hourly.weather_code), FALLBACK_HOUR_INDEX))
        .ok_or_else(|| missing("hourly.weather_code"))?;

    Ok(NextHour {
        time: hourly.time.get(index).and_then(|t| parse_naive(t)),
        temperature: round(temperature),
        weather_code,
        precipitation_probability: at(Some(&hourly.precipitation_probability), index)
            .map(round)
            .unwrap_or(0),
        humidity: at(hourly.relative_humidity_2m.as_ref(), index).map(round),
        wind_speed: at(hourly.wind_speed_10m.as_ref(), index).map(round),
        feels_like: at(hourly.apparent_temperature.as_ref(), index).map(round),
    })
}

fn next_day(daily: &DailyBlock) -> Result<NextDay, WeatherError> {
    let i = TOMORROW_INDEX;
    Ok(NextDay {
        temp_max: round(
            at(Some(&daily.temperature_2m_max), i)
                .ok_or_else(|| missing("daily.temperature_2m_max[1]"))?,
        ),
        temp_min: round(
            at(Some(&daily.temperature_2m_min), i)
                .ok_or_else(|| missing("daily.temperature_2m_min[1]"))?,
        ),
        weather_code: at(Some(&daily.weather_code), i)
            .ok_or_else(|| missing("daily.weather_code[1]"))?,
        precipitation_sum: round_tenths(at(Some(&daily.precipitation_sum), i).unwrap_or(0.0)),
        sunrise: at(daily.sunrise.as_ref(), i).and_then(|s| parse_naive(&s)),
        sunset: at(daily.sunset.as_ref(), i).and_then(|s| parse_naive(&s)),
        humidity: at(daily.relative_humidity_2m_max.as_ref(), i).map(round),
        wind_speed: at(daily.wind_speed_10m_max.as_ref(), i).map(round),
    })
}

/// First sample at or after `now + 1h`, else [`FALLBACK_HOUR_INDEX`].
///
/// Unparseable timestamps never match.
pub fn next_hour_index(times: &[Option<DateTime<Utc>>], now: DateTime<Utc>) -> usize {
    let target = now + Duration::hours(1);
    times
        .iter()
        .position(|t| t.is_some_and(|t| t >= target))
        .unwrap_or(FALLBACK_HOUR_INDEX)
}

/// Nearest integer, halves rounding towards positive infinity.
pub fn round(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// One decimal place.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Parse an Open-Meteo local timestamp (`YYYY-MM-DDTHH:MM`).
pub fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse a local timestamp and place it on the UTC timeline.
pub fn parse_local(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = parse_naive(raw)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn missing(field: &str) -> WeatherError {
    WeatherError::Malformed(format!("missing {}", field))
}
