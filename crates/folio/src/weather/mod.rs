//! Weather widget data, sourced from the Open-Meteo forecast API.

pub mod api;
pub mod codes;
pub mod normalize;
pub mod payload;

use chrono::NaiveDateTime;
use serde::Serialize;

pub use api::{OpenMeteoClient, WeatherError};
pub use codes::{describe, Icon};
pub use normalize::normalize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature: i32,
    pub feels_like: Option<i32>,
    pub weather_code: u16,
    pub humidity: i32,
    pub wind_speed: i32,
    pub pressure: Option<i32>,
    pub uv_index: Option<i32>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub is_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextHour {
    /// Local wall-clock time of the selected hourly sample.
    pub time: Option<NaiveDateTime>,
    pub temperature: i32,
    pub weather_code: u16,
    pub precipitation_probability: i32,
    pub humidity: Option<i32>,
    pub wind_speed: Option<i32>,
    pub feels_like: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextDay {
    pub temp_max: i32,
    pub temp_min: i32,
    pub weather_code: u16,
    /// Millimetres, one decimal place.
    pub precipitation_sum: f64,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub humidity: Option<i32>,
    pub wind_speed: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub next_hour: NextHour,
    pub next_day: NextDay,
    pub location: String,
}

impl WeatherSnapshot {
    pub fn current_condition(&self) -> (&'static str, Icon) {
        describe(self.current.weather_code, self.current.is_day)
    }

    /// Uses the current day/night flag, not one computed for the next hour.
    pub fn next_hour_condition(&self) -> (&'static str, Icon) {
        describe(self.next_hour.weather_code, self.current.is_day)
    }

    /// Always the day variant.
    pub fn next_day_condition(&self) -> (&'static str, Icon) {
        describe(self.next_day.weather_code, true)
    }
}
