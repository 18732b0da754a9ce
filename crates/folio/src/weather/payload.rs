//! Wire format of the Open-Meteo `/v1/forecast` response.
//!
//! Hourly and daily blocks are parallel arrays indexed by time. Individual
//! entries may be `null`, so every element is optional.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub current: Option<CurrentBlock>,
    #[serde(default)]
    pub hourly: Option<HourlyBlock>,
    #[serde(default)]
    pub daily: Option<DailyBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentBlock {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    #[serde(default)]
    pub apparent_temperature: Option<f64>,
    #[serde(default)]
    pub relative_humidity_2m: Option<f64>,
    #[serde(default)]
    pub weather_code: Option<u16>,
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
    #[serde(default)]
    pub surface_pressure: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<f64>,
    #[serde(default)]
    pub is_day: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub weather_code: Vec<Option<u16>>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub wind_speed_10m: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weather_code: Vec<Option<u16>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub sunrise: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub sunset: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub wind_speed_10m_max: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub uv_index_max: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub relative_humidity_2m_max: Option<Vec<Option<f64>>>,
}

/// Element `index` of an optional parallel array.
pub fn at<T: Clone>(series: Option<&Vec<Option<T>>>, index: usize) -> Option<T> {
    series.and_then(|s| s.get(index).cloned().flatten())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nulls_inside_series() {
        let json = r#"{
            "utc_offset_seconds": 3600,
            "hourly": {
                "time": ["2026-10-19T10:00", "2026-10-19T11:00"],
                "temperature_2m": [11.2, null],
                "weather_code": [3, 2],
                "precipitation_probability": [null, 40]
            }
        }"#;
        let resp: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.utc_offset_seconds, Some(3600));
        let hourly = resp.hourly.unwrap();
        assert_eq!(hourly.temperature_2m, vec![Some(11.2), None]);
        assert!(hourly.apparent_temperature.is_none());
        assert!(resp.current.is_none());
    }

    #[test]
    fn at_handles_missing_series_and_bounds() {
        let series = Some(vec![Some(1.0), None]);
        assert_eq!(at(series.as_ref(), 0), Some(1.0));
        assert_eq!(at(series.as_ref(), 1), None);
        assert_eq!(at(series.as_ref(), 5), None);
        assert_eq!(at::<f64>(None, 0), None);
    }
}
