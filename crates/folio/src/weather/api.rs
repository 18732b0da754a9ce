//! Open-Meteo HTTP client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::normalize::normalize;
use super::payload::ForecastResponse;
use super::WeatherSnapshot;
use crate::clock::Clock;
use crate::poller::Source;

/// Public Open-Meteo endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

/// Cambridge, UK.
pub const DEFAULT_LATITUDE: f64 = 52.2053;
pub const DEFAULT_LONGITUDE: f64 = 0.1218;
pub const DEFAULT_LOCATION_LABEL: &str = "Uk";

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,weather_code,wind_speed_10m,surface_pressure,uv_index,is_day";
const HOURLY_FIELDS: &str = "temperature_2m,apparent_temperature,weather_code,precipitation_probability,relative_humidity_2m,wind_speed_10m";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum,sunrise,sunset,wind_speed_10m_max,uv_index_max,relative_humidity_2m_max";
const FORECAST_DAYS: u8 = 2;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from fetching or normalizing a forecast.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, WeatherError>;

/// Open-Meteo answers bad requests with `{"error": true, "reason": "..."}`.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    reason: String,
}

/// Fetches the two-day forecast for one fixed coordinate.
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
    location: String,
    clock: Arc<dyn Clock>,
}

impl OpenMeteoClient {
    pub fn new(
        base_url: &str,
        latitude: f64,
        longitude: f64,
        location: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            latitude,
            longitude,
            location: location.to_string(),
            clock,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "{}/v1/forecast?latitude={}&longitude={}&current={}&hourly={}&daily={}&timezone=auto&forecast_days={}",
            self.base_url,
            self.latitude,
            self.longitude,
            CURRENT_FIELDS,
            HOURLY_FIELDS,
            DAILY_FIELDS,
            FORECAST_DAYS
        )
    }

    /// GET the forecast and normalize it against the client's clock.
    pub async fn fetch_weather(&self) -> Result<WeatherSnapshot> {
        let response = self.client.get(self.url()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.reason)
                .unwrap_or(body);
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let forecast: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Malformed(e.to_string()))?;
        normalize(forecast, self.clock.now(), &self.location)
    }
}

impl std::fmt::Debug for OpenMeteoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenMeteoClient")
            .field("base_url", &self.base_url)
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("location", &self.location)
            .finish()
    }
}

#[async_trait]
impl Source for OpenMeteoClient {
    type Snapshot = WeatherSnapshot;
    type Error = WeatherError;

    fn name(&self) -> &'static str {
        "weather"
    }

    async fn fetch(&self) -> Result<WeatherSnapshot> {
        self.fetch_weather().await
    }
}
