use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::presence::api::{DEFAULT_BASE_URL as LANYARD_URL, DEFAULT_USER_ID};
use crate::weather::api::{
    DEFAULT_BASE_URL as OPEN_METEO_URL, DEFAULT_LATITUDE, DEFAULT_LOCATION_LABEL,
    DEFAULT_LONGITUDE,
};

/// Root configuration. Every field falls back to the built-in constant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub presence: PresenceConfig,
    pub weather: WeatherConfig,
    pub clock: ClockConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub user_id: String,
    pub base_url: String,
    pub interval_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
            base_url: LANYARD_URL.to_string(),
            interval_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// Label shown in the card header.
    pub location: String,
    pub base_url: String,
    pub interval_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            location: DEFAULT_LOCATION_LABEL.to_string(),
            base_url: OPEN_METEO_URL.to_string(),
            interval_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Minutes east of UTC for the "Local Time" line; host timezone when unset.
    pub utc_offset_minutes: Option<i32>,
}

impl PresenceConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl WeatherConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl FolioConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path, else `~/.folio/config.yaml` if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) if path.exists() => {
                log::info!("Loading config from {}", path.display());
                Self::from_file(path)
            }
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.presence.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "presence.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.weather.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "weather.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.presence.user_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "presence.user_id must not be empty".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.weather.latitude) {
            return Err(ConfigError::Invalid(format!(
                "weather.latitude {} is out of range",
                self.weather.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.weather.longitude) {
            return Err(ConfigError::Invalid(format!(
                "weather.longitude {} is out of range",
                self.weather.longitude
            )));
        }
        Ok(())
    }
}

/// `~/.folio`
pub fn folio_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".folio"))
}

pub fn default_path() -> Option<PathBuf> {
    folio_dir().map(|dir| dir.join("config.yaml"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
