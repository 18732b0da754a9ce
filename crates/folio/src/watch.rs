//! Headless polling: both widgets run as in the dashboard, and every fresh
//! snapshot is written as one JSON line.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::watch;

use crate::clock::SystemClock;
use crate::config::FolioConfig;
use crate::poller::{Poller, WidgetState};
use crate::presence::{LanyardClient, PresenceSnapshot};
use crate::weather::{OpenMeteoClient, WeatherSnapshot};

const REPORT_PERIOD: Duration = Duration::from_secs(1);

/// Poll until `shutdown` fires, printing updates to stdout.
pub async fn run(config: &FolioConfig, shutdown: watch::Receiver<()>) -> Result<()> {
    let lanyard = LanyardClient::new(&config.presence.base_url, &config.presence.user_id)?;
    let open_meteo = OpenMeteoClient::new(
        &config.weather.base_url,
        config.weather.latitude,
        config.weather.longitude,
        &config.weather.location,
        Arc::new(SystemClock),
    )?;

    let presence = Poller::start(config.presence.interval(), lanyard);
    let weather = Poller::start(config.weather.interval(), open_meteo);

    let mut stdout = std::io::stdout();
    let result = report_loop(&presence, &weather, &mut stdout, shutdown).await;

    presence.stop().await;
    weather.stop().await;
    log::info!("Watch stopped");
    result
}

/// Check both pollers once per second and emit whatever changed.
pub async fn report_loop<W: Write>(
    presence: &Poller<PresenceSnapshot>,
    weather: &Poller<WeatherSnapshot>,
    out: &mut W,
    mut shutdown: watch::Receiver<()>,
) -> Result<()> {
    let mut interval = tokio::time::interval(REPORT_PERIOD);
    let mut presence_seen = 0;
    let mut weather_seen = 0;

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                log::info!("Shutdown requested");
                break;
            }
            _ = interval.tick() => {
                emit("presence", &presence.state().await, &mut presence_seen, out)?;
                emit("weather", &weather.state().await, &mut weather_seen, out)?;
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct Update<'a, T> {
    widget: &'a str,
    snapshot: &'a T,
}

/// Write the snapshot if a fetch succeeded since `seen`. Returns whether it did.
///
/// `seen` counts successes, so a failure right after a success in the same
/// window still lets the new snapshot through.
pub fn emit<T: Serialize, W: Write>(
    widget: &str,
    state: &WidgetState<T>,
    seen: &mut u64,
    out: &mut W,
) -> Result<bool> {
    let successes = state.successes();
    if successes == *seen {
        return Ok(false);
    }
    *seen = successes;

    let Some(snapshot) = &state.snapshot else {
        return Ok(false);
    };
    let line = serde_json::to_string(&Update { widget, snapshot })?;
    writeln!(out, "{}", line)?;
    out.flush()?;
    Ok(true)
}
