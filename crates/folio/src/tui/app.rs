use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::clock::{format_local_time, Clock, LocalZone, SystemClock};
use crate::config::FolioConfig;
use crate::poller::{Poller, WidgetState};
use crate::presence::{LanyardClient, PresenceSnapshot};
use crate::tui::ui::Tick;
use crate::weather::{OpenMeteoClient, WeatherSnapshot};

const CLOCK_PERIOD: Duration = Duration::from_secs(1);
const SPINNER_PERIOD: Duration = Duration::from_millis(150);
const PULSE_PERIOD: Duration = Duration::from_millis(800);

/// Application state
pub struct App {
    /// Should exit flag (set by q / Esc)
    pub should_exit: bool,

    presence: Poller<PresenceSnapshot>,
    weather: Poller<WeatherSnapshot>,

    /// Copies taken from the pollers on every tick; the renderer reads these
    pub presence_state: WidgetState<PresenceSnapshot>,
    pub weather_state: WidgetState<WeatherSnapshot>,

    /// Local clock, refreshed once a second
    clock: Arc<dyn Clock>,
    zone: LocalZone,
    pub clock_text: String,
    pub now_ms: i64,
    last_clock_tick: Instant,

    /// Animation state
    pub spinner_frame: usize,
    last_spinner_update: Instant,
    pub pulse_on: bool,
    last_pulse: Instant,
}

impl App {
    /// Build both sources from config and start polling them.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: &FolioConfig) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let lanyard = LanyardClient::new(&config.presence.base_url, &config.presence.user_id)?;
        let open_meteo = OpenMeteoClient::new(
            &config.weather.base_url,
            config.weather.latitude,
            config.weather.longitude,
            &config.weather.location,
            clock.clone(),
        )?;

        Ok(Self::with_pollers(
            Poller::start(config.presence.interval(), lanyard),
            Poller::start(config.weather.interval(), open_meteo),
            clock,
            LocalZone::from_offset_minutes(config.clock.utc_offset_minutes),
        ))
    }

    pub fn with_pollers(
        presence: Poller<PresenceSnapshot>,
        weather: Poller<WeatherSnapshot>,
        clock: Arc<dyn Clock>,
        zone: LocalZone,
    ) -> Self {
        let now = Instant::now();
        let mut app = Self {
            should_exit: false,
            presence,
            weather,
            presence_state: WidgetState::default(),
            weather_state: WidgetState::default(),
            clock,
            zone,
            clock_text: String::new(),
            now_ms: 0,
            last_clock_tick: now,
            spinner_frame: 0,
            last_spinner_update: now,
            pulse_on: true,
            last_pulse: now,
        };
        app.update_clock();
        app
    }

    /// Handle a key press. Returns true if the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_exit = true;
            }
            KeyCode::Char('r') => {
                log::info!("Manual refresh requested");
                self.presence.refresh();
                self.weather.refresh();
            }
            _ => {}
        }
        self.should_exit
    }

    /// Advance animations and the clock, and pick up new widget state
    pub async fn tick(&mut self) -> Result<()> {
        let now = Instant::now();

        if now.duration_since(self.last_spinner_update) > SPINNER_PERIOD {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
            self.last_spinner_update = now;
        }

        if now.duration_since(self.last_pulse) > PULSE_PERIOD {
            self.pulse_on = !self.pulse_on;
            self.last_pulse = now;
        }

        if now.duration_since(self.last_clock_tick) >= CLOCK_PERIOD {
            self.update_clock();
            self.last_clock_tick = now;
        }

        self.presence_state = self.presence.state().await;
        self.weather_state = self.weather.state().await;

        Ok(())
    }

    pub fn tick_view(&self) -> Tick<'_> {
        Tick {
            now_ms: self.now_ms,
            clock_text: &self.clock_text,
            spinner_frame: self.spinner_frame,
            pulse_on: self.pulse_on,
        }
    }

    /// Stop both pollers and wait for their loops to exit.
    pub async fn shutdown(self) {
        self.presence.stop().await;
        self.weather.stop().await;
    }

    fn update_clock(&mut self) {
        let utc = self.clock.now();
        self.now_ms = utc.timestamp_millis();
        self.clock_text = format_local_time(&self.zone.localize(utc));
    }
}
