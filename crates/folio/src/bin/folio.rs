//! Folio CLI
//!
//! Usage:
//!   folio                        # Open the dashboard
//!   folio -c ~/my-folio.yaml     # Dashboard with an explicit config file
//!   folio watch                  # Poll headless, one JSON line per update
//!   folio presence [--json]      # Fetch Discord presence once
//!   folio weather [--json]       # Fetch the forecast once

use std::path::PathBuf;
use std::sync::Arc;

use argh::FromArgs;
use folio::clock::{format_local_time, Clock, LocalZone, SystemClock};
use folio::config::{folio_dir, FolioConfig};
use folio::poller::WidgetState;
use folio::presence::LanyardClient;
use folio::tui::ui::components::to_plain;
use folio::tui::ui::{presence::presence_lines, weather::weather_lines, Tick};
use folio::weather::OpenMeteoClient;

/// Folio - terminal portfolio dashboard
#[derive(FromArgs)]
struct Args {
    /// show version information
    #[argh(switch, short = 'V')]
    version: bool,

    /// config file (default: ~/.folio/config.yaml)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Watch(WatchArgs),
    Presence(PresenceArgs),
    Weather(WeatherArgs),
}

/// Poll both widgets without a UI, printing each update as JSON
#[derive(FromArgs)]
#[argh(subcommand, name = "watch")]
struct WatchArgs {}

/// Fetch and print Discord presence once
#[derive(FromArgs)]
#[argh(subcommand, name = "presence")]
struct PresenceArgs {
    /// output the normalized snapshot as JSON
    #[argh(switch)]
    json: bool,
}

/// Fetch and print the weather forecast once
#[derive(FromArgs)]
#[argh(subcommand, name = "weather")]
struct WeatherArgs {
    /// output the normalized snapshot as JSON
    #[argh(switch)]
    json: bool,
}

/// Send logs to ~/.folio/folio.log so they do not draw over the dashboard.
fn init_file_logging() -> Result<(), Box<dyn std::error::Error>> {
    let dir = folio_dir().unwrap_or_else(|| std::env::temp_dir().join("folio"));
    std::fs::create_dir_all(&dir)?;
    let log_path = dir.join("folio.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| format!("Failed to open log file {}: {}", log_path.display(), e))?;
    drop(
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .try_init(),
    );
    log::info!("Dashboard starting (logs at {})", log_path.display());
    Ok(())
}

fn init_stderr_logging(default_level: &str) {
    drop(
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .target(env_logger::Target::Stderr)
            .try_init(),
    );
}

async fn run_presence(
    config: &FolioConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = LanyardClient::new(&config.presence.base_url, &config.presence.user_id)?;
    let snapshot = client.fetch_presence().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let now = SystemClock.now();
    let zone = LocalZone::from_offset_minutes(config.clock.utc_offset_minutes);
    let clock_text = format_local_time(&zone.localize(now));
    let tick = Tick {
        now_ms: now.timestamp_millis(),
        clock_text: &clock_text,
        spinner_frame: 0,
        pulse_on: true,
    };
    println!(
        "{}",
        to_plain(&presence_lines(&WidgetState::ready(snapshot), &tick))
    );
    Ok(())
}

async fn run_weather(
    config: &FolioConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenMeteoClient::new(
        &config.weather.base_url,
        config.weather.latitude,
        config.weather.longitude,
        &config.weather.location,
        Arc::new(SystemClock),
    )?;
    let snapshot = client.fetch_weather().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", to_plain(&weather_lines(&WidgetState::ready(snapshot), 0)));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = argh::from_env();

    // Handle --version flag
    if args.version {
        println!("folio {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match args.command {
        // No subcommand = dashboard
        None => {
            init_file_logging()?;
            let config = FolioConfig::load(args.config.as_deref())?;
            folio::tui::run(&config).await?;
        }
        Some(Command::Watch(_)) => {
            init_stderr_logging("info");
            let config = FolioConfig::load(args.config.as_deref())?;

            let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());
            ctrlc::set_handler({
                let shutdown_tx = shutdown_tx.clone();
                move || {
                    log::info!("Received Ctrl+C, shutting down gracefully...");
                    shutdown_tx.send(()).ok();
                }
            })?;

            log::info!("Watching presence and weather (Ctrl+C to stop)");
            folio::watch::run(&config, shutdown_rx).await?;
            drop(shutdown_tx);
        }
        Some(Command::Presence(presence_args)) => {
            init_stderr_logging("warn");
            let config = FolioConfig::load(args.config.as_deref())?;
            run_presence(&config, presence_args.json).await?;
        }
        Some(Command::Weather(weather_args)) => {
            init_stderr_logging("warn");
            let config = FolioConfig::load(args.config.as_deref())?;
            run_weather(&config, weather_args.json).await?;
        }
    }

    Ok(())
}
