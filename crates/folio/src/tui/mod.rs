//! Terminal dashboard
//!
//! Presence and weather cards side by side, each fed by its own poller.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self as crossterm_event, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

pub mod app;
pub mod ui;

use crate::config::FolioConfig;
use app::App;

/// Run the dashboard until the user quits
pub async fn run(config: &FolioConfig) -> Result<()> {
    // Build the app before touching the terminal so setup errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown().await;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for events with timeout for animations
        if crossterm_event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = crossterm_event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break;
                }

                if app.handle_key(key) {
                    break;
                }
            }
        }

        // Tick for animations, clock and widget state
        app.tick().await?;
    }

    Ok(())
}
