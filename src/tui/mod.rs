//! Terminal user interface built on ratatui

pub mod app;
pub mod components;
pub mod events;
pub mod themes;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::config::DialogSettings;
use crate::tui::components::dialogs::DialogRegistry;
use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tracing::info;

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

/// Redraw often enough for the fade transitions to look smooth
const TICK_INTERVAL: Duration = Duration::from_millis(30);

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the interactive dialog demo
pub async fn run(settings: DialogSettings) -> Result<()> {
    let mut event_handler = EventHandler::new(TICK_INTERVAL);
    let mut app = App::new(
        &settings,
        DialogRegistry::global().clone(),
        event_handler.sender(),
        event_handler.dialog_sender(),
    )?;

    let mut terminal = init_terminal()?;
    let result = run_app(&mut terminal, &mut app, &mut event_handler).await;
    restore_terminal(&mut terminal)?;

    info!("Interactive session finished");
    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        match event_handler.next().await {
            Some(event) => {
                if app.handle_event(event)? {
                    break;
                }
            }
            None => break,
        }
    }
    Ok(())
}
