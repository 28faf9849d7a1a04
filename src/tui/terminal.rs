//! Terminal setup and teardown
//!
//! Initializes and restores the terminal state, including a panic hook that
//! restores the terminal on crash.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::info;

use crate::error::ExpenseError;
use crate::session::Session;

use super::app::App;
use super::event::EventHandler;
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()
        .map_err(|e| ExpenseError::Tui(format!("Cannot enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| ExpenseError::Tui(format!("Cannot enter alternate screen: {}", e)))?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI until the user quits
pub fn run_tui(session: &mut Session) -> Result<()> {
    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, session);
    restore_terminal()?;
    result
}

fn event_loop(terminal: &mut Tui, session: &mut Session) -> Result<()> {
    let mut app = App::new(session);
    let events = EventHandler::default();
    info!(expenses = app.session.store.len(), "tui started");

    while !app.should_quit {
        terminal.draw(|frame| super::views::render(frame, &app))?;
        handle_event(&mut app, events.next()?)?;
    }

    Ok(())
}
