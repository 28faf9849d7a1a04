//! Event handler for the TUI
//!
//! Routes keyboard events to the open dialog, or to the list when no
//! dialog is open.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{ActiveDialog, App, STATUS_TIMEOUT};
use super::dialogs;
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick => {
            app.expire_status(STATUS_TIMEOUT);
            Ok(())
        }
        Event::Resize(_, _) => Ok(()),
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return Ok(());
    }

    if app.has_dialog() {
        handle_dialog_key(app, key);
        return Ok(());
    }

    handle_normal_key(app, key);
    Ok(())
}

/// Handle keys when no dialog is open
fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),

        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Char('a') | KeyCode::Char('n') => app.open_dialog(ActiveDialog::AddExpense),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('s') => app.cycle_sort(),

        _ => {}
    }
}

/// Handle keys while a dialog is open
fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match app.active_dialog {
        ActiveDialog::AddExpense => {
            dialogs::expense::handle_key(app, key);
        }
        ActiveDialog::ConfirmDelete(_) => {
            dialogs::confirm::handle_key(app, key);
        }
        ActiveDialog::Help => app.close_dialog(),
        ActiveDialog::None => {}
    }
}
