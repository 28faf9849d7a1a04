//! TUI Views module
//!
//! The expense list, the summary sidebar and the status bar, with any open
//! dialog drawn on top.

pub mod expense_list;
pub mod status_bar;
pub mod summary;

use ratatui::Frame;

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::layout::AppLayout;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    expense_list::render(frame, app, layout.main);
    summary::render(frame, app, layout.summary);
    status_bar::render(frame, app, layout.status_bar);

    if app.has_dialog() {
        render_dialog(frame, app);
    }
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &App) {
    match app.active_dialog {
        ActiveDialog::AddExpense => dialogs::expense::render(frame, app),
        ActiveDialog::Help => dialogs::help::render(frame),
        ActiveDialog::ConfirmDelete(_) => {
            dialogs::confirm::render(frame, &dialogs::confirm::message(app));
        }
        ActiveDialog::None => {}
    }
}
