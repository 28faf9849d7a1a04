//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.
//! It borrows the session mutably for its whole life, so every change to the
//! store goes through the same service the shell uses.

use std::time::{Duration, Instant};

use crate::models::{Expense, ExpenseId};
use crate::services::{CategoryFilter, Projection, SortKey};
use crate::session::Session;

use super::dialogs::expense::ExpenseFormState;

/// How long a status message stays visible
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Currently active dialog (if any)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    AddExpense,
    Help,
    ConfirmDelete(ExpenseId),
}

/// Main application state
pub struct App<'a> {
    pub session: &'a mut Session,

    /// Whether the app should quit
    pub should_quit: bool,

    pub active_dialog: ActiveDialog,

    /// Category shown in the list
    pub filter: CategoryFilter,

    pub sort: SortKey,

    /// Selected row in the filtered list
    pub selected_index: usize,

    pub status_message: Option<String>,

    status_set_at: Option<Instant>,

    /// Add expense form, kept across failed submissions
    pub expense_form: ExpenseFormState,
}

impl<'a> App<'a> {
    /// Create a new App over a session, using its default filter and sort
    pub fn new(session: &'a mut Session) -> Self {
        let filter = session.settings.default_filter;
        let sort = session.settings.default_sort;
        Self {
            session,
            should_quit: false,
            active_dialog: ActiveDialog::default(),
            filter,
            sort,
            selected_index: 0,
            status_message: None,
            status_set_at: None,
            expense_form: ExpenseFormState::new(),
        }
    }

    /// Request to quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_set_at = Some(Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_set_at = None;
    }

    /// Drop the status message once it is older than `max_age`
    pub fn expire_status(&mut self, max_age: Duration) {
        if self
            .status_set_at
            .is_some_and(|set_at| set_at.elapsed() >= max_age)
        {
            self.clear_status();
        }
    }

    /// Open a dialog
    ///
    /// Opening the add form starts from a blank form.
    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        if dialog == ActiveDialog::AddExpense {
            self.expense_form = ExpenseFormState::new();
        }
        self.active_dialog = dialog;
    }

    /// Close the current dialog
    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
    }

    /// Check if a dialog is active
    pub fn has_dialog(&self) -> bool {
        !matches!(self.active_dialog, ActiveDialog::None)
    }

    /// The expenses currently on screen, with totals
    pub fn projection(&self) -> Projection<'_> {
        Projection::new(self.session.store.list(), self.filter, self.sort)
    }

    pub fn visible_count(&self) -> usize {
        self.projection().count
    }

    /// The expense under the cursor, if the list is not empty
    pub fn selected_expense(&self) -> Option<&Expense> {
        self.projection().expenses.get(self.selected_index).copied()
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Move selection down, stopping at the last row
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.visible_count() {
            self.selected_index += 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.visible_count().saturating_sub(1);
    }

    /// Move the cursor onto `id` if it is visible
    pub fn select_expense(&mut self, id: ExpenseId) {
        if let Some(idx) = self.projection().expenses.iter().position(|e| e.id == id) {
            self.selected_index = idx;
        }
    }

    fn clamp_selection(&mut self) {
        self.selected_index = self
            .selected_index
            .min(self.visible_count().saturating_sub(1));
    }

    /// Show the next category
    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.selected_index = 0;
        self.set_status(format!("Showing: {}", self.filter));
    }

    /// Switch to the next sort order
    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.selected_index = 0;
        self.set_status(format!("Sorted by {}", self.sort));
    }

    /// Ask for confirmation before deleting the selected expense
    pub fn request_delete(&mut self) {
        match self.selected_expense().map(|e| e.id) {
            Some(id) => self.open_dialog(ActiveDialog::ConfirmDelete(id)),
            None => self.set_status("No expense selected"),
        }
    }

    /// Delete an expense after confirmation
    pub fn delete_expense(&mut self, id: ExpenseId) {
        match self.session.service().delete(&id.to_full_string()) {
            Ok(removed) => {
                self.clamp_selection();
                self.set_status(format!(
                    "Deleted expense {}: {}",
                    removed.id, removed.description
                ));
            }
            Err(e) => self.set_status(format!("Error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExpensePaths, Settings};
    use crate::models::Category;
    use tempfile::TempDir;

    fn session(dir: &TempDir) -> Session {
        Session::start(
            ExpensePaths::with_base_dir(dir.path().to_path_buf()),
            Settings::default(),
            false,
        )
    }

    #[test]
    fn test_starts_with_default_view() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let app = App::new(&mut session);

        assert_eq!(app.filter, CategoryFilter::All);
        assert_eq!(app.sort, SortKey::Date);
        assert_eq!(app.visible_count(), 3);
        assert_eq!(
            app.selected_expense().unwrap().description,
            "Lunch at downtown cafe"
        );
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let mut app = App::new(&mut session);

        app.move_up();
        assert_eq!(app.selected_index, 0);
        for _ in 0..10 {
            app.move_down();
        }
        assert_eq!(app.selected_index, 2);
        app.select_first();
        assert_eq!(app.selected_index, 0);
        app.select_last();
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn test_cycle_filter_narrows_list() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let mut app = App::new(&mut session);
        app.select_last();

        app.cycle_filter();

        assert_eq!(app.filter, CategoryFilter::Only(Category::Food));
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.visible_count(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Showing: Food"));
    }

    #[test]
    fn test_cycle_sort() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let mut app = App::new(&mut session);

        app.cycle_sort();

        assert_eq!(app.sort, SortKey::Amount);
        assert_eq!(app.selected_expense().unwrap().amount.cents(), 1250);
    }

    #[test]
    fn test_delete_flow() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let mut app = App::new(&mut session);
        app.select_last();
        let target = app.selected_expense().unwrap().id;

        app.request_delete();
        assert_eq!(app.active_dialog, ActiveDialog::ConfirmDelete(target));

        app.close_dialog();
        app.delete_expense(target);

        assert_eq!(app.visible_count(), 2);
        assert_eq!(app.selected_index, 1);
        assert!(app.session.store.get(target).is_none());
        assert!(app.status_message.unwrap().starts_with("Deleted expense"));
    }

    #[test]
    fn test_delete_with_empty_list() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::start(
            ExpensePaths::with_base_dir(dir.path().to_path_buf()),
            Settings::default(),
            true,
        );
        let mut app = App::new(&mut session);

        app.request_delete();

        assert!(!app.has_dialog());
        assert_eq!(app.status_message.as_deref(), Some("No expense selected"));
    }

    #[test]
    fn test_status_expires() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let mut app = App::new(&mut session);

        app.set_status("hello");
        app.expire_status(STATUS_TIMEOUT);
        assert_eq!(app.status_message.as_deref(), Some("hello"));

        app.expire_status(Duration::ZERO);
        assert!(app.status_message.is_none());
    }
}
