//! Terminal User Interface module
//!
//! A ratatui front end over the same session the shell uses: the expense
//! list with filter and sort, a summary sidebar, and dialogs for adding and
//! deleting expenses.

pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;

// Views
pub mod views;

// Widgets
pub mod widgets;

// Dialogs
pub mod dialogs;

// Layout
pub mod layout;

pub use app::App;
pub use terminal::run_tui;
