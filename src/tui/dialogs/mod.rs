//! Dialog modules for the TUI
//!
//! Modal dialogs drawn over the expense list

pub mod confirm;
pub mod expense;
pub mod help;
