//! Display formatting for terminal output
//!
//! Tables and detail views for expenses.

pub mod expense;

pub use expense::{format_expense_details, format_expense_list, DisplayOptions, HIGHLIGHT_MARK};

/// Truncate a string to at most `max_chars` characters, marking the cut with "..."
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}
