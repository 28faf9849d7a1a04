//! Reports module for the expense tracker
//!
//! Currently a single report: totals and a per-category breakdown.

pub mod summary;

pub use summary::{CategorySummary, ExpenseSummary, DEFAULT_PERIOD_LABEL};
