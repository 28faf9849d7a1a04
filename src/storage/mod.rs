//! Storage layer for the expense tracker
//!
//! Expenses are held in memory for the length of a session; nothing is
//! written to disk.

pub mod expenses;
pub mod seed;

pub use expenses::{ExpenseStore, MIN_ID_PREFIX_LEN};
pub use seed::{sample_drafts, seeded_store};
