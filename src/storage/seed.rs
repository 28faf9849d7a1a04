//! Sample expenses for a fresh session
//!
//! New sessions start from a small set of example records unless the user
//! asks for an empty store.

use chrono::NaiveDate;

use crate::models::{Category, ExpenseDraft, Money};

use super::expenses::ExpenseStore;

/// The example expenses shown on first launch
pub fn sample_drafts() -> Vec<ExpenseDraft> {
    let samples = [
        ("Lunch at downtown cafe", 1250, Category::Food, 15),
        ("Monthly bus pass", 9500, Category::Transportation, 14),
        ("Movie tickets", 2500, Category::Entertainment, 13),
    ];

    samples
        .into_iter()
        .filter_map(|(description, cents, category, day)| {
            NaiveDate::from_ymd_opt(2024, 1, day).map(|date| {
                ExpenseDraft::new(description, Money::from_cents(cents), category, date)
            })
        })
        .collect()
}

/// A store preloaded with [`sample_drafts`]
pub fn seeded_store() -> ExpenseStore {
    ExpenseStore::from_drafts(sample_drafts())
}
