//! Expense model
//!
//! An expense is created once from a validated draft and never edited
//! afterwards; it can only be removed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::ids::ExpenseId;
use super::money::Money;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// What the money was spent on
    pub description: String,

    /// Amount spent, always positive
    pub amount: Money,

    pub category: Category,

    /// Calendar date of the expense, serialized as YYYY-MM-DD
    pub date: NaiveDate,

    /// When the expense was recorded
    pub created_at: DateTime<Utc>,

    /// Link to an uploaded receipt image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
}

impl Expense {
    /// Finalize a draft into a record with a fresh ID and creation time
    pub fn from_draft(draft: ExpenseDraft) -> Self {
        Self {
            id: ExpenseId::new(),
            description: draft.description,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            created_at: Utc::now(),
            receipt_url: draft.receipt_url,
        }
    }

    pub fn has_receipt(&self) -> bool {
        self.receipt_url.is_some()
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.category,
            self.amount
        )
    }
}

/// A validated expense that has not been assigned an ID yet
///
/// Drafts are produced by [`crate::services::validation::parse`]; the store
/// only accepts drafts, never raw form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Money,
    pub category: Category,
    pub date: NaiveDate,
    pub receipt_url: Option<String>,
}

impl ExpenseDraft {
    /// Create a draft without a receipt
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category,
            date,
            receipt_url: None,
        }
    }

    /// Attach a receipt URL
    pub fn with_receipt_url(mut self, url: impl Into<String>) -> Self {
        self.receipt_url = Some(url.into());
        self
    }
}
