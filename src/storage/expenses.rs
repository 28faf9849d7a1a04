//! In-memory expense store
//!
//! The store is the single owner of the expense collection. It lives for one
//! session and is handed out by reference; `add` and `remove` are its only
//! mutators.

use tracing::{debug, info};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseDraft, ExpenseId};

/// Shortest ID prefix accepted by [`ExpenseStore::find`]
pub const MIN_ID_PREFIX_LEN: usize = 4;

/// Ordered collection of expenses, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
}

impl ExpenseStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store and add each draft in order
    pub fn from_drafts(drafts: impl IntoIterator<Item = ExpenseDraft>) -> Self {
        let mut store = Self::new();
        for draft in drafts {
            store.add(draft);
        }
        store
    }

    /// Append a new expense built from a draft and return the stored record
    pub fn add(&mut self, draft: ExpenseDraft) -> Expense {
        let expense = Expense::from_draft(draft);
        info!(id = %expense.id, amount = %expense.amount, category = %expense.category, "expense added");
        self.expenses.push(expense.clone());
        expense
    }

    /// Remove the expense with the given ID
    ///
    /// Returns the removed record, or `None` when no such expense exists.
    pub fn remove(&mut self, id: ExpenseId) -> Option<Expense> {
        match self.expenses.iter().position(|e| e.id == id) {
            Some(idx) => {
                let removed = self.expenses.remove(idx);
                info!(id = %removed.id, "expense removed");
                Some(removed)
            }
            None => {
                debug!(%id, "remove ignored, no such expense");
                None
            }
        }
    }

    /// All expenses in insertion order
    pub fn list(&self) -> &[Expense] {
        &self.expenses
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Find an expense by full ID or an unambiguous ID prefix
    pub fn find(&self, identifier: &str) -> ExpenseResult<&Expense> {
        let identifier = identifier.trim();

        if let Ok(id) = identifier.parse::<ExpenseId>() {
            return self
                .get(id)
                .ok_or_else(|| ExpenseError::expense_not_found(identifier));
        }

        let bare = identifier
            .strip_prefix(ExpenseId::PREFIX)
            .unwrap_or(identifier);
        if bare.len() < MIN_ID_PREFIX_LEN {
            return Err(ExpenseError::expense_not_found(identifier));
        }

        let mut matches = self.expenses.iter().filter(|e| e.id.matches_prefix(bare));
        match (matches.next(), matches.next()) {
            (Some(expense), None) => Ok(expense),
            (None, _) => Err(ExpenseError::expense_not_found(identifier)),
            (Some(_), Some(_)) => Err(ExpenseError::Ambiguous {
                entity_type: "Expense",
                identifier: identifier.to_string(),
                matches: 2 + matches.count(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}
