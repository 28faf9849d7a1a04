//! Core data models for the expense tracker
//!
//! Expenses, their identifiers, money amounts, the fixed category set and
//! the raw form input that precedes validation.

pub mod category;
pub mod expense;
pub mod form;
pub mod ids;
pub mod money;

pub use category::{Category, UnknownCategory};
pub use expense::{Expense, ExpenseDraft};
pub use form::{ExpenseForm, DATE_INPUT_FORMAT};
pub use ids::ExpenseId;
pub use money::{Money, MoneyParseError};
