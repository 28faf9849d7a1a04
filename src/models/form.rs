//! Raw expense form input
//!
//! Holds fields exactly as the user typed them. Nothing here is trusted until
//! it has gone through validation.

use chrono::{Local, NaiveDate};

use super::category::Category;

/// Date format accepted in forms and shown in the UI
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// User-entered expense data prior to validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    pub category: Option<String>,
    pub date: String,
}

impl ExpenseForm {
    /// A blank form with the usual defaults: Food and today's date
    pub fn new() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    /// A blank form defaulting to the given date
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            category: Some(Category::default().name().to_string()),
            date: date.format(DATE_INPUT_FORMAT).to_string(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = amount.into();
        self
    }

    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }
}

impl Default for ExpenseForm {
    fn default() -> Self {
        Self::new()
    }
}
