//! Filtering and sorting of expenses for display
//!
//! Everything here is pure: the store is never touched and the same input
//! always yields the same view.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Category, Expense, Money};

/// Which categories a view includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        self.matches_category(expense.category)
    }

    pub fn matches_category(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == category,
        }
    }

    /// Cycle All -> each category -> All
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Only(Category::ALL[0]),
            Self::Only(category) if category == Category::ALL[Category::ALL.len() - 1] => Self::All,
            Self::Only(category) => Self::Only(category.next()),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(category) => write!(f, "{}", category),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown filter '{0}', expected All or a category name")]
pub struct UnknownFilter(pub String);

impl FromStr for CategoryFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<Category>()
            .map(Self::Only)
            .map_err(|_| UnknownFilter(trimmed.to_string()))
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = UnknownFilter;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Sort order for a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recent first
    #[default]
    Date,
    /// Smallest first
    Amount,
    /// By category name
    Category,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Date, SortKey::Amount, SortKey::Category];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Category => "category",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Date => Self::Amount,
            Self::Amount => Self::Category,
            Self::Category => Self::Date,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sort key '{0}', expected date, amount or category")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            _ => Err(UnknownSortKey(s.trim().to_string())),
        }
    }
}

/// Filter then sort. Ties keep their insertion order.
pub fn project(expenses: &[Expense], filter: CategoryFilter, sort: SortKey) -> Vec<&Expense> {
    let mut view: Vec<&Expense> = expenses.iter().filter(|e| filter.matches(e)).collect();

    match sort {
        SortKey::Date => view.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::Amount => view.sort_by(|a, b| a.amount.cmp(&b.amount)),
        SortKey::Category => view.sort_by(|a, b| a.category.name().cmp(b.category.name())),
    }

    view
}

/// Sum of amounts in a view
pub fn total(view: &[&Expense]) -> Money {
    view.iter().map(|e| e.amount).sum()
}

pub fn count(view: &[&Expense]) -> usize {
    view.len()
}

/// A filtered, sorted view together with its aggregates
#[derive(Debug, Clone)]
pub struct Projection<'a> {
    pub filter: CategoryFilter,
    pub sort: SortKey,
    pub expenses: Vec<&'a Expense>,
    pub total: Money,
    pub count: usize,
}

impl<'a> Projection<'a> {
    pub fn new(expenses: &'a [Expense], filter: CategoryFilter, sort: SortKey) -> Self {
        let view = project(expenses, filter, sort);
        Self {
            filter,
            sort,
            total: total(&view),
            count: count(&view),
            expenses: view,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

/// Display rule marking large expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRule {
    pub threshold: Money,
}

impl HighlightRule {
    pub const DEFAULT_THRESHOLD: Money = Money::from_cents(5000);

    pub fn new(threshold: Money) -> Self {
        Self { threshold }
    }

    /// Strictly greater than the threshold
    pub fn is_highlighted(&self, expense: &Expense) -> bool {
        expense.amount > self.threshold
    }
}

impl Default for HighlightRule {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseDraft;
    use chrono::NaiveDate;

    fn expense(description: &str, cents: i64, category: Category, day: u32) -> Expense {
        Expense::from_draft(ExpenseDraft::new(
            description,
            Money::from_cents(cents),
            category,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        ))
    }

    fn fixture() -> Vec<Expense> {
        vec![
            expense("Lunch", 1250, Category::Food, 15),
            expense("Bus pass", 9500, Category::Transportation, 14),
            expense("Movie", 2500, Category::Entertainment, 13),
            expense("Groceries", 4000, Category::Food, 16),
        ]
    }

    fn descriptions(view: &[&Expense]) -> Vec<String> {
        view.iter().map(|e| e.description.clone()).collect()
    }

    #[test]
    fn test_all_by_date_is_most_recent_first() {
        let expenses = fixture();
        let view = project(&expenses, CategoryFilter::All, SortKey::Date);
        assert_eq!(view.len(), expenses.len());
        assert_eq!(
            descriptions(&view),
            ["Groceries", "Lunch", "Bus pass", "Movie"]
        );
    }

    #[test]
    fn test_category_filter_by_amount() {
        let expenses = fixture();
        let view = project(&expenses, CategoryFilter::Only(Category::Food), SortKey::Amount);
        assert_eq!(descriptions(&view), ["Lunch", "Groceries"]);
        assert!(view.iter().all(|e| e.category == Category::Food));
    }

    #[test]
    fn test_totals_for_two_records() {
        let expenses = vec![
            expense("Lunch", 1250, Category::Food, 15),
            expense("Bus pass", 9500, Category::Transportation, 14),
        ];
        let projection = Projection::new(&expenses, CategoryFilter::All, SortKey::Amount);
        let amounts: Vec<_> = projection.expenses.iter().map(|e| e.amount.cents()).collect();
        assert_eq!(amounts, [1250, 9500]);
        assert_eq!(projection.total, Money::from_cents(10750));
        assert_eq!(projection.count, 2);
    }

    #[test]
    fn test_sorts_are_stable() {
        let expenses = vec![
            expense("first", 1000, Category::Food, 10),
            expense("second", 1000, Category::Food, 10),
            expense("third", 1000, Category::Food, 10),
        ];
        for key in SortKey::ALL {
            let view = project(&expenses, CategoryFilter::All, key);
            assert_eq!(descriptions(&view), ["first", "second", "third"], "{key}");
        }
    }

    #[test]
    fn test_category_sort_uses_name() {
        let expenses = fixture();
        let view = project(&expenses, CategoryFilter::All, SortKey::Category);
        let names: Vec<_> = view.iter().map(|e| e.category.name()).collect();
        assert_eq!(names, ["Entertainment", "Food", "Food", "Transportation"]);
        assert_eq!(descriptions(&view)[1..3], ["Lunch", "Groceries"]);
    }

    #[test]
    fn test_empty_view() {
        let expenses = fixture();
        let projection = Projection::new(
            &expenses,
            CategoryFilter::Only(Category::Shopping),
            SortKey::Date,
        );
        assert!(projection.is_empty());
        assert_eq!(projection.total, Money::zero());
        assert_eq!(projection.count, 0);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let expenses = fixture();
        let a = project(&expenses, CategoryFilter::All, SortKey::Category);
        let b = project(&expenses, CategoryFilter::All, SortKey::Category);
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_filter_and_sort() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            " food ".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Food)
        );
        assert!("Rent".parse::<CategoryFilter>().is_err());

        assert_eq!("Amount".parse::<SortKey>().unwrap(), SortKey::Amount);
        assert!("price".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_filter_cycle_returns_to_all() {
        let mut filter = CategoryFilter::All;
        for _ in 0..=Category::ALL.len() {
            filter = filter.next();
        }
        assert_eq!(filter, CategoryFilter::All);
    }

    #[test]
    fn test_total_of_largest_allowed_amounts() {
        let expenses = vec![
            expense("Yacht", Money::MAX_EXPENSE.cents(), Category::Entertainment, 2),
            expense("Jet", Money::MAX_EXPENSE.cents(), Category::Transportation, 3),
            expense("Lunch", 1250, Category::Food, 4),
        ];

        let view = Projection::new(&expenses, CategoryFilter::All, SortKey::Amount);

        assert_eq!(view.count, 3);
        assert_eq!(view.total.cents(), 2 * 100_000_000_000 + 1250);
        assert_eq!(view.total.to_string(), "$2000000012.50");
    }

    #[test]
    fn test_total_saturates_instead_of_wrapping() {
        let expenses = vec![
            expense("Huge", i64::MAX - 1, Category::Other, 1),
            expense("More", i64::MAX - 1, Category::Other, 2),
        ];

        let view = Projection::new(&expenses, CategoryFilter::All, SortKey::Date);

        assert_eq!(view.total.cents(), i64::MAX);
        assert!(view.total.is_positive());
    }

    #[test]
    fn test_highlight_is_strictly_greater() {
        let rule = HighlightRule::default();
        assert!(!rule.is_highlighted(&expense("Exactly", 5000, Category::Food, 1)));
        assert!(rule.is_highlighted(&expense("Over", 5001, Category::Food, 1)));
        assert!(!rule.is_highlighted(&expense("Under", 1250, Category::Food, 1)));

        let strict = HighlightRule::new(Money::from_cents(1000));
        assert!(strict.is_highlighted(&expense("Lunch", 1250, Category::Food, 1)));
    }
}
