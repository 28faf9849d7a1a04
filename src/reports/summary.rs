//! Expense Summary
//!
//! Total spent and expense count for a set of expenses, with a breakdown by
//! category.

use std::io::Write;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Category, Expense, Money};

/// Label used when no period is given
pub const DEFAULT_PERIOD_LABEL: &str = "All Time";

/// Spending within one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: Category,
    pub total: Money,
    pub count: usize,
    /// Share of the overall total, 0-100
    pub percentage: f64,
}

/// Totals for a set of expenses
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary {
    /// Free-form label for the period covered, e.g. "January 2024"
    pub period_label: String,
    pub total_spent: Money,
    pub expense_count: usize,
    /// Categories with at least one expense, in fixed category order
    pub categories: Vec<CategorySummary>,
}

impl ExpenseSummary {
    /// Summarize the given expenses
    ///
    /// A blank label falls back to [`DEFAULT_PERIOD_LABEL`].
    pub fn generate<'a>(
        expenses: impl IntoIterator<Item = &'a Expense>,
        period_label: Option<&str>,
    ) -> Self {
        let mut totals = [(Money::zero(), 0usize); Category::ALL.len()];
        let mut total_spent = Money::zero();
        let mut expense_count = 0;

        for expense in expenses {
            if let Some(idx) = Category::ALL.iter().position(|c| *c == expense.category) {
                totals[idx].0 += expense.amount;
                totals[idx].1 += 1;
            }
            total_spent += expense.amount;
            expense_count += 1;
        }

        let categories = Category::ALL
            .iter()
            .zip(totals)
            .filter(|(_, (_, count))| *count > 0)
            .map(|(category, (total, count))| CategorySummary {
                category: *category,
                total,
                count,
                percentage: if total_spent.is_zero() {
                    0.0
                } else {
                    (total.cents() as f64 / total_spent.cents() as f64) * 100.0
                },
            })
            .collect();

        let period_label = period_label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_PERIOD_LABEL)
            .to_string();

        Self {
            period_label,
            total_spent,
            expense_count,
            categories,
        }
    }

    /// Mean amount per expense, zero when there are none
    pub fn average(&self) -> Money {
        if self.expense_count == 0 {
            Money::zero()
        } else {
            Money::from_cents(self.total_spent.cents() / self.expense_count as i64)
        }
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Expense Summary ({})\n", self.period_label));
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output.push_str(&format!(
            "Total Spent: {}\n",
            self.total_spent.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!("Expenses: {}\n", self.expense_count));

        if self.categories.is_empty() {
            return output;
        }

        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>12} {:>7} {:>7}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(50));
        output.push('\n');

        for row in &self.categories {
            output.push_str(&format!(
                "{:<20} {:>12} {:>7} {:>6.1}%\n",
                row.category.name(),
                row.total.format_with_symbol(currency_symbol),
                row.count,
                row.percentage
            ));
        }

        output
    }

    /// Export the category breakdown as CSV
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> ExpenseResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| ExpenseError::Export(e.to_string());

        csv.write_record(["Period", "Category", "Amount", "Count", "Percentage"])
            .map_err(export_err)?;
        for row in &self.categories {
            csv.write_record([
                self.period_label.clone(),
                row.category.name().to_string(),
                row.total.to_decimal_string(),
                row.count.to_string(),
                format!("{:.2}", row.percentage),
            ])
            .map_err(export_err)?;
        }
        csv.write_record([
            self.period_label.clone(),
            "TOTAL".to_string(),
            self.total_spent.to_decimal_string(),
            self.expense_count.to_string(),
            "100.00".to_string(),
        ])
        .map_err(export_err)?;

        csv.flush()
            .map_err(|e| ExpenseError::Export(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseDraft;
    use chrono::NaiveDate;

    fn expense(cents: i64, category: Category) -> Expense {
        Expense::from_draft(ExpenseDraft::new(
            "test",
            Money::from_cents(cents),
            category,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        ))
    }

    #[test]
    fn test_generate_summary() {
        let expenses = vec![
            expense(1250, Category::Food),
            expense(9500, Category::Transportation),
            expense(2500, Category::Entertainment),
            expense(750, Category::Food),
        ];

        let summary = ExpenseSummary::generate(&expenses, None);

        assert_eq!(summary.period_label, "All Time");
        assert_eq!(summary.total_spent, Money::from_cents(14000));
        assert_eq!(summary.expense_count, 4);
        assert_eq!(summary.average(), Money::from_cents(3500));

        let categories: Vec<_> = summary.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            [Category::Food, Category::Transportation, Category::Entertainment]
        );
        let food = &summary.categories[0];
        assert_eq!(food.total, Money::from_cents(2000));
        assert_eq!(food.count, 2);
        assert!((food.percentage - 14.2857).abs() < 0.01);
    }

    #[test]
    fn test_empty_summary() {
        let summary = ExpenseSummary::generate(&Vec::<Expense>::new(), Some("   "));
        assert_eq!(summary.period_label, DEFAULT_PERIOD_LABEL);
        assert_eq!(summary.total_spent, Money::zero());
        assert_eq!(summary.expense_count, 0);
        assert_eq!(summary.average(), Money::zero());
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_format_terminal() {
        let expenses = vec![expense(1250, Category::Food)];
        let summary = ExpenseSummary::generate(&expenses, Some("January 2024"));
        let output = summary.format_terminal("$");

        assert!(output.starts_with("Expense Summary (January 2024)"));
        assert!(output.contains("Total Spent: $12.50"));
        assert!(output.contains("Expenses: 1"));
        assert!(output.contains("Food"));
        assert!(output.contains("100.0%"));
    }

    #[test]
    fn test_export_csv() {
        let expenses = vec![expense(1250, Category::Food), expense(3750, Category::Other)];
        let summary = ExpenseSummary::generate(&expenses, None);

        let mut buf = Vec::new();
        summary.export_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], "Period,Category,Amount,Count,Percentage");
        assert_eq!(lines[1], "All Time,Food,12.50,1,25.00");
        assert_eq!(lines[2], "All Time,Other,37.50,1,75.00");
        assert_eq!(lines[3], "All Time,TOTAL,50.00,2,100.00");
    }
}
