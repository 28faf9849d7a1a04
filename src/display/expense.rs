//! Expense display formatting
//!
//! Formats expenses for terminal output in table and detail views.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::Expense;
use crate::services::projection::{HighlightRule, Projection};

use super::truncate;

const DESCRIPTION_WIDTH: usize = 32;

/// Mark shown next to highlighted amounts
pub const HIGHLIGHT_MARK: &str = "!";

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "")]
    flags: String,
}

/// Options that change how expenses are rendered
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub date_format: String,
    pub highlight: HighlightRule,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            date_format: crate::models::DATE_INPUT_FORMAT.to_string(),
            highlight: HighlightRule::default(),
        }
    }
}

fn row_flags(expense: &Expense, options: &DisplayOptions) -> String {
    let mut flags = String::new();
    if options.highlight.is_highlighted(expense) {
        flags.push_str(HIGHLIGHT_MARK);
    }
    if expense.has_receipt() {
        flags.push('R');
    }
    flags
}

/// Format a projection as a table followed by its total
pub fn format_expense_list(projection: &Projection<'_>, options: &DisplayOptions) -> String {
    if projection.is_empty() {
        return format!("No expenses found (filter: {}).\n", projection.filter);
    }

    let rows = projection.expenses.iter().map(|expense| ExpenseRow {
        id: expense.id.to_string(),
        date: expense.date.format(&options.date_format).to_string(),
        description: truncate(&expense.description, DESCRIPTION_WIDTH),
        category: expense.category.to_string(),
        amount: expense.amount.format_with_symbol(&options.currency_symbol),
        flags: row_flags(expense, options),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(4)).with(Alignment::right()));

    let mut output = table.to_string();
    output.push('\n');
    output.push_str(&format!(
        "Total: {} ({} {}, filter: {}, sort: {})\n",
        projection.total.format_with_symbol(&options.currency_symbol),
        projection.count,
        if projection.count == 1 { "expense" } else { "expenses" },
        projection.filter,
        projection.sort,
    ));
    output
}

/// Format expense details for display
pub fn format_expense_details(expense: &Expense, options: &DisplayOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!("Full ID:     {}\n", expense.id.to_full_string()));
    output.push_str(&format!("Description: {}\n", expense.description));
    output.push_str(&format!(
        "Amount:      {}{}\n",
        expense.amount.format_with_symbol(&options.currency_symbol),
        if options.highlight.is_highlighted(expense) {
            " (over threshold)"
        } else {
            ""
        }
    ));
    output.push_str(&format!("Category:    {}\n", expense.category));
    output.push_str(&format!(
        "Date:        {}\n",
        expense.date.format(&options.date_format)
    ));
    output.push_str(&format!(
        "Recorded:    {}\n",
        expense.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(url) = &expense.receipt_url {
        output.push_str(&format!("Receipt:     {}\n", url));
    }

    output
}
