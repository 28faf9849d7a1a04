//! CSV Export functionality
//!
//! Writes expenses as a spreadsheet-compatible CSV table.

use std::io::Write;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;

/// Column header row
pub const CSV_HEADER: [&str; 6] = ["ID", "Date", "Description", "Category", "Amount", "Receipt URL"];

/// Export expenses to CSV in the order given
pub fn export_expenses_csv<W: Write>(expenses: &[&Expense], writer: &mut W) -> ExpenseResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let export_err = |e: csv::Error| ExpenseError::Export(e.to_string());

    csv.write_record(CSV_HEADER).map_err(export_err)?;

    for expense in expenses {
        csv.write_record([
            expense.id.to_full_string(),
            expense.date.format("%Y-%m-%d").to_string(),
            expense.description.clone(),
            expense.category.name().to_string(),
            expense.amount.to_decimal_string(),
            expense.receipt_url.clone().unwrap_or_default(),
        ])
        .map_err(export_err)?;
    }

    csv.flush()
        .map_err(|e| ExpenseError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ExpenseDraft, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_csv_export() {
        let lunch = Expense::from_draft(ExpenseDraft::new(
            "Lunch, with \"friends\"",
            Money::from_cents(1250),
            Category::Food,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        ));
        let bus = Expense::from_draft(
            ExpenseDraft::new(
                "Monthly bus pass",
                Money::from_cents(9500),
                Category::Transportation,
                NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
            )
            .with_receipt_url("https://receipts.test/bus.png"),
        );

        let mut buf = Vec::new();
        export_expenses_csv(&[&lunch, &bus], &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID,Date,Description,Category,Amount,Receipt URL");
        assert_eq!(
            lines[1],
            format!(
                "{},2024-01-15,\"Lunch, with \"\"friends\"\"\",Food,12.50,",
                lunch.id.to_full_string()
            )
        );
        assert!(lines[2].ends_with(",Transportation,95.00,https://receipts.test/bus.png"));
    }

    #[test]
    fn test_csv_export_empty() {
        let mut buf = Vec::new();
        export_expenses_csv(&[], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "ID,Date,Description,Category,Amount,Receipt URL\n"
        );
    }
}
