//! JSON Export functionality
//!
//! Exports a view of the expenses to JSON with schema versioning and a small
//! metadata block.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, Money};
use crate::services::projection::{CategoryFilter, Projection, SortKey};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Expense export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub metadata: ExportMetadata,

    /// Expenses in view order
    pub expenses: Vec<Expense>,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub filter: CategoryFilter,
    pub sort: SortKey,
    pub expense_count: usize,
    /// Sum of all exported amounts, in cents
    pub total: Money,
    pub earliest_expense: Option<String>,
    pub latest_expense: Option<String>,
}

impl ExpenseExport {
    /// Build an export from a filtered, sorted view
    pub fn from_projection(projection: &Projection<'_>) -> Self {
        let dates = projection.expenses.iter().map(|e| e.date);

        let metadata = ExportMetadata {
            filter: projection.filter,
            sort: projection.sort,
            expense_count: projection.count,
            total: projection.total,
            earliest_expense: dates.clone().min().map(|d| d.to_string()),
            latest_expense: dates.max().map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            metadata,
            expenses: projection.expenses.iter().map(|e| (*e).clone()).collect(),
        }
    }
}

/// Export a view to pretty-printed JSON
pub fn export_expenses_json<W: Write>(
    projection: &Projection<'_>,
    writer: &mut W,
) -> ExpenseResult<()> {
    let export = ExpenseExport::from_projection(projection);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| ExpenseError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| ExpenseError::Export(e.to_string()))?;
    Ok(())
}
