//! YAML Export functionality
//!
//! Same content as the JSON export, in a human-readable form.

use std::io::Write;

use crate::error::{ExpenseError, ExpenseResult};
use crate::export::json::ExpenseExport;
use crate::services::projection::Projection;

/// Export a view to YAML with a comment header
pub fn export_expenses_yaml<W: Write>(
    projection: &Projection<'_>,
    writer: &mut W,
) -> ExpenseResult<()> {
    let export = ExpenseExport::from_projection(projection);
    let io_err = |e: std::io::Error| ExpenseError::Export(e.to_string());

    writeln!(writer, "# Expense Tracker Export").map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(
        writer,
        "# Filter: {}, sort: {}",
        export.metadata.filter, export.metadata.sort
    )
    .map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| ExpenseError::Export(e.to_string()))?;

    Ok(())
}
