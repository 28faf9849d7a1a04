//! Export module for the expense tracker
//!
//! Writes a filtered, sorted view of the expenses in one of three formats:
//! - CSV: spreadsheet-compatible table
//! - JSON: machine-readable, with metadata
//! - YAML: human-readable, same content as JSON

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::{ExpenseError, ExpenseResult};
use crate::services::projection::Projection;

pub use self::csv::{export_expenses_csv, CSV_HEADER};
pub use self::json::{export_expenses_json, ExpenseExport, ExportMetadata, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_expenses_yaml;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Write a view in this format
    pub fn write<W: Write>(&self, projection: &Projection<'_>, writer: &mut W) -> ExpenseResult<()> {
        match self {
            Self::Csv => export_expenses_csv(&projection.expenses, writer),
            Self::Json => export_expenses_json(projection, writer),
            Self::Yaml => export_expenses_yaml(projection, writer),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(ExpenseError::Export(format!(
                "Unknown export format '{}', expected csv, json or yaml",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::projection::{CategoryFilter, SortKey};
    use crate::storage::seeded_store;

    #[test]
    fn test_parse_format() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_write_dispatches_by_format() {
        let store = seeded_store();
        let projection = Projection::new(store.list(), CategoryFilter::All, SortKey::Date);

        let mut buf = Vec::new();
        ExportFormat::Csv.write(&projection, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().starts_with("ID,Date,"));

        let mut buf = Vec::new();
        ExportFormat::Json.write(&projection, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().starts_with('{'));
    }
}
