//! User settings for the expense tracker
//!
//! Display preferences, the default list view, and where receipts are
//! uploaded. Stored as pretty JSON in `config.json`.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::paths::ExpensePaths;
use crate::error::ExpenseError;
use crate::models::Money;
use crate::services::projection::{CategoryFilter, HighlightRule, SortKey};
use crate::services::receipt::DEFAULT_MAX_RECEIPT_BYTES;

/// Environment variable overriding the upload endpoint
pub const UPLOAD_URL_ENV: &str = "EXPENSE_TRACKER_UPLOAD_URL";

/// Receipt upload settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Where receipts are POSTed; uploads are disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_max_receipt_bytes")]
    pub max_receipt_bytes: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            max_receipt_bytes: default_max_receipt_bytes(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format for display (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Expenses above this amount are highlighted
    #[serde(default = "default_highlight_threshold")]
    pub highlight_threshold: Money,

    #[serde(default)]
    pub default_sort: SortKey,

    #[serde(default)]
    pub default_filter: CategoryFilter,

    /// Label shown on the summary
    #[serde(default = "default_period_label")]
    pub period_label: String,

    /// Start each session with example expenses
    #[serde(default = "default_true")]
    pub load_sample_data: bool,

    #[serde(default)]
    pub upload: UploadSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_highlight_threshold() -> Money {
    HighlightRule::DEFAULT_THRESHOLD
}

fn default_period_label() -> String {
    "All Time".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_receipt_bytes() -> u64 {
    DEFAULT_MAX_RECEIPT_BYTES
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            highlight_threshold: default_highlight_threshold(),
            default_sort: SortKey::default(),
            default_filter: CategoryFilter::default(),
            period_label: default_period_label(),
            load_sample_data: true,
            upload: UploadSettings::default(),
        }
    }
}

/// Whether a strftime pattern can be rendered
fn is_valid_date_format(pattern: &str) -> bool {
    !pattern.is_empty() && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    ///
    /// The upload endpoint from `EXPENSE_TRACKER_UPLOAD_URL` wins over the file.
    pub fn load_or_create(paths: &ExpensePaths) -> Result<Self, ExpenseError> {
        let mut settings = Self::load_file(paths)?;
        if let Ok(url) = std::env::var(UPLOAD_URL_ENV) {
            if !url.trim().is_empty() {
                debug!(%url, "upload endpoint taken from environment");
                settings.upload.endpoint = Some(url);
            }
        }
        Ok(settings)
    }

    fn load_file(paths: &ExpensePaths) -> Result<Self, ExpenseError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            debug!(path = %settings_path.display(), "no config file, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| ExpenseError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            ExpenseError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        if !is_valid_date_format(&settings.date_format) {
            return Err(ExpenseError::Config(format!(
                "Invalid date_format '{}' in settings file",
                settings.date_format
            )));
        }

        debug!(path = %settings_path.display(), "config loaded");
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ExpensePaths) -> Result<(), ExpenseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ExpenseError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ExpenseError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn highlight_rule(&self) -> HighlightRule {
        HighlightRule::new(self.highlight_threshold)
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}
