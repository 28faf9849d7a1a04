//! A running session: the store plus everything needed to act on it
//!
//! Both the TUI and the line shell own exactly one session for the life of
//! the process.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::{ExpensePaths, Settings};
use crate::display::DisplayOptions;
use crate::models::ExpenseForm;
use crate::services::receipt::{HttpReceiptUploader, Receipt, ReceiptUploader, UploadError};
use crate::services::validation::{self, ValidationErrors};
use crate::services::ExpenseService;
use crate::storage::{seeded_store, ExpenseStore};

/// State shared by every command in one run of the program
pub struct Session {
    pub store: ExpenseStore,
    pub settings: Settings,
    pub paths: ExpensePaths,
    uploader: Option<Box<dyn ReceiptUploader>>,
}

impl Session {
    /// Start a session from loaded settings
    ///
    /// The store starts with sample data when the settings allow it and
    /// `no_sample` is not set.
    pub fn start(paths: ExpensePaths, settings: Settings, no_sample: bool) -> Self {
        let store = if settings.load_sample_data && !no_sample {
            seeded_store()
        } else {
            ExpenseStore::new()
        };

        let uploader: Option<Box<dyn ReceiptUploader>> =
            match HttpReceiptUploader::from_settings(&settings.upload) {
                Ok(uploader) => {
                    debug!(endpoint = uploader.endpoint(), "receipt uploads enabled");
                    Some(Box::new(uploader))
                }
                Err(UploadError::NotConfigured) => None,
                Err(e) => {
                    warn!(error = %e, "receipt uploads disabled");
                    None
                }
            };

        Self {
            store,
            settings,
            paths,
            uploader,
        }
    }

    /// Replace the receipt uploader
    pub fn with_uploader(mut self, uploader: Box<dyn ReceiptUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn uploads_enabled(&self) -> bool {
        self.uploader.is_some()
    }

    /// A service over this session's store
    pub fn service(&mut self) -> ExpenseService<'_> {
        let service = ExpenseService::new(&mut self.store);
        match self.uploader.as_deref() {
            Some(uploader) => service.with_uploader(uploader),
            None => service,
        }
    }

    /// Load a receipt image, enforcing the configured size limit
    pub fn load_receipt(&self, path: &Path) -> Result<Receipt, UploadError> {
        Receipt::from_path(path, self.settings.upload.max_receipt_bytes)
    }

    /// Load the receipt for a form about to be submitted
    ///
    /// A rejected file is reported together with every failing form field.
    pub fn prepare_receipt(
        &self,
        form: &ExpenseForm,
        path: Option<&Path>,
    ) -> Result<Option<Receipt>, ValidationErrors> {
        let Some(path) = path else {
            return Ok(None);
        };
        self.load_receipt(path).map(Some).map_err(|e| {
            let mut errors = validation::validate(form);
            errors.reject_receipt(&e);
            errors
        })
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            currency_symbol: self.settings.currency_symbol.clone(),
            date_format: self.settings.date_format.clone(),
            highlight: self.settings.highlight_rule(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> ExpensePaths {
        ExpensePaths::with_base_dir(dir.path().to_path_buf())
    }

    #[test]
    fn test_start_with_samples() {
        let dir = TempDir::new().unwrap();
        let session = Session::start(paths(&dir), Settings::default(), false);
        assert_eq!(session.store.len(), 3);
        assert!(!session.uploads_enabled());
    }

    #[test]
    fn test_start_empty() {
        let dir = TempDir::new().unwrap();
        let session = Session::start(paths(&dir), Settings::default(), true);
        assert!(session.store.is_empty());

        let mut settings = Settings::default();
        settings.load_sample_data = false;
        let session = Session::start(paths(&dir), settings, false);
        assert!(session.store.is_empty());
    }

    #[test]
    fn test_configured_endpoint_enables_uploads() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.upload.endpoint = Some("http://localhost:9/upload".into());
        let session = Session::start(paths(&dir), settings, true);
        assert!(session.uploads_enabled());
    }

    #[test]
    fn test_prepare_receipt_reports_all_problems() {
        let dir = TempDir::new().unwrap();
        let session = Session::start(paths(&dir), Settings::default(), true);
        let pdf = dir.path().join("receipt.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();
        let form = ExpenseForm::new().description(" ").amount("9.00");

        let errors = session.prepare_receipt(&form, Some(&pdf)).unwrap_err();

        assert!(errors.contains(validation::FormField::Description));
        assert!(errors.contains(validation::FormField::Receipt));
        assert!(!errors.contains(validation::FormField::Amount));

        let png = dir.path().join("receipt.png");
        std::fs::write(&png, [0u8; 16]).unwrap();
        let receipt = session.prepare_receipt(&form, Some(&png)).unwrap();
        assert!(receipt.is_some());
        assert!(session.prepare_receipt(&form, None).unwrap().is_none());
    }

    #[test]
    fn test_display_options_follow_settings() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.currency_symbol = "€".into();
        let session = Session::start(paths(&dir), settings, true);
        assert_eq!(session.display_options().currency_symbol, "€");
    }
}
