//! Expense service
//!
//! Ties validation, receipt upload and the store together. A submission
//! either completes fully or leaves the store as it was.

use tracing::{debug, info, warn};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseForm};
use crate::reports::ExpenseSummary;
use crate::storage::ExpenseStore;

use super::projection::{CategoryFilter, Projection, SortKey};
use super::receipt::{Receipt, ReceiptUploader, UploadError};
use super::validation;

/// Service for expense management
pub struct ExpenseService<'a> {
    store: &'a mut ExpenseStore,
    uploader: Option<&'a dyn ReceiptUploader>,
}

impl<'a> ExpenseService<'a> {
    /// Create a service without receipt upload
    pub fn new(store: &'a mut ExpenseStore) -> Self {
        Self {
            store,
            uploader: None,
        }
    }

    /// Use the given uploader for receipts attached to submissions
    pub fn with_uploader(mut self, uploader: &'a dyn ReceiptUploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Validate a form, upload its receipt if any, and record the expense
    ///
    /// On any error the store is untouched and the caller keeps the form.
    pub fn submit(&mut self, form: &ExpenseForm, receipt: Option<&Receipt>) -> ExpenseResult<Expense> {
        let mut draft = validation::parse(form).map_err(|errors| {
            debug!(%errors, "expense form rejected");
            ExpenseError::Validation(errors)
        })?;

        if let Some(receipt) = receipt {
            let uploader = self.uploader.ok_or(UploadError::NotConfigured)?;
            let url = uploader.upload(receipt).map_err(|e| {
                warn!(error = %e, "submission aborted, receipt upload failed");
                e
            })?;
            draft = draft.with_receipt_url(url);
        }

        Ok(self.store.add(draft))
    }

    /// Remove an expense by full ID or unambiguous prefix
    pub fn delete(&mut self, identifier: &str) -> ExpenseResult<Expense> {
        let id = self.store.find(identifier)?.id;
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| ExpenseError::expense_not_found(identifier))?;
        info!(id = %removed.id, description = %removed.description, "expense deleted");
        Ok(removed)
    }

    /// Look up an expense by full ID or unambiguous prefix
    pub fn get(&self, identifier: &str) -> ExpenseResult<&Expense> {
        self.store.find(identifier)
    }

    /// The filtered, sorted view with totals
    pub fn project(&self, filter: CategoryFilter, sort: SortKey) -> Projection<'_> {
        Projection::new(self.store.list(), filter, sort)
    }

    /// Summary of the expenses passing `filter`
    pub fn summary(&self, filter: CategoryFilter, period_label: Option<&str>) -> ExpenseSummary {
        ExpenseSummary::generate(
            self.store.list().iter().filter(|e| filter.matches(e)),
            period_label,
        )
    }

    pub fn count(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money};
    use crate::services::validation::FormField;
    use crate::storage::seeded_store;
    use std::cell::Cell;

    /// Uploader that records calls and returns a canned result
    struct StubUploader {
        result: Result<String, UploadError>,
        calls: Cell<usize>,
    }

    impl StubUploader {
        fn ok(url: &str) -> Self {
            Self {
                result: Ok(url.to_string()),
                calls: Cell::new(0),
            }
        }

        fn failing(err: UploadError) -> Self {
            Self {
                result: Err(err),
                calls: Cell::new(0),
            }
        }
    }

    impl ReceiptUploader for StubUploader {
        fn upload(&self, _receipt: &Receipt) -> Result<String, UploadError> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    fn form() -> ExpenseForm {
        ExpenseForm::new()
            .description("Taxi home")
            .amount("23.40")
            .category(Some("Transportation".into()))
            .date("2024-01-20")
    }

    fn receipt() -> Receipt {
        Receipt::from_bytes("taxi.png", vec![0; 64], 1024).unwrap()
    }

    #[test]
    fn test_submit_adds_expense() {
        let mut store = ExpenseStore::new();
        let mut service = ExpenseService::new(&mut store);

        let expense = service.submit(&form(), None).unwrap();

        assert_eq!(expense.description, "Taxi home");
        assert_eq!(expense.amount, Money::from_cents(2340));
        assert_eq!(expense.category, Category::Transportation);
        assert!(!expense.has_receipt());
        assert_eq!(service.count(), 1);
        assert_eq!(store.list(), &[expense]);
    }

    #[test]
    fn test_invalid_form_leaves_store_unchanged() {
        let mut store = seeded_store();
        let before = store.list().to_vec();
        let mut service = ExpenseService::new(&mut store);

        let err = service.submit(&form().description("  "), None).unwrap_err();

        assert!(err.is_validation());
        match err {
            ExpenseError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains(FormField::Description));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_submit_with_receipt_records_url() {
        let uploader = StubUploader::ok("https://receipts.test/taxi.png");
        let mut store = ExpenseStore::new();
        let mut service = ExpenseService::new(&mut store).with_uploader(&uploader);

        let expense = service.submit(&form(), Some(&receipt())).unwrap();

        assert_eq!(
            expense.receipt_url.as_deref(),
            Some("https://receipts.test/taxi.png")
        );
        assert_eq!(uploader.calls.get(), 1);
    }

    #[test]
    fn test_failed_upload_leaves_store_unchanged() {
        let uploader = StubUploader::failing(UploadError::Rejected("Quota exceeded".into()));
        let mut store = seeded_store();
        let before = store.list().to_vec();
        let mut service = ExpenseService::new(&mut store).with_uploader(&uploader);

        let err = service.submit(&form(), Some(&receipt())).unwrap_err();

        assert!(err.is_upload());
        assert_eq!(err.to_string(), "Upload error: Quota exceeded");
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_invalid_form_skips_upload() {
        let uploader = StubUploader::ok("https://receipts.test/x.png");
        let mut store = ExpenseStore::new();
        let mut service = ExpenseService::new(&mut store).with_uploader(&uploader);

        assert!(service
            .submit(&form().amount("0"), Some(&receipt()))
            .is_err());
        assert_eq!(uploader.calls.get(), 0);
    }

    #[test]
    fn test_receipt_without_uploader_is_rejected() {
        let mut store = ExpenseStore::new();
        let mut service = ExpenseService::new(&mut store);

        let err = service.submit(&form(), Some(&receipt())).unwrap_err();
        assert!(matches!(err, ExpenseError::Upload(UploadError::NotConfigured)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_by_prefix() {
        let mut store = seeded_store();
        let target = store.list()[1].clone();
        let mut service = ExpenseService::new(&mut store);

        let removed = service.delete(&target.id.to_string()).unwrap();

        assert_eq!(removed.id, target.id);
        assert_eq!(service.count(), 2);
        assert!(service.delete(&target.id.to_string()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_project_and_summary() {
        let mut store = seeded_store();
        let service = ExpenseService::new(&mut store);

        let projection = service.project(CategoryFilter::All, SortKey::Amount);
        let amounts: Vec<_> = projection.expenses.iter().map(|e| e.amount.cents()).collect();
        assert_eq!(amounts, [1250, 2500, 9500]);
        assert_eq!(projection.total, Money::from_cents(13250));

        let summary = service.summary(CategoryFilter::Only(Category::Food), Some("January"));
        assert_eq!(summary.period_label, "January");
        assert_eq!(summary.expense_count, 1);
        assert_eq!(summary.total_spent, Money::from_cents(1250));
    }
}
