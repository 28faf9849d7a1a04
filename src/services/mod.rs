//! Service layer for the expense tracker
//!
//! The service layer sits between the user interfaces and the store:
//! form validation, filtering and sorting, receipt upload, and submission.

pub mod expense;
pub mod projection;
pub mod receipt;
pub mod validation;

pub use expense::ExpenseService;
pub use projection::{CategoryFilter, HighlightRule, Projection, SortKey};
pub use receipt::{HttpReceiptUploader, Receipt, ReceiptUploader, UploadError};
pub use validation::{FieldError, FormField, ValidationCode, ValidationErrors};
