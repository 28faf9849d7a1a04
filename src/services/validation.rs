//! Expense form validation
//!
//! Turns raw [`ExpenseForm`] input into a typed [`ExpenseDraft`]. Every rule
//! is checked independently so all failing fields are reported together.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use crate::models::{Category, ExpenseDraft, ExpenseForm, Money, DATE_INPUT_FORMAT};

use super::receipt::UploadError;

/// A form field that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Description,
    Amount,
    Category,
    Date,
    /// Only set when a receipt file is rejected before upload
    Receipt,
}

impl FormField {
    /// Lowercase field name as used in messages and exports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Date => "date",
            Self::Receipt => "receipt",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which rule a field broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    /// Missing or blank
    Required,
    /// Not a number, not greater than zero, or above the per-expense limit
    InvalidRange,
    /// Present but not a recognised value
    InvalidFormat,
}

/// A single field's failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub code: ValidationCode,
    pub message: String,
}

impl FieldError {
    fn new(code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// All field failures for one form, keyed by field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, FieldError>,
}

impl ValidationErrors {
    /// True when no field failed
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The failure for a field, if it failed
    pub fn get(&self, field: FormField) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    /// Message for a field, if it failed
    pub fn message(&self, field: FormField) -> Option<&str> {
        self.get(field).map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    /// Iterate failures in field order
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &FieldError)> {
        self.errors.iter().map(|(field, err)| (*field, err))
    }

    /// Record a receipt file that failed the pre-upload checks
    pub fn reject_receipt(&mut self, error: &UploadError) {
        self.insert(
            FormField::Receipt,
            FieldError::new(ValidationCode::InvalidFormat, error.to_string()),
        );
    }

    fn insert(&mut self, field: FormField, error: FieldError) {
        self.errors.insert(field, error);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, err)| format!("{}: {}", field, err.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a form without building a draft
pub fn validate(form: &ExpenseForm) -> ValidationErrors {
    match parse(form) {
        Ok(_) => ValidationErrors::default(),
        Err(errors) => errors,
    }
}

/// Whether the form would produce a draft
pub fn is_valid(form: &ExpenseForm) -> bool {
    validate(form).is_empty()
}

/// Parse and validate a form into a typed draft
pub fn parse(form: &ExpenseForm) -> Result<ExpenseDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let description = check_description(&form.description)
        .map_err(|e| errors.insert(FormField::Description, e))
        .ok();
    let amount = check_amount(&form.amount)
        .map_err(|e| errors.insert(FormField::Amount, e))
        .ok();
    let category = check_category(form.category.as_deref())
        .map_err(|e| errors.insert(FormField::Category, e))
        .ok();
    let date = check_date(&form.date)
        .map_err(|e| errors.insert(FormField::Date, e))
        .ok();

    match (description, amount, category, date) {
        (Some(description), Some(amount), Some(category), Some(date)) if errors.is_empty() => {
            Ok(ExpenseDraft::new(description, amount, category, date))
        }
        _ => Err(errors),
    }
}

fn check_description(raw: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(
            ValidationCode::Required,
            "Description is required",
        ));
    }
    Ok(trimmed.to_string())
}

fn check_amount(raw: &str) -> Result<Money, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError::new(ValidationCode::Required, "Amount is required"));
    }
    match Money::parse(raw) {
        Ok(amount) if amount > Money::MAX_EXPENSE => Err(FieldError::new(
            ValidationCode::InvalidRange,
            format!("Amount must be at most {}", Money::MAX_EXPENSE),
        )),
        Ok(amount) if amount.is_positive() => Ok(amount),
        _ => Err(FieldError::new(
            ValidationCode::InvalidRange,
            "Amount must be greater than 0",
        )),
    }
}

fn check_category(raw: Option<&str>) -> Result<Category, FieldError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(FieldError::new(
            ValidationCode::Required,
            "Category is required",
        ));
    }
    raw.parse::<Category>()
        .map_err(|e| FieldError::new(ValidationCode::InvalidFormat, e.to_string()))
}

fn check_date(raw: &str) -> Result<NaiveDate, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(ValidationCode::Required, "Date is required"));
    }
    NaiveDate::parse_from_str(trimmed, DATE_INPUT_FORMAT).map_err(|_| {
        FieldError::new(
            ValidationCode::InvalidFormat,
            "Date must be a valid YYYY-MM-DD date",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ExpenseForm {
        ExpenseForm::new()
            .description("  Lunch at downtown cafe ")
            .amount("12.50")
            .category(Some("Food".into()))
            .date("2024-01-15")
    }

    #[test]
    fn test_valid_form_produces_draft() {
        let draft = parse(&valid_form()).unwrap();
        assert_eq!(draft.description, "Lunch at downtown cafe");
        assert_eq!(draft.amount, Money::from_cents(1250));
        assert_eq!(draft.category, Category::Food);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!(draft.receipt_url.is_none());
        assert!(is_valid(&valid_form()));
    }

    #[test]
    fn test_blank_description_is_required() {
        for description in ["", "   ", "\t\n"] {
            let errors = validate(&valid_form().description(description));
            assert_eq!(errors.len(), 1);
            let err = errors.get(FormField::Description).unwrap();
            assert_eq!(err.code, ValidationCode::Required);
            assert_eq!(err.message, "Description is required");
        }
    }

    #[test]
    fn test_missing_amount_is_required() {
        let errors = validate(&valid_form().amount("  "));
        assert_eq!(
            errors.get(FormField::Amount).unwrap().code,
            ValidationCode::Required
        );
        assert_eq!(errors.message(FormField::Amount), Some("Amount is required"));
    }

    #[test]
    fn test_non_positive_or_non_numeric_amount_is_out_of_range() {
        for amount in ["0", "0.00", "-5", "abc", "12..5", "0.001"] {
            let errors = validate(&valid_form().amount(amount));
            let err = errors.get(FormField::Amount).unwrap();
            assert_eq!(err.code, ValidationCode::InvalidRange, "amount {amount:?}");
            assert_eq!(err.message, "Amount must be greater than 0");
        }
    }

    #[test]
    fn test_amount_above_limit_is_out_of_range() {
        let draft = parse(&valid_form().amount("1000000000.00")).unwrap();
        assert_eq!(draft.amount, Money::MAX_EXPENSE);

        for amount in ["1000000000.01", "90000000000000000", "92233720368547758.07"] {
            let errors = validate(&valid_form().amount(amount));
            let err = errors.get(FormField::Amount).unwrap();
            assert_eq!(err.code, ValidationCode::InvalidRange, "amount {amount:?}");
            assert_eq!(err.message, "Amount must be at most $1000000000.00");
        }
    }

    #[test]
    fn test_category_required_and_known() {
        let errors = validate(&valid_form().category(None));
        assert_eq!(
            errors.get(FormField::Category).unwrap().code,
            ValidationCode::Required
        );

        let errors = validate(&valid_form().category(Some("Groceries".into())));
        let err = errors.get(FormField::Category).unwrap();
        assert_eq!(err.code, ValidationCode::InvalidFormat);
        assert_eq!(err.message, "Unknown category 'Groceries'");
    }

    #[test]
    fn test_date_required_and_real() {
        let errors = validate(&valid_form().date(""));
        assert_eq!(errors.message(FormField::Date), Some("Date is required"));

        for date in ["2024-02-30", "15/01/2024", "yesterday"] {
            let errors = validate(&valid_form().date(date));
            assert_eq!(
                errors.get(FormField::Date).unwrap().code,
                ValidationCode::InvalidFormat,
                "date {date:?}"
            );
        }
    }

    #[test]
    fn test_all_failures_reported_together() {
        let form = ExpenseForm::new()
            .description("")
            .amount("-1")
            .category(Some(String::new()))
            .date("");
        let errors = parse(&form).unwrap_err();
        assert_eq!(errors.len(), 4);
        let fields: Vec<_> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(
            fields,
            vec![
                FormField::Description,
                FormField::Amount,
                FormField::Category,
                FormField::Date
            ]
        );
    }

    #[test]
    fn test_rejected_receipt_joins_field_errors() {
        let mut errors = validate(&valid_form().description(""));
        errors.reject_receipt(&UploadError::NotAnImage);

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "description: Description is required; \
             receipt: Please select an image file (JPG, PNG, GIF)"
        );
        assert_eq!(
            errors.get(FormField::Receipt).unwrap().code,
            ValidationCode::InvalidFormat
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let form = valid_form().amount("nope").description("");
        assert_eq!(validate(&form), validate(&form));
    }

    #[test]
    fn test_error_display_lists_fields() {
        let errors = validate(&valid_form().description("").amount(""));
        assert_eq!(
            errors.to_string(),
            "description: Description is required; amount: Amount is required"
        );
    }
}
