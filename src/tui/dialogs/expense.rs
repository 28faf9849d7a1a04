//! Add expense dialog
//!
//! Five fields: description, amount, category, date and an optional receipt
//! path. A failed submission keeps everything the user typed and shows the
//! reasons next to the offending fields.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tracing::debug;

use crate::error::ExpenseError;
use crate::models::{Category, ExpenseForm};
use crate::services::{FormField, ValidationErrors};
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

/// Which field in the expense form is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpenseField {
    #[default]
    Description,
    Amount,
    Category,
    Date,
    Receipt,
}

impl ExpenseField {
    pub fn next(self) -> Self {
        match self {
            Self::Description => Self::Amount,
            Self::Amount => Self::Category,
            Self::Category => Self::Date,
            Self::Date => Self::Receipt,
            Self::Receipt => Self::Description,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Description => Self::Receipt,
            Self::Amount => Self::Description,
            Self::Category => Self::Amount,
            Self::Date => Self::Category,
            Self::Receipt => Self::Date,
        }
    }

    fn from_form_field(field: FormField) -> Self {
        match field {
            FormField::Description => Self::Description,
            FormField::Amount => Self::Amount,
            FormField::Category => Self::Category,
            FormField::Date => Self::Date,
            FormField::Receipt => Self::Receipt,
        }
    }

    fn form_field(self) -> Option<FormField> {
        match self {
            Self::Description => Some(FormField::Description),
            Self::Amount => Some(FormField::Amount),
            Self::Category => Some(FormField::Category),
            Self::Date => Some(FormField::Date),
            Self::Receipt => Some(FormField::Receipt),
        }
    }
}

/// State for the add expense form
#[derive(Debug, Clone)]
pub struct ExpenseFormState {
    pub focused_field: ExpenseField,
    pub description_input: TextInput,
    pub amount_input: TextInput,
    pub category: Category,
    pub date_input: TextInput,
    pub receipt_input: TextInput,
    /// Per-field validation failures from the last submission
    pub errors: ValidationErrors,
    /// Failure not tied to a field, e.g. a rejected receipt
    pub error_message: Option<String>,
}

impl ExpenseFormState {
    /// A blank form defaulting to Food and today's date
    pub fn new() -> Self {
        let defaults = ExpenseForm::new();
        Self {
            focused_field: ExpenseField::default(),
            description_input: TextInput::new().placeholder("What was it for?"),
            amount_input: TextInput::new().placeholder("0.00"),
            category: Category::default(),
            date_input: TextInput::new()
                .placeholder("YYYY-MM-DD")
                .content(defaults.date),
            receipt_input: TextInput::new().placeholder("optional image path"),
            errors: ValidationErrors::default(),
            error_message: None,
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    /// The text input under focus; the category field has none
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused_field {
            ExpenseField::Description => Some(&mut self.description_input),
            ExpenseField::Amount => Some(&mut self.amount_input),
            ExpenseField::Category => None,
            ExpenseField::Date => Some(&mut self.date_input),
            ExpenseField::Receipt => Some(&mut self.receipt_input),
        }
    }

    /// The raw form as typed
    pub fn to_form(&self) -> ExpenseForm {
        ExpenseForm::new()
            .description(self.description_input.value())
            .amount(self.amount_input.value())
            .category(Some(self.category.name().to_string()))
            .date(self.date_input.value())
    }

    pub fn receipt_path(&self) -> Option<PathBuf> {
        let path = self.receipt_input.value().trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }

    /// Error message for a field, if the last submission flagged it
    pub fn field_error(&self, field: ExpenseField) -> Option<&str> {
        match field {
            ExpenseField::Receipt => self
                .errors
                .message(FormField::Receipt)
                .or(self.error_message.as_deref()),
            other => other.form_field().and_then(|f| self.errors.message(f)),
        }
    }

    pub fn clear_errors(&mut self) {
        self.errors = ValidationErrors::default();
        self.error_message = None;
    }

    /// Record validation failures and focus the first failing field
    fn set_validation_errors(&mut self, errors: ValidationErrors) {
        if let Some((field, _)) = errors.iter().next() {
            self.focused_field = ExpenseField::from_form_field(field);
        }
        self.errors = errors;
    }
}

impl Default for ExpenseFormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate, upload the receipt if any, and record the expense
///
/// On success the dialog closes and the new expense is selected. On failure
/// the form stays open with its contents intact.
pub fn submit_expense(app: &mut App) {
    app.expense_form.clear_errors();
    let form = app.expense_form.to_form();

    let receipt_path = app.expense_form.receipt_path();
    let receipt = match app.session.prepare_receipt(&form, receipt_path.as_deref()) {
        Ok(receipt) => receipt,
        Err(errors) => {
            app.expense_form.set_validation_errors(errors);
            return;
        }
    };

    match app.session.service().submit(&form, receipt.as_ref()) {
        Ok(expense) => {
            app.close_dialog();
            app.expense_form = ExpenseFormState::new();
            app.select_expense(expense.id);
            app.set_status(format!(
                "Added expense {}: {}",
                expense.id, expense.description
            ));
        }
        Err(ExpenseError::Validation(errors)) => {
            debug!(count = errors.len(), "form kept open after validation errors");
            app.expense_form.set_validation_errors(errors);
        }
        Err(ExpenseError::Upload(e)) => {
            app.expense_form.focused_field = ExpenseField::Receipt;
            app.expense_form.error_message = Some(e.to_string());
        }
        Err(e) => app.expense_form.error_message = Some(e.to_string()),
    }
}

/// Handle key input for the expense dialog
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let form = &mut app.expense_form;

    match key.code {
        KeyCode::Esc => {
            app.close_dialog();
            return true;
        }

        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => form.prev_field(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),

        KeyCode::Enter => {
            submit_expense(app);
            return true;
        }

        KeyCode::Left if form.focused_field == ExpenseField::Category => {
            form.category = form.category.prev();
        }
        KeyCode::Right | KeyCode::Char(' ') if form.focused_field == ExpenseField::Category => {
            form.category = form.category.next();
        }

        KeyCode::Left => {
            if let Some(input) = form.focused_input() {
                input.move_left();
            }
        }
        KeyCode::Right => {
            if let Some(input) = form.focused_input() {
                input.move_right();
            }
        }
        KeyCode::Home => {
            if let Some(input) = form.focused_input() {
                input.move_start();
            }
        }
        KeyCode::End => {
            if let Some(input) = form.focused_input() {
                input.move_end();
            }
        }
        KeyCode::Backspace => {
            if let Some(input) = form.focused_input() {
                input.backspace();
            }
        }
        KeyCode::Delete => {
            if let Some(input) = form.focused_input() {
                input.delete();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = form.focused_input() {
                input.insert(c);
            }
        }

        _ => return false,
    }

    true
}

/// Render the add expense dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(64, 17, frame.area());
    frame.render_widget(Clear, area);

    let title = if app.session.uploads_enabled() {
        " Add Expense "
    } else {
        " Add Expense (receipt upload not configured) "
    };
    let block = Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };

    // Each field takes a value line and an error line
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let form = &app.expense_form;
    let fields = [
        (ExpenseField::Description, "Description", Some(&form.description_input)),
        (ExpenseField::Amount, "Amount", Some(&form.amount_input)),
        (ExpenseField::Category, "Category", None),
        (ExpenseField::Date, "Date", Some(&form.date_input)),
        (ExpenseField::Receipt, "Receipt", Some(&form.receipt_input)),
    ];

    for (chunk, (field, label, input)) in chunks.iter().zip(fields) {
        let focused = form.focused_field == field;
        let value_line = match input {
            Some(input) => field_line(label, input, focused),
            None => category_line(form.category, focused),
        };
        let mut lines = vec![value_line];
        if let Some(error) = form.field_error(field) {
            lines.push(Line::from(Span::styled(
                format!("{:>13}{}", "", error),
                Style::default().fg(Color::Red),
            )));
        }
        frame.render_widget(Paragraph::new(lines), *chunk);
    }

    let hints = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Next  "),
        Span::styled("[←/→]", Style::default().fg(Color::Yellow)),
        Span::raw(" Category  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[6]);
}

fn label_span(label: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Span::styled(format!("{:>11}: ", label), style)
}

fn field_line(label: &str, input: &TextInput, focused: bool) -> Line<'static> {
    let mut spans = vec![label_span(label, focused)];

    if !focused {
        if input.value().is_empty() {
            spans.push(Span::styled(
                input.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::styled(
                input.value().to_string(),
                Style::default().fg(Color::Yellow),
            ));
        }
        return Line::from(spans);
    }

    let (before, at, after) = input.split_at_cursor();
    let value_style = Style::default().fg(Color::White);
    spans.push(Span::styled(before.to_string(), value_style));
    spans.push(Span::styled(
        at.unwrap_or(' ').to_string(),
        Style::default().fg(Color::Black).bg(Color::White),
    ));
    spans.push(Span::styled(after.to_string(), value_style));
    Line::from(spans)
}

fn category_line(category: Category, focused: bool) -> Line<'static> {
    let value_style = if focused {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let mut spans = vec![label_span("Category", focused)];
    if focused {
        spans.push(Span::styled("◀ ", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::styled(category.name(), value_style));
    if focused {
        spans.push(Span::styled(" ▶", Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExpensePaths, Settings};
    use crate::session::Session;
    use crate::tui::app::ActiveDialog;
    use tempfile::TempDir;

    fn session(dir: &TempDir) -> Session {
        Session::start(
            ExpensePaths::with_base_dir(dir.path().to_path_buf()),
            Settings::default(),
            true,
        )
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_field_cycle() {
        let mut field = ExpenseField::Description;
        for _ in 0..5 {
            field = field.next();
        }
        assert_eq!(field, ExpenseField::Description);
        assert_eq!(ExpenseField::Description.prev(), ExpenseField::Receipt);
    }

    #[test]
    fn test_new_form_defaults() {
        let form = ExpenseFormState::new();
        assert_eq!(form.category, Category::Food);
        assert_eq!(form.date_input.value(), ExpenseForm::new().date);
        assert!(form.receipt_path().is_none());
        assert_eq!(form.to_form().category.as_deref(), Some("Food"));
    }

    #[test]
    fn test_typing_and_submitting() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let mut app = App::new(&mut session);
        app.open_dialog(ActiveDialog::AddExpense);

        type_text(&mut app, "Monthly bus pass");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "95");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert!(!app.has_dialog());
        let expense = app.selected_expense().unwrap();
        assert_eq!(expense.description, "Monthly bus pass");
        assert_eq!(expense.amount.cents(), 9500);
        assert_eq!(expense.category, Category::Transportation);
        assert!(app.status_message.as_deref().unwrap().starts_with("Added expense"));
    }

    #[test]
    fn test_invalid_submission_keeps_form() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let mut app = App::new(&mut session);
        app.open_dialog(ActiveDialog::AddExpense);

        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "abc");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.active_dialog, ActiveDialog::AddExpense);
        assert_eq!(app.expense_form.amount_input.value(), "abc");
        assert_eq!(app.expense_form.focused_field, ExpenseField::Description);
        assert_eq!(
            app.expense_form.field_error(ExpenseField::Description),
            Some("Description is required")
        );
        assert!(app.expense_form.field_error(ExpenseField::Amount).is_some());
        assert!(app.session.store.is_empty());
    }

    #[test]
    fn test_bad_receipt_keeps_form() {
        let dir = TempDir::new().unwrap();
        let receipt = dir.path().join("notes.txt");
        std::fs::write(&receipt, "text").unwrap();
        let mut session = session(&dir);
        let mut app = App::new(&mut session);
        app.open_dialog(ActiveDialog::AddExpense);

        type_text(&mut app, "Lunch");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12.50");
        app.expense_form.receipt_input.set(receipt.to_string_lossy());
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.active_dialog, ActiveDialog::AddExpense);
        assert_eq!(app.expense_form.focused_field, ExpenseField::Receipt);
        assert_eq!(
            app.expense_form.field_error(ExpenseField::Receipt),
            Some("Please select an image file (JPG, PNG, GIF)")
        );
        assert_eq!(app.expense_form.description_input.value(), "Lunch");
        assert!(app.session.store.is_empty());
    }

    #[test]
    fn test_bad_receipt_shown_with_field_errors() {
        let dir = TempDir::new().unwrap();
        let receipt = dir.path().join("receipt.pdf");
        std::fs::write(&receipt, b"%PDF").unwrap();
        let mut session = session(&dir);
        let mut app = App::new(&mut session);
        app.open_dialog(ActiveDialog::AddExpense);

        app.expense_form.receipt_input.set(receipt.to_string_lossy());
        press(&mut app, KeyCode::Enter);

        let form = &app.expense_form;
        assert_eq!(form.focused_field, ExpenseField::Description);
        assert_eq!(
            form.field_error(ExpenseField::Description),
            Some("Description is required")
        );
        assert_eq!(form.field_error(ExpenseField::Amount), Some("Amount is required"));
        assert_eq!(
            form.field_error(ExpenseField::Receipt),
            Some("Please select an image file (JPG, PNG, GIF)")
        );
        assert!(app.session.store.is_empty());
    }

    #[test]
    fn test_escape_cancels() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let mut app = App::new(&mut session);
        app.open_dialog(ActiveDialog::AddExpense);

        type_text(&mut app, "Snacks");
        press(&mut app, KeyCode::Esc);

        assert!(!app.has_dialog());
        assert!(app.session.store.is_empty());
    }
}
