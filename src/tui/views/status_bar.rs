//! Status bar view
//!
//! Shows the last status message and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::{ActiveDialog, App};

fn hints(app: &App) -> &'static str {
    match app.active_dialog {
        ActiveDialog::AddExpense => " Enter:Save  Esc:Cancel ",
        ActiveDialog::ConfirmDelete(_) => " y:Delete  n:Keep ",
        ActiveDialog::Help => " any key:Close ",
        ActiveDialog::None => " a:Add  d:Delete  f:Filter  s:Sort  ?:Help  q:Quit ",
    }
}

/// Render the status bar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![];

    if let Some(ref message) = app.status_message {
        spans.push(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hints = hints(app);
    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize)
        .saturating_sub(left_len)
        .saturating_sub(hints.chars().count());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
