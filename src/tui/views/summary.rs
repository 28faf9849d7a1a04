//! Summary sidebar
//!
//! Spending by category across all expenses. The category being shown in
//! the list is marked.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::reports::ExpenseSummary;
use crate::tui::app::App;

/// Render the summary sidebar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.session.settings;
    let summary = ExpenseSummary::generate(
        app.session.store.list(),
        Some(settings.period_label.as_str()),
    );

    let block = Block::default()
        .title(format!(" {} ", summary.period_label))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Total:   ", Style::default().fg(Color::White)),
            Span::styled(
                settings.format_money(summary.total_spent),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Count:   ", Style::default().fg(Color::White)),
            Span::raw(summary.expense_count.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Average: ", Style::default().fg(Color::White)),
            Span::raw(settings.format_money(summary.average())),
        ]),
        Line::from(""),
    ];

    for row in &summary.categories {
        let style = if app.filter.matches_category(row.category) {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", row.category.name()), style),
            Span::styled(
                format!("{:>10}", settings.format_money(row.total)),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!(" {:>3.0}%", row.percentage),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
