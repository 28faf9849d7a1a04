//! Expense list view
//!
//! The filtered, sorted expenses with their total. Amounts over the
//! highlight threshold stand out.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::display::{truncate, HIGHLIGHT_MARK};
use crate::tui::app::App;
use crate::tui::layout::MainPanelLayout;

/// Render the expense panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let layout = MainPanelLayout::new(area);
    render_header(frame, app, layout.header);
    render_table(frame, app, layout.content);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let projection = app.projection();
    let settings = &app.session.settings;

    let block = Block::default()
        .title(" Expenses ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let line = Line::from(vec![
        Span::styled("Showing: ", Style::default().fg(Color::White)),
        Span::styled(projection.filter.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw(" │ "),
        Span::styled("Sort: ", Style::default().fg(Color::White)),
        Span::styled(projection.sort.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw(" │ "),
        Span::styled("Total: ", Style::default().fg(Color::White)),
        Span::styled(
            settings.format_money(projection.total),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({} expenses)", projection.count),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let projection = app.projection();
    if projection.is_empty() {
        let text = Paragraph::new("No expenses. Press 'a' to add one.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let settings = &app.session.settings;
    let highlight = settings.highlight_rule();

    let widths = [
        Constraint::Length(12), // Date
        Constraint::Min(20),    // Description
        Constraint::Length(15), // Category
        Constraint::Length(12), // Amount
        Constraint::Length(3),  // Flags
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("Date").style(bold),
        Cell::from("Description").style(bold),
        Cell::from("Category").style(bold),
        Cell::from("Amount").style(bold),
        Cell::from(""),
    ])
    .style(Style::default().fg(Color::Yellow))
    .height(1);

    let rows: Vec<Row> = projection
        .expenses
        .iter()
        .map(|expense| {
            let highlighted = highlight.is_highlighted(expense);
            let amount_style = if highlighted {
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };

            let mut flags = String::new();
            if highlighted {
                flags.push_str(HIGHLIGHT_MARK);
            }
            if expense.has_receipt() {
                flags.push('R');
            }

            Row::new(vec![
                Cell::from(expense.date.format(&settings.date_format).to_string()),
                Cell::from(truncate(&expense.description, 40)),
                Cell::from(expense.category.name()),
                Cell::from(settings.format_money(expense.amount)).style(amount_style),
                Cell::from(flags).style(Style::default().fg(Color::LightRed)),
            ])
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}
