//! Help dialog
//!
//! Lists the keyboard shortcuts

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::layout::centered_rect;

/// Render the help dialog
pub fn render(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    ))
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        heading("Expenses"),
        Line::from(""),
        key_line("j/k ↑/↓", "Move selection"),
        key_line("g/G", "First/last expense"),
        key_line("a", "Add expense"),
        key_line("d", "Delete selected expense"),
        key_line("f", "Next category filter"),
        key_line("s", "Next sort order"),
        Line::from(""),
        heading("Add Expense Form"),
        Line::from(""),
        key_line("Tab/S-Tab", "Next/previous field"),
        key_line("←/→", "Change category"),
        key_line("Enter", "Save"),
        key_line("Esc", "Cancel"),
        Line::from(""),
        heading("Global"),
        Line::from(""),
        key_line("?", "Show/hide help"),
        key_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>12}", key), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ])
}
