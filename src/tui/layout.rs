//! Layout definitions for the TUI
//!
//! The screen is split into the expense panel, a summary sidebar on the
//! right, and a one-line status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

const SUMMARY_WIDTH: u16 = 34;

/// Layout regions for the TUI
pub struct AppLayout {
    /// Filtered expense list
    pub main: Rect,
    /// Totals by category
    pub summary: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(SUMMARY_WIDTH)])
            .split(vertical[0]);

        Self {
            main: horizontal[0],
            summary: horizontal[1],
            status_bar: vertical[1],
        }
    }
}

/// Layout for the expense panel
pub struct MainPanelLayout {
    /// Filter, sort and totals line
    pub header: Rect,
    pub content: Rect,
}

impl MainPanelLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        Self {
            header: chunks[0],
            content: chunks[1],
        }
    }
}

/// Create a centered rect for dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Create a fixed-size centered rect, clamped to the available area
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_layout_splits_area() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.status_bar.y, 29);
        assert_eq!(layout.summary.width, SUMMARY_WIDTH);
        assert_eq!(layout.main.width + layout.summary.width, 100);
    }

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect_fixed(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect_fixed(60, 20, area), Rect::new(0, 0, 40, 10));
    }
}
