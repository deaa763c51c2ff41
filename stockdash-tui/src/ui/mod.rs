//! Top-level UI layout.

pub mod chart_panel;
pub mod input_bar;
pub mod metrics_panel;
pub mod overlays;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::{AppState, Overlay};

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: 3-line input bar, body, 1-line status bar.
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(f.area());

    input_bar::render(f, rows[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
        .split(rows[1]);
    metrics_panel::render(f, body[0], app);
    chart_panel::render(f, body[1], app);

    status_bar::render(f, rows[2], app);

    // Overlays on top of the body.
    match app.overlay {
        Overlay::Help => overlays::render_help(f, rows[1]),
        Overlay::Summary => overlays::render_summary(f, rows[1], app),
        Overlay::ErrorHistory => overlays::render_error_history(f, rows[1], app),
        Overlay::None => {}
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
