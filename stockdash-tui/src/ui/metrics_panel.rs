//! Metrics grid and business summary.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use stockdash_core::domain::MetricGroup;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let title = match app.page.as_ref().and_then(|p| p.profile.as_ref()) {
        Some(profile) => format!(
            " {} ",
            profile
                .short_name
                .as_deref()
                .unwrap_or(app.input.ticker.as_str())
        ),
        None => " Metrics ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(title)
        .title_style(theme::panel_title(true));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(page) = &app.page else {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Enter a ticker and press Enter.", theme::muted())),
        ]);
        f.render_widget(hint, inner);
        return;
    };

    if page.metrics.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No company profile.", theme::muted())),
            inner,
        );
        return;
    }

    let lines = metric_lines(&page.metrics);
    let grid_height = (lines.len() as u16).min(inner.height);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(grid_height), Constraint::Min(0)])
        .split(inner);

    f.render_widget(Paragraph::new(lines), parts[0]);

    if let Some(summary) = page.summary() {
        let summary = Paragraph::new(vec![
            Line::from(Span::styled("Business Summary [s]", theme::accent_bold())),
            Line::from(Span::styled(summary, theme::secondary())),
        ])
        .wrap(Wrap { trim: true });
        f.render_widget(summary, parts[1]);
    }
}

fn metric_lines(groups: &[MetricGroup]) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for group in groups {
        lines.push(Line::from(Span::styled(
            group.title.as_str(),
            theme::accent_bold(),
        )));
        for metric in &group.metrics {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<20}", metric.label), theme::muted()),
                Span::styled(metric.value.as_str(), theme::metric_value(&metric.value)),
            ]));
        }
    }
    lines
}
