//! Ticker / start / end inputs.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, Focus};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let editing = app.input.focus.is_editing();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(editing))
        .title(" StockDash [Tab]next field [Enter]render ")
        .title_style(theme::panel_title(editing));

    let end = if app.input.end.is_empty() {
        "today"
    } else {
        app.input.end.as_str()
    };

    let mut spans = Vec::new();
    field(&mut spans, "Ticker", &app.input.ticker, app.input.focus == Focus::Ticker);
    field(&mut spans, "Start", &app.input.start, app.input.focus == Focus::Start);
    field(&mut spans, "End", end, app.input.focus == Focus::End);

    if let Some(request) = &app.pending {
        spans.push(Span::styled(
            format!("  loading {}...", request.ticker),
            theme::warning(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn field<'a>(spans: &mut Vec<Span<'a>>, label: &'a str, value: &str, focused: bool) {
    spans.push(Span::styled(format!(" {label}: "), theme::muted()));
    if focused {
        spans.push(Span::styled(format!("{value}_"), theme::accent_bold()));
    } else {
        spans.push(Span::styled(value.to_string(), theme::text()));
    }
    spans.push(Span::raw("  "));
}
