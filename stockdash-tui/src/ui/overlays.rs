//! Overlay widgets for help, the business summary and the error history.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys ")
        .title_style(theme::accent_bold());

    let keys = [
        ("Tab / Shift-Tab", "move between ticker, start, end and charts"),
        ("Enter", "render the dashboard"),
        ("Esc", "stop editing (quit when not editing)"),
        ("1-5", "Price, Bollinger, RSI, MACD, SMA charts"),
        ("Left / Right", "previous / next chart"),
        ("t or /", "type a new ticker"),
        ("r", "re-render (served from memory when unchanged)"),
        ("s", "business summary"),
        ("e", "error history"),
        ("q / Ctrl-C", "quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (key, action) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:>16}  "), theme::accent()),
            Span::styled(action, theme::muted()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Dates are YYYY-MM-DD; an empty end date means today.",
        theme::neutral(),
    )));

    f.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_summary(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Business Summary [any key]close ")
        .title_style(theme::accent_bold());

    let text = app
        .page
        .as_ref()
        .and_then(|p| p.summary())
        .unwrap_or("No summary available.");

    let para = Paragraph::new(text)
        .style(theme::text())
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app.error_history.iter().enumerate().skip(app.error_scroll) {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };
        let label_style = err.kind.map_or(theme::warning(), theme::warning_kind);

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.label()), label_style),
            Span::styled(err.message.as_str(), style),
        ]));
        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
        if lines.len() >= inner.height as usize {
            break;
        }
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
