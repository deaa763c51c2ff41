//! Chart panel: tab strip plus the selected chart.
//!
//! ratatui's `Chart` has a single y axis, so series on the secondary axis are
//! rescaled onto the primary range and the secondary range is shown in the
//! title. Volume bars are squeezed into the bottom third.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Tabs, Wrap};

use stockdash_core::chart::{AxisSide, ChartKind, ChartSpec, SeriesStyle};
use stockdash_core::format::format_number_abbreviated;
use stockdash_core::ErrorKind;

use crate::app::AppState;
use crate::theme;

/// Share of the primary range given to secondary-axis bars.
const BAR_BAND: f64 = 1.0 / 3.0;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = !app.input.focus.is_editing();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(format!(" {} ", app.chart.title()))
        .title_style(theme::panel_title(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(inner);

    let selected = ChartKind::ALL
        .iter()
        .position(|&k| k == app.chart)
        .unwrap_or(0);
    let titles: Vec<String> = ChartKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("{} {}", i + 1, kind.label()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme::muted())
        .highlight_style(theme::accent_bold());
    f.render_widget(tabs, parts[0]);

    let Some(page) = &app.page else {
        message(f, parts[1], "No dashboard yet.", theme::muted());
        return;
    };
    if !page.has_data() {
        let text = page
            .warnings
            .iter()
            .find(|w| matches!(w.kind, ErrorKind::Provider | ErrorKind::IndicatorComputation))
            .map_or("No data available.", |w| w.message.as_str());
        message(f, parts[1], text, theme::warning());
        return;
    }
    match page.chart(app.chart) {
        Some(spec) if !spec.is_empty() => render_spec(f, parts[1], spec),
        Some(_) => message(f, parts[1], "No rows in this window.", theme::muted()),
        None => {
            let reason = page
                .warnings_of(ErrorKind::ChartRender)
                .find(|w| w.message.contains(&format!("{:?}", app.chart)))
                .map_or("Chart unavailable.", |w| w.message.as_str());
            message(f, parts[1], reason, theme::negative());
        }
    }
}

fn message(f: &mut Frame, area: Rect, text: &str, style: Style) {
    let para = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(text, style))])
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

/// Widen a degenerate range and add 5% headroom.
fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    } else {
        let pad = lo.abs().max(1.0) * 0.05;
        (lo - pad, hi + pad)
    }
}

/// Map `value` from one range onto another.
fn rescale(value: f64, (from_lo, from_hi): (f64, f64), (to_lo, to_hi): (f64, f64)) -> f64 {
    if from_hi > from_lo {
        to_lo + (value - from_lo) / (from_hi - from_lo) * (to_hi - to_lo)
    } else {
        (to_lo + to_hi) / 2.0
    }
}

/// Plot points for every series, secondary series mapped onto `primary`.
fn project(spec: &ChartSpec, primary: (f64, f64)) -> Vec<Vec<(f64, f64)>> {
    let secondary = spec.bounds(AxisSide::Secondary);
    spec.series
        .iter()
        .map(|series| {
            series
                .values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|y| (i as f64, y)))
                .map(|(x, y)| match (series.axis, secondary) {
                    (AxisSide::Primary, _) | (AxisSide::Secondary, None) => (x, y),
                    (AxisSide::Secondary, Some((lo, hi))) => {
                        let target = match series.style {
                            SeriesStyle::Bar => (
                                primary.0,
                                primary.0 + (primary.1 - primary.0) * BAR_BAND,
                            ),
                            SeriesStyle::Line => primary,
                        };
                        let from = match series.style {
                            SeriesStyle::Bar => (0.0_f64.min(lo), hi),
                            SeriesStyle::Line => (lo, hi),
                        };
                        (x, rescale(y, from, target))
                    }
                })
                .collect()
        })
        .collect()
}

fn render_spec(f: &mut Frame, area: Rect, spec: &ChartSpec) {
    let primary = padded(spec.bounds(AxisSide::Primary).unwrap_or((0.0, 1.0)));
    let points = project(spec, primary);

    let datasets: Vec<Dataset> = spec
        .series
        .iter()
        .zip(&points)
        .map(|(series, data)| {
            let name = match series.axis {
                AxisSide::Primary => series.name.clone(),
                AxisSide::Secondary => format!("{} (right)", series.name),
            };
            Dataset::default()
                .name(name)
                .marker(match series.style {
                    SeriesStyle::Line => symbols::Marker::Braille,
                    SeriesStyle::Bar => symbols::Marker::HalfBlock,
                })
                .graph_type(match series.style {
                    SeriesStyle::Line => GraphType::Line,
                    SeriesStyle::Bar => GraphType::Bar,
                })
                .style(Style::default().fg(theme::series_color(series.color)))
                .data(data)
        })
        .collect();

    let x_max = spec.dates.len().saturating_sub(1) as f64;
    let x_labels = match (spec.dates.first(), spec.dates.last()) {
        (Some(first), Some(last)) => {
            let mid = spec.dates[spec.dates.len() / 2];
            vec![
                Span::styled(first.to_string(), theme::muted()),
                Span::styled(mid.to_string(), theme::muted()),
                Span::styled(last.to_string(), theme::muted()),
            ]
        }
        _ => Vec::new(),
    };

    let mut y_title = spec.y_title.clone();
    if let (Some(y2), Some((lo, hi))) = (&spec.y2_title, spec.bounds(AxisSide::Secondary)) {
        y_title = format!(
            "{y_title} | right: {y2} {}..{}",
            format_number_abbreviated(Some(lo)),
            format_number_abbreviated(Some(hi))
        );
    }

    let mid_y = (primary.0 + primary.1) / 2.0;
    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(y_title, theme::muted()))
                .style(theme::muted())
                .bounds([primary.0, primary.1])
                .labels(vec![
                    Span::styled(format!("{:.2}", primary.0), theme::muted()),
                    Span::styled(format!("{mid_y:.2}"), theme::muted()),
                    Span::styled(format!("{:.2}", primary.1), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
