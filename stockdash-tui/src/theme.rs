//! Parrot/neon theme tokens.
//!
//! Neon accents meant for a dark terminal. Chart series colors map onto the
//! same palette so the dashboard reads the same in every panel.

use ratatui::style::{Color, Modifier, Style};

use stockdash_core::chart::SeriesColor;
use stockdash_core::ErrorKind;

/// Electric cyan: focus, highlights, close price.
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
/// Hot pink: errors, long moving average.
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Terminal color for a chart series.
pub fn series_color(color: SeriesColor) -> Color {
    match color {
        SeriesColor::Cyan => ACCENT,
        SeriesColor::Gray => TEXT_SECONDARY,
        SeriesColor::Yellow => Color::Rgb(255, 230, 0),
        SeriesColor::Red => Color::Rgb(255, 64, 64),
        SeriesColor::Pink => NEGATIVE,
    }
}

/// Metric values: placeholders are dimmed, substituted errors stand out.
pub fn metric_value(value: &str) -> Style {
    match value {
        stockdash_core::format::NOT_AVAILABLE => muted(),
        stockdash_core::format::FORMAT_ERROR => negative(),
        _ => text(),
    }
}

pub fn warning_kind(kind: ErrorKind) -> Style {
    match kind {
        ErrorKind::Provider | ErrorKind::Format => warning(),
        ErrorKind::IndicatorComputation | ErrorKind::ChartRender => negative(),
    }
}
