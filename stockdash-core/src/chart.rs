//! Renderer-neutral chart specifications.
//!
//! Each [`ChartKind`] knows its window, its title and which table columns it
//! surfaces. [`build_chart`] turns an augmented table into a [`ChartSpec`]; a
//! shell decides how to draw it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Series;
use crate::table::{cols, AugmentedTable};
use crate::window::{DisplayWindow, Window, WindowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    PriceVolume,
    BollingerBands,
    Rsi,
    Macd,
    MovingAverages,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::PriceVolume,
        ChartKind::BollingerBands,
        ChartKind::Rsi,
        ChartKind::Macd,
        ChartKind::MovingAverages,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::PriceVolume => "Stock Closing Price and Volume",
            ChartKind::BollingerBands => "Bollinger Bands 1 year",
            ChartKind::Rsi => "RSI and Close Price Last 90 Days",
            ChartKind::Macd => "MACD Indicators Last 90 days",
            ChartKind::MovingAverages => "Simple Moving Average 50 and 200 days Last 500 days",
        }
    }

    pub fn window(self) -> Window {
        match self {
            ChartKind::PriceVolume => Window::Full,
            ChartKind::BollingerBands => Window::TrailingDays(365),
            ChartKind::Rsi | ChartKind::Macd => Window::TrailingDays(90),
            ChartKind::MovingAverages => Window::TrailingDays(500),
        }
    }

    /// Table columns surfaced by this chart, besides the date axis.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            ChartKind::PriceVolume => &[cols::CLOSE, cols::VOLUME],
            ChartKind::BollingerBands => &[cols::CLOSE, cols::BBU, cols::BBL],
            ChartKind::Rsi => &[cols::CLOSE, cols::RSI],
            ChartKind::Macd => &[cols::CLOSE, cols::MACD, cols::MACD_SIGNAL],
            ChartKind::MovingAverages => &[cols::CLOSE, cols::SMA_50, cols::SMA_200],
        }
    }

    /// Short tab label.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::PriceVolume => "Price",
            ChartKind::BollingerBands => "Bollinger",
            ChartKind::Rsi => "RSI",
            ChartKind::Macd => "MACD",
            ChartKind::MovingAverages => "SMA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisSide {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesStyle {
    Line,
    /// Translucent bars, used for volume.
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesColor {
    Cyan,
    Gray,
    Yellow,
    Red,
    Pink,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub name: String,
    pub values: Series,
    pub axis: AxisSide,
    pub style: SeriesStyle,
    pub color: SeriesColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub y_title: String,
    pub y2_title: Option<String>,
    pub dates: Vec<NaiveDate>,
    pub series: Vec<PlotSeries>,
}

impl ChartSpec {
    pub fn series_on(&self, axis: AxisSide) -> impl Iterator<Item = &PlotSeries> {
        self.series.iter().filter(move |s| s.axis == axis)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Min and max over every defined value plotted on `axis`.
    pub fn bounds(&self, axis: AxisSide) -> Option<(f64, f64)> {
        self.series_on(axis)
            .flat_map(|s| s.values.iter().flatten())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("{chart:?} chart needs column {column}")]
    MissingColumn { chart: ChartKind, column: String },

    #[error(transparent)]
    Window(#[from] WindowError),
}

struct Layout {
    y_title: &'static str,
    y2_title: Option<&'static str>,
    series: &'static [(&'static str, AxisSide, SeriesStyle, SeriesColor)],
}

fn layout(kind: ChartKind) -> Layout {
    use AxisSide::{Primary, Secondary};
    use SeriesColor::*;
    use SeriesStyle::{Bar, Line};

    match kind {
        ChartKind::PriceVolume => Layout {
            y_title: "Closing Price",
            y2_title: Some("Volume"),
            series: &[
                (cols::CLOSE, Primary, Line, Cyan),
                (cols::VOLUME, Secondary, Bar, Gray),
            ],
        },
        ChartKind::BollingerBands => Layout {
            y_title: "Close Price",
            y2_title: None,
            series: &[
                (cols::BBU, Primary, Line, Gray),
                (cols::BBL, Primary, Line, Gray),
                (cols::CLOSE, Primary, Line, Cyan),
            ],
        },
        ChartKind::Rsi => Layout {
            y_title: "Close Price",
            y2_title: Some(cols::RSI),
            series: &[
                (cols::CLOSE, Primary, Line, Cyan),
                (cols::RSI, Secondary, Line, Yellow),
            ],
        },
        ChartKind::Macd => Layout {
            y_title: "Close Price",
            y2_title: Some("MACD"),
            series: &[
                (cols::MACD, Secondary, Line, Yellow),
                (cols::MACD_SIGNAL, Secondary, Line, Red),
                (cols::CLOSE, Primary, Line, Cyan),
            ],
        },
        ChartKind::MovingAverages => Layout {
            y_title: "Close Price",
            y2_title: None,
            series: &[
                (cols::CLOSE, Primary, Line, Cyan),
                (cols::SMA_50, Primary, Line, Yellow),
                (cols::SMA_200, Primary, Line, Pink),
            ],
        },
    }
}

/// Turn a prepared display window into a chart.
pub fn plot(kind: ChartKind, window: &DisplayWindow, title: &str) -> Result<ChartSpec, ChartError> {
    let layout = layout(kind);
    let series = layout
        .series
        .iter()
        .map(|&(name, axis, style, color)| {
            let column = window.column(name).ok_or_else(|| ChartError::MissingColumn {
                chart: kind,
                column: name.to_string(),
            })?;
            Ok(PlotSeries {
                name: name.to_string(),
                values: column.values.clone(),
                axis,
                style,
                color,
            })
        })
        .collect::<Result<Vec<_>, ChartError>>()?;

    Ok(ChartSpec {
        kind,
        title: title.to_string(),
        y_title: layout.y_title.to_string(),
        y2_title: layout.y2_title.map(str::to_string),
        dates: window.dates().to_vec(),
        series,
    })
}

/// Window the table for `kind` and build its chart.
pub fn build_chart(kind: ChartKind, table: &AugmentedTable) -> Result<ChartSpec, ChartError> {
    let window = DisplayWindow::from_table(table, kind.window(), kind.columns())?;
    plot(kind, &window, kind.title())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;
    use crate::engine::IndicatorEngine;
    use crate::indicators::make_bars;

    fn table(n: usize) -> AugmentedTable {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0).collect();
        IndicatorEngine::standard().compute(&make_bars(&closes)).unwrap()
    }

    #[test]
    fn every_kind_builds_from_standard_table() {
        let t = table(600);
        for kind in ChartKind::ALL {
            let spec = build_chart(kind, &t).unwrap();
            assert_eq!(spec.title, kind.title());
            assert!(spec.series.iter().all(|s| s.values.len() == spec.dates.len()));
        }
    }

    #[test]
    fn rsi_chart_puts_rsi_on_secondary_axis() {
        let spec = build_chart(ChartKind::Rsi, &table(200)).unwrap();
        let secondary: Vec<&str> = spec
            .series_on(AxisSide::Secondary)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(secondary, ["RSI_14"]);
        assert_eq!(spec.y2_title.as_deref(), Some("RSI_14"));
        assert_eq!(spec.dates.len(), 91);
    }

    #[test]
    fn volume_is_drawn_as_bars() {
        let spec = build_chart(ChartKind::PriceVolume, &table(50)).unwrap();
        let volume = spec.series.iter().find(|s| s.name == "Volume").unwrap();
        assert_eq!(volume.style, SeriesStyle::Bar);
        assert_eq!(spec.dates.len(), 50);
        assert_eq!(spec.bounds(AxisSide::Secondary), Some((1000.0, 1000.0)));
    }

    #[test]
    fn missing_indicator_column_fails_that_chart_only() {
        let base = AugmentedTable::from_bars(&make_bars(&[1.0, 2.0, 3.0]));
        assert!(build_chart(ChartKind::Macd, &base).is_err());
        assert!(build_chart(ChartKind::PriceVolume, &base).is_ok());
    }

    #[test]
    fn plot_reports_missing_column() {
        let base = AugmentedTable::from_bars(&make_bars(&[1.0, 2.0]));
        let window = DisplayWindow::from_table(&base, Window::Full, &[cols::CLOSE]).unwrap();
        assert!(matches!(
            plot(ChartKind::Rsi, &window, "t"),
            Err(ChartError::MissingColumn { column, .. }) if column == cols::RSI
        ));
    }

    #[test]
    fn bounds_ignore_undefined_cells() {
        let mut base = AugmentedTable::from_bars(&make_bars(&[1.0, 2.0, 3.0]));
        base.push_column(Column::new(cols::RSI, vec![None, Some(30.0), Some(70.0)]))
            .unwrap();
        let spec = build_chart(ChartKind::Rsi, &base).unwrap();
        assert_eq!(spec.bounds(AxisSide::Secondary), Some((30.0, 70.0)));
        assert_eq!(spec.bounds(AxisSide::Primary), Some((1.0, 3.0)));
    }
}
