//! The dashboard pipeline: fetch, compute, format, chart.
//!
//! [`Dashboard::render`] never fails. Whatever goes wrong is logged and
//! recorded on the page as a [`PageWarning`]; the parts that did work are
//! still returned.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::chart::{build_chart, ChartKind, ChartSpec};
use crate::config::ProviderConfig;
use crate::data::{build_provider, DataError, DataProvider, DataSource, FetchCache, MarketSnapshot};
use crate::domain::{CompanyProfile, MetricGroup};
use crate::engine::IndicatorEngine;
use crate::error::{DashboardError, ErrorKind};
use crate::format::MetricFormatter;
use crate::request::DashboardRequest;
use crate::table::AugmentedTable;

/// A user-visible problem recorded while building a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWarning {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&DashboardError> for PageWarning {
    fn from(err: &DashboardError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// One chart slot. `chart` is `None` when that chart failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub kind: ChartKind,
    pub chart: Option<ChartSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    pub request: DashboardRequest,
    pub source: Option<DataSource>,
    pub profile: Option<CompanyProfile>,
    pub metrics: Vec<MetricGroup>,
    pub table: Option<AugmentedTable>,
    pub charts: Vec<ChartPanel>,
    pub warnings: Vec<PageWarning>,
}

impl DashboardPage {
    fn new(request: DashboardRequest) -> Self {
        Self {
            request,
            source: None,
            profile: None,
            metrics: Vec::new(),
            table: None,
            charts: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, err: DashboardError) {
        match err.kind() {
            ErrorKind::IndicatorComputation | ErrorKind::ChartRender => {
                error!(ticker = %self.request.ticker, kind = ?err.kind(), error = %err, "dashboard step failed")
            }
            ErrorKind::Provider | ErrorKind::Format => {
                warn!(ticker = %self.request.ticker, kind = ?err.kind(), error = %err, "dashboard degraded")
            }
        }
        self.warnings.push(PageWarning::from(&err));
    }

    /// True when a price series came back and indicators were computed.
    pub fn has_data(&self) -> bool {
        self.table.as_ref().is_some_and(|t| !t.is_empty())
    }

    pub fn chart(&self, kind: ChartKind) -> Option<&ChartSpec> {
        self.charts
            .iter()
            .find(|panel| panel.kind == kind)
            .and_then(|panel| panel.chart.as_ref())
    }

    pub fn warnings_of(&self, kind: ErrorKind) -> impl Iterator<Item = &PageWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }

    pub fn summary(&self) -> Option<&str> {
        self.profile.as_ref().and_then(CompanyProfile::summary)
    }
}

/// A provider behind a fetch memo, plus the indicator battery.
pub struct Dashboard {
    provider: Box<dyn DataProvider>,
    cache: FetchCache,
    engine: IndicatorEngine,
}

impl Dashboard {
    pub fn new(provider: Box<dyn DataProvider>) -> Self {
        Self::with_engine(provider, IndicatorEngine::standard())
    }

    pub fn with_engine(provider: Box<dyn DataProvider>, engine: IndicatorEngine) -> Self {
        Self {
            provider,
            cache: FetchCache::new(),
            engine,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, DataError> {
        Ok(Self::new(build_provider(config)?))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    pub fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    /// Memoized provider call.
    pub fn fetch(&self, request: &DashboardRequest) -> Result<Arc<MarketSnapshot>, DashboardError> {
        self.cache
            .get_or_fetch(&request.key(), self.provider.as_ref())
            .map_err(|source| DashboardError::Provider {
                ticker: request.ticker.clone(),
                source,
            })
    }

    /// Build the full page for `request`.
    pub fn render(&self, request: &DashboardRequest) -> DashboardPage {
        info!(
            ticker = %request.ticker,
            start = %request.start,
            end = %request.end,
            provider = self.provider.name(),
            "rendering dashboard"
        );
        let mut page = DashboardPage::new(request.clone());

        let snapshot = match self.fetch(request) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                page.warn(e);
                return page;
            }
        };
        page.source = Some(snapshot.source);

        match &snapshot.profile {
            Some(profile) => {
                let mut fmt = MetricFormatter::new();
                page.metrics = profile.metric_groups(&mut fmt);
                page.profile = Some(profile.clone());
                for (field, source) in fmt.into_failures() {
                    page.warn(DashboardError::Format { field, source });
                }
            }
            None => page.warn(DashboardError::NoProfile {
                ticker: request.ticker.clone(),
            }),
        }

        if snapshot.bars.is_empty() {
            page.warn(DashboardError::NoData {
                ticker: request.ticker.clone(),
                start: request.start,
                end: request.end,
            });
            return page;
        }

        let table = match self.engine.compute(&snapshot.bars) {
            Ok(table) => table,
            Err(source) => {
                page.warn(DashboardError::IndicatorComputation {
                    ticker: request.ticker.clone(),
                    source,
                });
                return page;
            }
        };

        let mut charts = Vec::with_capacity(ChartKind::ALL.len());
        for kind in ChartKind::ALL {
            let chart = match build_chart(kind, &table) {
                Ok(spec) => Some(spec),
                Err(source) => {
                    page.warn(DashboardError::ChartRender {
                        ticker: request.ticker.clone(),
                        chart: kind,
                        source,
                    });
                    None
                }
            };
            charts.push(ChartPanel { kind, chart });
        }
        page.charts = charts;

        info!(
            ticker = %request.ticker,
            rows = table.len(),
            warnings = page.warnings.len(),
            "dashboard rendered"
        );
        page.table = Some(table);
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SyntheticProvider;
    use crate::domain::Bar;
    use crate::indicators::{make_bars, Sma};
    use crate::request::InvertedRangePolicy;
    use chrono::NaiveDate;

    struct Fixed(MarketSnapshot);

    impl DataProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(
            &self,
            _ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<MarketSnapshot, DataError> {
            Ok(self.0.clone())
        }
    }

    struct Down;

    impl DataProvider for Down {
        fn name(&self) -> &str {
            "down"
        }

        fn fetch(
            &self,
            _ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<MarketSnapshot, DataError> {
            Err(DataError::NetworkUnreachable("no route to host".into()))
        }
    }

    fn request(ticker: &str) -> DashboardRequest {
        DashboardRequest::new(
            ticker,
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            InvertedRangePolicy::Swap,
        )
        .unwrap()
    }

    fn snapshot(bars: Vec<Bar>, profile: Option<CompanyProfile>) -> MarketSnapshot {
        MarketSnapshot {
            bars,
            profile,
            source: DataSource::Synthetic,
        }
    }

    #[test]
    fn full_render_has_five_charts_and_metrics() {
        let dashboard = Dashboard::new(Box::new(SyntheticProvider::default()));
        let page = dashboard.render(&request("AAPL"));

        assert!(page.has_data());
        assert!(page.warnings.is_empty(), "{:?}", page.warnings);
        assert_eq!(page.charts.len(), 5);
        assert!(ChartKind::ALL.iter().all(|&k| page.chart(k).is_some()));
        assert_eq!(page.metrics.len(), 6);
        assert!(page.summary().is_some());
    }

    #[test]
    fn provider_error_becomes_warning() {
        let dashboard = Dashboard::new(Box::new(Down));
        let page = dashboard.render(&request("AAPL"));

        assert!(!page.has_data());
        assert!(page.charts.is_empty());
        assert_eq!(page.warnings.len(), 1);
        assert_eq!(page.warnings[0].kind, ErrorKind::Provider);
        assert!(page.warnings[0].message.starts_with("No data available"));
    }

    #[test]
    fn empty_series_keeps_profile_metrics() {
        let profile = CompanyProfile {
            short_name: Some("Ghost Corp".into()),
            ..CompanyProfile::default()
        };
        let dashboard = Dashboard::new(Box::new(Fixed(snapshot(Vec::new(), Some(profile)))));
        let page = dashboard.render(&request("GHST"));

        assert!(!page.has_data());
        assert!(page.charts.is_empty());
        assert!(!page.metrics.is_empty());
        let provider: Vec<_> = page.warnings_of(ErrorKind::Provider).collect();
        assert_eq!(provider.len(), 1);
        assert!(provider[0].message.starts_with("No data available for GHST"));
    }

    #[test]
    fn non_finite_metric_is_format_warning() {
        let profile = CompanyProfile {
            beta: Some(f64::NAN),
            ..CompanyProfile::default()
        };
        let dashboard = Dashboard::new(Box::new(Fixed(snapshot(make_bars(&[10.0; 30]), Some(profile)))));
        let page = dashboard.render(&request("NAN"));

        assert!(page.has_data());
        assert_eq!(page.warnings_of(ErrorKind::Format).count(), 1);
        let beta = page
            .metrics
            .iter()
            .flat_map(|g| &g.metrics)
            .find(|m| m.label == "Beta")
            .unwrap();
        assert_eq!(beta.value, "Error");
    }

    #[test]
    fn missing_column_fails_only_that_chart() {
        // Only SMA 50: Bollinger, RSI, MACD and SMA_200 columns are missing.
        let engine = IndicatorEngine::with_indicators(vec![Box::new(Sma::new(50))]);
        let bars = make_bars(&(0..120).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let dashboard = Dashboard::with_engine(Box::new(Fixed(snapshot(bars, None))), engine);
        let page = dashboard.render(&request("PART"));

        assert!(page.chart(ChartKind::PriceVolume).is_some());
        assert!(page.chart(ChartKind::BollingerBands).is_none());
        assert!(page.chart(ChartKind::MovingAverages).is_none());
        assert_eq!(page.warnings_of(ErrorKind::ChartRender).count(), 4);
    }

    #[test]
    fn rerender_uses_memo() {
        let dashboard = Dashboard::new(Box::new(SyntheticProvider::default()));
        let first = dashboard.render(&request("MSFT"));
        let second = dashboard.render(&request("msft"));

        assert_eq!(first, second);
        assert_eq!(dashboard.cache().misses(), 1);
        assert_eq!(dashboard.cache().hits(), 1);
    }

    #[test]
    fn all_void_closes_is_indicator_warning() {
        let mut bars = make_bars(&[1.0; 10]);
        for bar in &mut bars {
            bar.close = f64::NAN;
        }
        let dashboard = Dashboard::new(Box::new(Fixed(snapshot(bars, None))));
        let page = dashboard.render(&request("VOID"));

        assert!(page.table.is_none());
        assert_eq!(page.warnings_of(ErrorKind::IndicatorComputation).count(), 1);
    }
}
