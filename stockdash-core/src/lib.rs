//! StockDash Core: market data, indicators, windowing, formatting and charts.
//!
//! This crate holds everything behind the dashboard shells:
//! - Domain types (bars, series columns, company profile)
//! - Data providers (Yahoo Finance, CSV files, synthetic) and the fetch memo
//! - Indicator battery and the augmented table it produces
//! - Trailing display windows and metric formatting
//! - Renderer-neutral chart specs
//! - The render pipeline that turns a request into a dashboard page

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod format;
pub mod indicators;
pub mod pipeline;
pub mod request;
pub mod table;
pub mod window;

pub use chart::{ChartKind, ChartSpec};
pub use config::DashboardConfig;
pub use engine::IndicatorEngine;
pub use error::{DashboardError, ErrorKind};
pub use pipeline::{Dashboard, DashboardPage};
pub use request::{DashboardRequest, InvertedRangePolicy};
pub use table::AugmentedTable;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared with the TUI's render thread are
    /// Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::CompanyProfile>();
        require_sync::<domain::CompanyProfile>();
        require_send::<AugmentedTable>();
        require_sync::<AugmentedTable>();
        require_send::<ChartSpec>();
        require_sync::<ChartSpec>();
        require_send::<DashboardPage>();
        require_sync::<DashboardPage>();

        require_send::<data::FetchCache>();
        require_sync::<data::FetchCache>();
        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<IndicatorEngine>();
        require_sync::<IndicatorEngine>();
        require_send::<Dashboard>();
        require_sync::<Dashboard>();
    }

    /// The provider trait is object safe and shareable.
    #[test]
    fn provider_trait_object_builds() {
        fn _check(provider: &dyn data::DataProvider) -> bool {
            provider.is_available()
        }
        let synthetic = data::SyntheticProvider::default();
        assert!(_check(&synthetic));
    }
}
