//! Deterministic synthetic provider for offline use and tests.
//!
//! Generates a seeded random walk over weekdays. The same seed, ticker and
//! range always produce the same snapshot.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, DataProvider, DataSource, MarketSnapshot};
use crate::domain::{Bar, CompanyProfile};

pub struct SyntheticProvider {
    seed: u64,
    max_days: usize,
}

impl SyntheticProvider {
    /// `max_days` caps the series to the trailing business days of the range.
    pub fn new(seed: u64, max_days: usize) -> Self {
        Self { seed, max_days }
    }

    fn ticker_seed(&self, ticker: &str) -> u64 {
        ticker.bytes().fold(self.seed ^ 0xcbf2_9ce4_8422_2325, |acc, b| {
            (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        })
    }

    /// Trailing weekdays in `[start, end]`, oldest first.
    fn business_days(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut day = end;
        while day >= start && days.len() < self.max_days {
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                days.push(day);
            }
            match day.pred_opt() {
                Some(prev) => day = prev,
                None => break,
            }
        }
        days.reverse();
        days
    }

    pub fn bars(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
        let mut rng = StdRng::seed_from_u64(self.ticker_seed(ticker));
        let mut close: f64 = rng.gen_range(20.0..400.0);

        self.business_days(start, end)
            .into_iter()
            .map(|date| {
                let open = close * (1.0 + rng.gen_range(-0.01..0.01));
                close = (open * (1.0 + rng.gen_range(-0.025..0.026))).max(1.0);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.015));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.015));
                Bar {
                    date,
                    open,
                    high,
                    low,
                    close,
                    adj_close: close,
                    volume: rng.gen_range(1_000_000..50_000_000),
                }
            })
            .collect()
    }

    pub fn profile(&self, ticker: &str) -> CompanyProfile {
        let mut rng = StdRng::seed_from_u64(self.ticker_seed(ticker).rotate_left(17));
        CompanyProfile {
            short_name: Some(format!("{ticker} Synthetic Holdings")),
            sector: Some("Technology".into()),
            exchange: Some("SIM".into()),
            currency: Some("USD".into()),
            beta: Some(rng.gen_range(0.5..1.8)),
            recommendation_mean: Some(rng.gen_range(1.0..4.0)),
            recommendation_key: Some("hold".into()),
            market_cap: Some(rng.gen_range(1e9..3e12)),
            trailing_pe: Some(rng.gen_range(8.0..45.0)),
            forward_pe: Some(rng.gen_range(8.0..40.0)),
            peg_ratio: Some(rng.gen_range(0.5..3.0)),
            total_cash: Some(rng.gen_range(1e8..8e10)),
            total_revenue: Some(rng.gen_range(1e9..4e11)),
            debt_to_equity: Some(rng.gen_range(10.0..200.0)),
            total_debt: Some(rng.gen_range(1e8..1.2e11)),
            earnings_growth: Some(rng.gen_range(-0.2..0.4)),
            profit_margins: Some(rng.gen_range(0.02..0.35)),
            audit_risk: Some(f64::from(rng.gen_range(1u8..=10))),
            long_business_summary: Some(format!(
                "{ticker} Synthetic Holdings is a simulated company whose prices \
                 follow a seeded random walk. It exists for demos and tests."
            )),
        }
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(42, 2500)
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MarketSnapshot, DataError> {
        Ok(MarketSnapshot {
            bars: self.bars(ticker, start, end),
            profile: Some(self.profile(ticker)),
            source: DataSource::Synthetic,
        })
    }
}
