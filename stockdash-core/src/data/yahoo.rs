//! Yahoo Finance data provider.
//!
//! Daily bars come from the v8 chart API, the company profile from the v10
//! quoteSummary API. Both calls share retries with exponential backoff and the
//! circuit breaker. A failed profile call never fails the fetch; the snapshot
//! just carries no profile.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! The CSV provider is the fallback when Yahoo is unavailable.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DataProvider, DataSource, MarketSnapshot};
use crate::domain::{Bar, CompanyProfile};

const BASE_URL: &str = "https://query2.finance.yahoo.com";
const PROFILE_MODULES: &str =
    "assetProfile,price,summaryDetail,defaultKeyStatistics,financialData";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance v10 quoteSummary response. Modules are kept as raw JSON
/// because their shapes drift between tickers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    result: Option<Vec<Map<String, Value>>>,
    error: Option<ApiError>,
}

/// First non-null value for `key` across the quoteSummary modules.
fn summary_field<'a>(modules: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    modules
        .values()
        .filter_map(Value::as_object)
        .find_map(|m| m.get(key))
        .filter(|v| !v.is_null())
}

fn summary_number(modules: &Map<String, Value>, key: &str) -> Option<f64> {
    match summary_field(modules, key)? {
        Value::Object(o) => o.get("raw").and_then(Value::as_f64),
        other => other.as_f64(),
    }
}

fn summary_text(modules: &Map<String, Value>, key: &str) -> Option<String> {
    summary_field(modules, key)?.as_str().map(str::to_string)
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(
        circuit_breaker: Arc<CircuitBreaker>,
        timeout: Duration,
        max_retries: u32,
        base_delay: Duration,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries,
            base_delay,
        })
    }

    fn chart_url(ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp() + 86_399;
        format!(
            "{BASE_URL}/v8/finance/chart/{ticker}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    fn profile_url(ticker: &str) -> String {
        format!("{BASE_URL}/v10/finance/quoteSummary/{ticker}?modules={PROFILE_MODULES}")
    }

    /// Parse the chart API response into bars.
    ///
    /// Rows where every field is null (non-trading days) are dropped. A
    /// "Not Found" error is reported as `SymbolNotFound`.
    fn parse_chart(ticker: &str, resp: ChartResponse) -> Result<Vec<Bar>, DataError> {
        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) if err.code == "Not Found" => {
                return Err(DataError::SymbolNotFound {
                    symbol: ticker.to_string(),
                })
            }
            (None, Some(err)) => {
                return Err(DataError::ResponseFormatChanged(format!(
                    "{}: {}",
                    err.code, err.description
                )))
            }
            (None, None) => {
                return Err(DataError::ResponseFormatChanged(
                    "empty result with no error".into(),
                ))
            }
        };

        let Some(data) = result.into_iter().next() else {
            return Ok(Vec::new());
        };
        // No timestamps: the range holds no trading days.
        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;
        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }
            let adj_close = adj_closes
                .as_ref()
                .and_then(|v| v.get(i).copied().flatten())
                .or(close);

            bars.push(Bar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                adj_close: adj_close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
            });
        }
        // Intraday "live" rows can repeat the last session's date.
        bars.dedup_by_key(|b| b.date);
        Ok(bars)
    }

    /// Flatten the quoteSummary modules into a profile.
    ///
    /// Numeric fields arrive either bare or wrapped as `{"raw": .., "fmt": ..}`.
    /// A field is taken from the first module that carries it.
    fn parse_profile(resp: QuoteSummaryResponse) -> Result<CompanyProfile, DataError> {
        if let Some(err) = resp.quote_summary.error {
            return Err(DataError::ResponseFormatChanged(format!(
                "{}: {}",
                err.code, err.description
            )));
        }
        let modules = resp
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DataError::ResponseFormatChanged("empty quoteSummary".into()))?;

        let number = |key: &str| summary_number(&modules, key);
        let text = |key: &str| summary_text(&modules, key);

        Ok(CompanyProfile {
            short_name: text("shortName").or_else(|| text("longName")),
            sector: text("sector"),
            exchange: text("exchangeName").or_else(|| text("exchange")),
            currency: text("currency"),
            beta: number("beta"),
            recommendation_mean: number("recommendationMean"),
            recommendation_key: text("recommendationKey"),
            market_cap: number("marketCap"),
            trailing_pe: number("trailingPE"),
            forward_pe: number("forwardPE"),
            peg_ratio: number("pegRatio"),
            total_cash: number("totalCash"),
            total_revenue: number("totalRevenue"),
            debt_to_equity: number("debtToEquity"),
            total_debt: number("totalDebt"),
            earnings_growth: number("earningsGrowth"),
            profit_margins: number("profitMargins"),
            audit_risk: number("auditRisk"),
            long_business_summary: text("longBusinessSummary"),
        })
    }

    /// GET a JSON document with retry and circuit breaker logic.
    fn get_json<T: DeserializeOwned>(&self, ticker: &str, url: &str) -> Result<T, DataError> {
        let blocked = || DataError::CircuitBreakerTripped {
            retry_in_secs: self.circuit_breaker.remaining_cooldown().as_secs(),
        };
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!(ticker, attempt, ?delay, "retrying Yahoo request");
                std::thread::sleep(delay);
            }
            if !self.circuit_breaker.is_allowed() {
                return Err(blocked());
            }

            let resp = match self.client.get(url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();
            match status {
                reqwest::StatusCode::FORBIDDEN => {
                    self.circuit_breaker.trip();
                    return Err(blocked());
                }
                reqwest::StatusCode::UNAUTHORIZED => {
                    return Err(DataError::AuthenticationRequired(
                        "Yahoo Finance requires authentication".into(),
                    ));
                }
                reqwest::StatusCode::NOT_FOUND => {
                    return Err(DataError::SymbolNotFound {
                        symbol: ticker.to_string(),
                    });
                }
                reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    self.circuit_breaker.record_failure();
                    let retry_after = resp
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(60);
                    last_error = Some(DataError::RateLimited {
                        retry_after_secs: retry_after,
                    });
                    continue;
                }
                s if s.is_server_error() => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(DataError::Other(format!("HTTP {s} for {ticker}")));
                    continue;
                }
                s if !s.is_success() => {
                    return Err(DataError::Other(format!("HTTP {s} for {ticker}")));
                }
                _ => {}
            }

            let parsed = resp.json::<T>().map_err(|e| {
                DataError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
            })?;
            self.circuit_breaker.record_success();
            return Ok(parsed);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let chart = self.get_json::<ChartResponse>(ticker, &Self::chart_url(ticker, start, end));
        match chart.and_then(|c| Self::parse_chart(ticker, c)) {
            Err(DataError::SymbolNotFound { .. }) => {
                warn!(ticker, "Yahoo has no chart for ticker");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn fetch_profile(&self, ticker: &str) -> Option<CompanyProfile> {
        let profile = self
            .get_json::<QuoteSummaryResponse>(ticker, &Self::profile_url(ticker))
            .and_then(Self::parse_profile);
        match profile {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(ticker, error = %e, "company profile unavailable");
                None
            }
        }
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MarketSnapshot, DataError> {
        let bars = self.fetch_bars(ticker, start, end)?;
        let profile = self.fetch_profile(ticker);
        debug!(ticker, bars = bars.len(), has_profile = profile.is_some(), "Yahoo fetch done");
        Ok(MarketSnapshot {
            bars,
            profile,
            source: DataSource::YahooFinance,
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_FIXTURE: &str = r#"{
      "chart": {
        "result": [{
          "meta": {"symbol": "AAPL", "currency": "USD"},
          "timestamp": [1704205800, 1704292200, 1704378600, 1704465000],
          "indicators": {
            "quote": [{
              "open":   [187.15, 184.22, null, 181.99],
              "high":   [188.44, 185.88, null, 182.76],
              "low":    [183.89, 183.43, null, 180.17],
              "close":  [185.64, 184.25, null, 181.18],
              "volume": [82488700, 58414500, null, 62303300]
            }],
            "adjclose": [{"adjclose": [184.94, 183.55, null, 180.50]}]
          }
        }],
        "error": null
      }
    }"#;

    const SUMMARY_FIXTURE: &str = r#"{
      "quoteSummary": {
        "result": [{
          "assetProfile": {
            "sector": "Technology",
            "longBusinessSummary": "Apple Inc. designs smartphones.",
            "auditRisk": 6
          },
          "price": {
            "shortName": "Apple Inc.",
            "exchangeName": "NasdaqGS",
            "currency": "USD",
            "marketCap": {"raw": 2950000000000, "fmt": "2.95T"}
          },
          "summaryDetail": {
            "beta": {"raw": 1.24, "fmt": "1.24"},
            "trailingPE": {"raw": 31.2, "fmt": "31.20"},
            "forwardPE": {}
          },
          "defaultKeyStatistics": {"pegRatio": {"raw": 2.9}},
          "financialData": {
            "recommendationMean": {"raw": 2.1},
            "recommendationKey": "buy",
            "totalCash": {"raw": 61550000000},
            "debtToEquity": {"raw": 145.8},
            "earningsGrowth": {"raw": 0.125},
            "profitMargins": null
          }
        }],
        "error": null
      }
    }"#;

    #[test]
    fn parses_chart_and_skips_null_rows() {
        let resp: ChartResponse = serde_json::from_str(CHART_FIXTURE).unwrap();
        let bars = YahooProvider::parse_chart("AAPL", resp).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, 185.64);
        assert_eq!(bars[0].adj_close, 184.94);
        assert_eq!(bars[0].volume, 82_488_700);
        assert_eq!(bars[2].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            YahooProvider::parse_chart("ZZZZ", resp),
            Err(DataError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn missing_timestamps_is_empty_series() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(YahooProvider::parse_chart("AAPL", resp).unwrap().is_empty());
    }

    #[test]
    fn parses_profile_across_modules() {
        let resp: QuoteSummaryResponse = serde_json::from_str(SUMMARY_FIXTURE).unwrap();
        let p = YahooProvider::parse_profile(resp).unwrap();

        assert_eq!(p.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(p.sector.as_deref(), Some("Technology"));
        assert_eq!(p.exchange.as_deref(), Some("NasdaqGS"));
        assert_eq!(p.market_cap, Some(2.95e12));
        assert_eq!(p.beta, Some(1.24));
        assert_eq!(p.trailing_pe, Some(31.2));
        assert_eq!(p.forward_pe, None);
        assert_eq!(p.peg_ratio, Some(2.9));
        assert_eq!(p.recommendation_key.as_deref(), Some("buy"));
        assert_eq!(p.debt_to_equity, Some(145.8));
        assert_eq!(p.profit_margins, None);
        assert_eq!(p.audit_risk, Some(6.0));
    }

    #[test]
    fn urls_cover_the_whole_end_day() {
        let url = YahooProvider::chart_url(
            "AAPL",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1704239999"));
        assert!(YahooProvider::profile_url("MSFT").contains("/quoteSummary/MSFT?modules=assetProfile"));
    }
}
