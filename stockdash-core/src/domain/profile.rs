//! Company profile: fundamentals fetched alongside the price series.

use serde::{Deserialize, Serialize};

use crate::format::MetricFormatter;

/// Company and financial attributes for a ticker.
///
/// Every field is independently optional; providers fill what they have.
/// Field names serialize in the provider's camelCase convention so profile
/// JSON files can be dropped next to CSV price files unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub beta: Option<f64>,
    pub recommendation_mean: Option<f64>,
    pub recommendation_key: Option<String>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub total_cash: Option<f64>,
    pub total_revenue: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub total_debt: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub profit_margins: Option<f64>,
    pub audit_risk: Option<f64>,
    pub long_business_summary: Option<String>,
}

/// A labelled, display-ready value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

/// One column of the metrics grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricGroup {
    pub title: String,
    pub metrics: Vec<Metric>,
}

impl MetricGroup {
    fn new(title: &str, metrics: Vec<(&str, String)>) -> Self {
        Self {
            title: title.to_string(),
            metrics: metrics
                .into_iter()
                .map(|(label, value)| Metric {
                    label: label.to_string(),
                    value,
                })
                .collect(),
        }
    }
}

impl CompanyProfile {
    /// Build the metrics grid.
    ///
    /// The first four groups reproduce the dashboard's headline columns
    /// (identity, risk/size, analyst view, balance sheet); valuation and
    /// financials follow.
    pub fn metric_groups(&self, fmt: &mut MetricFormatter) -> Vec<MetricGroup> {
        let percent_of = |fraction: Option<f64>| fraction.map(|f| f * 100.0);

        vec![
            MetricGroup::new(
                "Company",
                vec![
                    ("Company Name", fmt.text(self.short_name.as_deref())),
                    ("Sector", fmt.text(self.sector.as_deref())),
                    ("Exchange", fmt.text(self.exchange.as_deref())),
                    ("Currency", fmt.text(self.currency.as_deref())),
                ],
            ),
            MetricGroup::new(
                "Risk & Size",
                vec![
                    ("Beta", fmt.decimal("Beta", self.beta)),
                    ("Market Cap", fmt.abbreviated("Market Cap", self.market_cap)),
                ],
            ),
            MetricGroup::new(
                "Analysts",
                vec![
                    (
                        "Yahoo! Recommendation Mean",
                        fmt.decimal("Yahoo! Recommendation Mean", self.recommendation_mean),
                    ),
                    (
                        "Yahoo! Recommend",
                        fmt.text(self.recommendation_key.as_deref()),
                    ),
                ],
            ),
            MetricGroup::new(
                "Balance Sheet",
                vec![
                    ("Total Cash", fmt.abbreviated("Total Cash", self.total_cash)),
                    (
                        "Total Debt/Equity (mrq)",
                        fmt.percent("Total Debt/Equity (mrq)", self.debt_to_equity),
                    ),
                ],
            ),
            MetricGroup::new(
                "Valuation",
                vec![
                    ("Trailing P/E", fmt.decimal("Trailing P/E", self.trailing_pe)),
                    ("Forward P/E", fmt.decimal("Forward P/E", self.forward_pe)),
                    ("PEG Ratio", fmt.decimal("PEG Ratio", self.peg_ratio)),
                ],
            ),
            MetricGroup::new(
                "Financials",
                vec![
                    (
                        "Total Revenue",
                        fmt.abbreviated("Total Revenue", self.total_revenue),
                    ),
                    ("Total Debt", fmt.abbreviated("Total Debt", self.total_debt)),
                    (
                        "Earnings Growth",
                        fmt.percent("Earnings Growth", percent_of(self.earnings_growth)),
                    ),
                    (
                        "Profit Margin",
                        fmt.percent("Profit Margin", percent_of(self.profit_margins)),
                    ),
                ],
            ),
        ]
    }

    /// Business summary text, `None` when missing or blank.
    pub fn summary(&self) -> Option<&str> {
        self.long_business_summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apple() -> CompanyProfile {
        CompanyProfile {
            short_name: Some("Apple Inc.".into()),
            sector: Some("Technology".into()),
            exchange: Some("NMS".into()),
            currency: Some("USD".into()),
            beta: Some(1.24),
            recommendation_mean: Some(2.1),
            recommendation_key: Some("buy".into()),
            market_cap: Some(2.95e12),
            total_cash: Some(61_550_000_000.0),
            debt_to_equity: Some(145.8),
            earnings_growth: Some(0.125),
            ..Default::default()
        }
    }

    fn value<'a>(groups: &'a [MetricGroup], label: &str) -> &'a str {
        groups
            .iter()
            .flat_map(|g| g.metrics.iter())
            .find(|m| m.label == label)
            .map(|m| m.value.as_str())
            .unwrap()
    }

    #[test]
    fn metric_grid_formats_known_fields() {
        let mut fmt = MetricFormatter::new();
        let groups = apple().metric_groups(&mut fmt);

        assert_eq!(value(&groups, "Company Name"), "Apple Inc.");
        assert_eq!(value(&groups, "Market Cap"), "2.95 T");
        assert_eq!(value(&groups, "Total Cash"), "61.55 B");
        assert_eq!(value(&groups, "Total Debt/Equity (mrq)"), "145.8%");
        assert_eq!(value(&groups, "Beta"), "1.24");
        assert_eq!(value(&groups, "Earnings Growth"), "12.5%");
        assert!(fmt.failures().is_empty());
    }

    #[test]
    fn missing_fields_render_not_available() {
        let mut fmt = MetricFormatter::new();
        let groups = CompanyProfile::default().metric_groups(&mut fmt);
        assert!(groups
            .iter()
            .flat_map(|g| g.metrics.iter())
            .all(|m| m.value == "N/A"));
    }

    #[test]
    fn deserializes_camel_case_json() {
        let json = r#"{"shortName":"Apple Inc.","trailingPE":31.2,"pegRatio":2.9,"debtToEquity":145.8}"#;
        let profile: CompanyProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.trailing_pe, Some(31.2));
        assert_eq!(profile.peg_ratio, Some(2.9));
        assert_eq!(profile.sector, None);
    }

    #[test]
    fn blank_summary_is_none() {
        let mut profile = apple();
        assert_eq!(profile.summary(), None);
        profile.long_business_summary = Some("  ".into());
        assert_eq!(profile.summary(), None);
        profile.long_business_summary = Some("Designs phones.".into());
        assert_eq!(profile.summary(), Some("Designs phones."));
    }
}
