//! StockDash CLI: render a dashboard page to the terminal or export it.
//!
//! Commands:
//! - `show`: fetch a ticker, compute indicators and print metrics and charts
//! - `export`: write the augmented table as CSV
//! - `indicators`: list the indicator battery with its warm-up periods

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stockdash_core::chart::{AxisSide, ChartSpec, SeriesStyle};
use stockdash_core::config::{DashboardConfig, ProviderKind};
use stockdash_core::format::{format_decimal, format_number_abbreviated};
use stockdash_core::{Dashboard, DashboardPage, DashboardRequest, IndicatorEngine};

#[derive(Parser)]
#[command(name = "stockdash", about = "StockDash: stock dashboard in the terminal")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true, default_value = "stockdash.toml")]
    config: PathBuf,

    /// Override the configured data provider.
    #[arg(long, global = true, value_enum)]
    provider: Option<ProviderArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Yahoo,
    Csv,
    Synthetic,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Yahoo => ProviderKind::Yahoo,
            ProviderArg::Csv => ProviderKind::Csv,
            ProviderArg::Synthetic => ProviderKind::Synthetic,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a ticker and print its dashboard.
    Show {
        /// Ticker symbol (case-insensitive).
        ticker: String,

        /// Start date (YYYY-MM-DD). Defaults to the configured start.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Print the whole page as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the augmented table (OHLCV plus indicators) as CSV.
    Export {
        /// Ticker symbol (case-insensitive).
        ticker: String,

        /// Output file.
        #[arg(long)]
        out: PathBuf,

        /// Start date (YYYY-MM-DD). Defaults to the configured start.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,
    },
    /// List the indicator battery.
    Indicators,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = DashboardConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(provider) = cli.provider {
        config.provider.kind = provider.into();
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();
    debug!(config = %cli.config.display(), provider = ?config.provider.kind, "configured");

    match cli.command {
        Commands::Show {
            ticker,
            start,
            end,
            json,
        } => run_show(&config, &ticker, start.as_deref(), end.as_deref(), json),
        Commands::Export {
            ticker,
            out,
            start,
            end,
        } => run_export(&config, &ticker, start.as_deref(), end.as_deref(), &out),
        Commands::Indicators => {
            run_indicators();
            Ok(())
        }
    }
}

fn parse_date(text: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    match text {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD")),
        None => Ok(default),
    }
}

fn build_request(
    config: &DashboardConfig,
    ticker: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DashboardRequest> {
    let start = parse_date(start, config.request.start)?;
    let end = parse_date(end, chrono::Local::now().date_naive())?;
    Ok(DashboardRequest::new(
        ticker,
        start,
        end,
        config.request.inverted_range,
    )?)
}

fn render(
    config: &DashboardConfig,
    ticker: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DashboardPage> {
    let request = build_request(config, ticker, start, end)?;
    let dashboard = Dashboard::from_config(&config.provider)?;
    Ok(dashboard.render(&request))
}

fn run_show(
    config: &DashboardConfig,
    ticker: &str,
    start: Option<&str>,
    end: Option<&str>,
    json: bool,
) -> Result<()> {
    let page = render(config, ticker, start, end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_page(&page);
    }

    if !page.has_data() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_export(
    config: &DashboardConfig,
    ticker: &str,
    start: Option<&str>,
    end: Option<&str>,
    out: &Path,
) -> Result<()> {
    let page = render(config, ticker, start, end)?;
    for warning in &page.warnings {
        eprintln!("[{}] {}", warning.kind.label(), warning.message);
    }

    let Some(table) = &page.table else {
        bail!("nothing to export for {}", page.request.ticker);
    };
    table.save_csv(out)?;
    println!(
        "Wrote {} rows x {} columns to {}",
        table.len(),
        table.columns().len(),
        out.display()
    );
    Ok(())
}

fn run_indicators() {
    let engine = IndicatorEngine::standard();
    println!("{:<16} {:>8}  Columns", "Indicator", "Warm-up");
    for indicator in engine.indicators() {
        println!(
            "{:<16} {:>8}  {}",
            indicator.name(),
            indicator.lookback(),
            indicator.outputs().join(", ")
        );
    }
    println!("\nLongest warm-up: {} rows", engine.warmup());
}

fn print_page(page: &DashboardPage) {
    let request = &page.request;
    println!(
        "=== {} ({} to {}) ===",
        request.ticker, request.start, request.end
    );
    if let Some(source) = page.source {
        println!("Source: {}", source.label());
    }

    for group in &page.metrics {
        println!("\n{}", group.title);
        for metric in &group.metrics {
            println!("  {:<22} {}", metric.label, metric.value);
        }
    }
    if let Some(summary) = page.summary() {
        println!("\nBusiness Summary\n  {summary}");
    }

    for panel in &page.charts {
        match &panel.chart {
            Some(chart) => print_chart(chart),
            None => println!("\n{}: unavailable", panel.kind.title()),
        }
    }

    if !page.warnings.is_empty() {
        println!("\nWarnings");
        for warning in &page.warnings {
            println!("  [{}] {}", warning.kind.label(), warning.message);
        }
    }
}

fn print_chart(chart: &ChartSpec) {
    println!("\n{}", chart.title);
    match (chart.dates.first(), chart.dates.last()) {
        (Some(first), Some(last)) => {
            println!("  {} rows, {first} to {last}", chart.dates.len())
        }
        _ => {
            println!("  no rows in window");
            return;
        }
    }

    for series in &chart.series {
        let latest = series.values.iter().rev().flatten().next().copied();
        let axis = match series.axis {
            AxisSide::Primary => &chart.y_title,
            AxisSide::Secondary => chart.y2_title.as_ref().unwrap_or(&chart.y_title),
        };
        let value = match series.style {
            SeriesStyle::Bar => format_number_abbreviated(latest),
            SeriesStyle::Line => format_decimal(latest),
        };
        println!("  {:<16} {:>12}  ({axis})", series.name, value);
    }
}
