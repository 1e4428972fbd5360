//! CLI entry point for the sales dashboard.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use sales_dashboard::loader::parsing::parse_date;
use sales_dashboard::{
    DashboardConfig, DashboardConfigBuilder, DashboardError, DashboardReport, DashboardSession,
    DateRange, FilterSelection, SalesFrame,
};
use std::path::PathBuf;
use tracing::{info, warn};

const BAR_WIDTH: usize = 40;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Sales dashboard for CSV exports",
    long_about = "Loads a sales CSV, normalizes its column names and prints KPIs, \
                  monthly sales, top products and sales by region.\n\n\
                  EXAMPLES:\n  \
                  # Whole file\n  \
                  sales-dashboard -i data/sales_data.csv\n\n  \
                  # First quarter, two regions\n  \
                  sales-dashboard -i data.csv --start 2024-01-01 --end 2024-03-31 \
                  --region East --region West\n\n  \
                  # Machine-readable output\n  \
                  sales-dashboard -i data.csv --json | jq .kpis"
)]
struct Args {
    /// Path to the sales CSV file
    ///
    /// Overrides `source_path` from the config file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First order date to include (inclusive)
    #[arg(long)]
    start: Option<String>,

    /// Last order date to include (inclusive)
    #[arg(long)]
    end: Option<String>,

    /// Only include this region (repeatable)
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Only include this category (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Number of products in the top products chart
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Field separator of the CSV file
    #[arg(long)]
    separator: Option<char>,

    /// Print the first N normalized rows before the dashboard
    #[arg(long)]
    preview: Option<usize>,

    /// Output JSON to stdout instead of the text dashboard
    ///
    /// Disables all logs; only the JSON report (or error) is written.
    #[arg(long)]
    json: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Initialize the tracing subscriber for logging.
///
/// Logging stays off in JSON mode so stdout only carries the report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    let mut session = DashboardSession::new(config);

    let records = match session.load() {
        Ok(records) => records,
        Err(e) if e.is_blocking() => return fail(&e, args.json),
        Err(e) => return Err(e.into()),
    };

    if records.is_empty() {
        warn!("No rows with both an order date and a sales amount");
    }

    let selection = build_selection(&args, records.as_ref())?;

    if let Some(rows) = args.preview
        && !args.json
    {
        println!("{}", "=".repeat(80));
        println!("DATA PREVIEW (first {} rows)", rows);
        println!("{}", "=".repeat(80));
        println!("{}", records.preview(rows));
        println!();
    }

    let report = session.report(&selection)?;
    info!("Report ready: {} rows selected", report.rows_selected);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_dashboard(&report, &session);
    Ok(())
}

/// Config file first, then command line overrides.
fn build_config(args: &Args) -> Result<DashboardConfig> {
    let base = match &args.config {
        Some(path) => DashboardConfig::from_json_file(path)
            .with_context(|| format!("Loading config from {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    let mut builder = DashboardConfigBuilder::from_config(base);
    if let Some(ref input) = args.input {
        builder = builder.source_path(input);
    }
    if let Some(n) = args.top_n {
        builder = builder.top_n(n);
    }
    if let Some(separator) = args.separator {
        builder = builder.separator(separator);
    }

    Ok(builder.build()?)
}

/// Turn the filter flags into a selection, starting from the observed
/// date range.
fn build_selection(args: &Args, records: &impl SalesFrame) -> Result<FilterSelection> {
    let mut selection = FilterSelection::defaults(records)?;

    if args.start.is_some() || args.end.is_some() {
        let observed = selection.date_range;
        let start = parse_flag_date("--start", args.start.as_deref())?
            .or(observed.map(|r| r.start()));
        let end =
            parse_flag_date("--end", args.end.as_deref())?.or(observed.map(|r| r.end()));

        if let (Some(start), Some(end)) = (start, end) {
            match DateRange::new(start, end) {
                Ok(range) => selection.date_range = Some(range),
                Err(e) => warn!("{}; showing the full date range", e),
            }
        }
    }

    if !args.regions.is_empty() {
        selection = selection.with_regions(args.regions.iter().cloned());
    }
    if !args.categories.is_empty() {
        selection = selection.with_categories(args.categories.iter().cloned());
    }

    Ok(selection)
}

fn parse_flag_date(flag: &str, value: Option<&str>) -> Result<Option<chrono::NaiveDate>> {
    value
        .map(|raw| {
            parse_date(raw).ok_or_else(|| anyhow!("{} is not a valid date: '{}'", flag, raw))
        })
        .transpose()
}

/// Report a blocking load error and stop without rendering anything.
fn fail(e: &DashboardError, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(e)?);
    } else {
        eprintln!("{}", e);
    }
    std::process::exit(1);
}

/// Print the text dashboard.
fn print_dashboard(report: &DashboardReport, session: &DashboardSession) {
    println!();
    println!("{}", "=".repeat(80));
    println!("SALES DASHBOARD");
    println!("{}", "=".repeat(80));
    println!("  Source: {}", session.config().source_path.display());
    if let Some(range) = &report.selection.date_range {
        println!("  Period: {} to {}", range.start(), range.end());
    }
    if let Some(regions) = &report.selection.regions {
        println!("  Regions: {}", join(regions));
    }
    if let Some(categories) = &report.selection.categories {
        println!("  Categories: {}", join(categories));
    }
    let stats = &report.load_stats;
    if stats.rows_dropped() > 0 {
        println!(
            "  Skipped {} of {} rows without a valid order date or sales amount",
            stats.rows_dropped(),
            stats.rows_read
        );
    }
    println!();

    println!("KEY FIGURES");
    println!("{}", "-".repeat(40));
    if report.kpis.is_empty {
        println!("  No sales match the current filters");
    }
    println!("  Total Sales:   {:>14.2}", report.kpis.total);
    println!("  Average Sale:  {:>14.2}", report.kpis.average);
    println!("  Transactions:  {:>14}", report.kpis.count);
    println!();

    println!("SALES OVER TIME");
    println!("{}", "-".repeat(40));
    let months: Vec<(&str, f64)> = report
        .monthly_sales
        .iter()
        .map(|m| (m.month.as_str(), m.total))
        .collect();
    print_bars(&months);
    println!();

    if let Some(products) = &report.top_products {
        println!("TOP {} PRODUCTS", session.config().top_n);
        println!("{}", "-".repeat(40));
        let rows: Vec<(&str, f64)> = products
            .iter()
            .map(|p| (p.product.as_str(), p.total))
            .collect();
        print_bars(&rows);
        println!();
    }

    if let Some(regions) = &report.sales_by_region {
        println!("SALES BY REGION");
        println!("{}", "-".repeat(40));
        for region in regions {
            println!(
                "  {:<20} {:>14.2} {:>6.1}%",
                truncate_str(&region.region, 20),
                region.total,
                region.share * 100.0
            );
        }
        println!();
    }

    println!("{}", "=".repeat(80));
}

/// Horizontal bar chart scaled to the largest value.
fn print_bars(rows: &[(&str, f64)]) {
    if rows.is_empty() {
        println!("  (no data)");
        return;
    }

    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    for (label, value) in rows {
        let width = if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round().max(0.0) as usize
        } else {
            0
        };
        println!(
            "  {:<20} {:>14.2} {}",
            truncate_str(label, 20),
            value,
            "#".repeat(width)
        );
    }
}

fn join(values: &std::collections::BTreeSet<String>) -> String {
    values.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
