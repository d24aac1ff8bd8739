use alerter::AlertEngine;
use analytics::{filter_sufficient, AnalyticsEngine};
use analyzer::{latest_snapshot, summarize_window, top_by_risk, top_by_yield, AnalysisWindow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use core_types::{group_by_symbol, AnalyticsRow, RawBar};
use portfolio::{summarize_portfolio, PortfolioOutcome};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The main entry point for the BullBoard analytics pipeline.
fn main() {
    // Initialize structured logging; RUST_LOG controls verbosity.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => {
            if let Err(e) = handle_analyze(args) {
                eprintln!("Error during analysis: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Rolling risk/yield analytics for a universe of equity tickers.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analytics pipeline over an already-fetched daily bar table.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Path to the JSON bar table produced by the fetch collaborator.
    #[arg(long)]
    bars: PathBuf,

    /// Symbols to analyze (comma-separated). Defaults to every symbol that
    /// survives the sufficiency gate.
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,

    /// Start of the analysis window (format: YYYY-MM-DD). Defaults to the
    /// earliest analytics date.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the analysis window (format: YYYY-MM-DD). Defaults to the
    /// latest analytics date.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// How many rows to show in the top-by-risk and top-by-yield tables.
    #[arg(long, default_value_t = 10)]
    top: usize,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of the analytics pipeline: gate, engine,
/// per-symbol aggregation, portfolio aggregation, alerts. All algorithmic
/// work lives in the library crates; this function only wires them together
/// and renders the results.
fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let engine = AnalyticsEngine::new(config.analytics.clone())?;
    let alert_engine = AlertEngine::new(config.alerts.clone())?;

    // 1. Load and group the raw bar table.
    let raw = std::fs::read_to_string(&args.bars)?;
    let bars: Vec<RawBar> = serde_json::from_str(&raw)?;
    let universe = group_by_symbol(bars)?;
    tracing::info!(symbols = universe.len(), path = %args.bars.display(), "loaded bar table");
    println!("Loaded {} symbols from {}", universe.len(), args.bars.display());

    // 2. Sufficiency gate.
    let gate = filter_sufficient(universe, config.analytics.min_days_needed);
    if !gate.dropped.is_empty() {
        println!(
            "Excluded for insufficient history (< {} days): {}",
            config.analytics.min_days_needed,
            gate.dropped.join(", ")
        );
    }

    // 3. Rolling analytics.
    let rows = engine.compute_universe(&gate.kept);
    if rows.is_empty() {
        anyhow::bail!("no symbol has enough history to analyze");
    }
    tracing::info!(
        rows = rows.len(),
        kept = gate.kept.len(),
        dropped = gate.dropped.len(),
        "rolling analytics computed"
    );

    // 4. Resolve the analysis window.
    let symbols = args.symbols.unwrap_or_else(|| {
        gate.kept.iter().map(|s| s.symbol().to_string()).collect()
    });
    let start = args
        .from
        .or_else(|| rows.iter().map(|r| r.date).min())
        .unwrap_or_default();
    let end = args
        .to
        .or_else(|| rows.iter().map(|r| r.date).max())
        .unwrap_or_default();
    let window = AnalysisWindow {
        symbols: symbols.clone(),
        start,
        end,
    };
    let windowed: Vec<AnalyticsRow> = rows
        .iter()
        .filter(|r| r.date >= start && r.date <= end && symbols.contains(&r.symbol))
        .cloned()
        .collect();

    // 5. Per-symbol period summaries.
    let summaries = summarize_window(&rows, &window);
    print_summary_table(&summaries);

    // 6. Latest snapshot and top-N rankings.
    let snapshot = latest_snapshot(&windowed);
    print_ranking_table("Top by risk score", &top_by_risk(&snapshot, args.top));
    print_ranking_table("Top by rolling yield", &top_by_yield(&snapshot, args.top));

    // 7. Equal-weighted portfolio view, when more than one symbol is selected.
    if symbols.len() >= 2 {
        let closes: BTreeMap<String, Vec<(NaiveDate, Decimal)>> = gate
            .kept
            .iter()
            .filter(|s| symbols.contains(&s.symbol().to_string()))
            .map(|s| {
                let series = s
                    .closes()
                    .into_iter()
                    .filter(|(date, _)| *date >= start && *date <= end)
                    .collect();
                (s.symbol().to_string(), series)
            })
            .collect();

        if closes.len() >= 2 {
            match summarize_portfolio(&closes, &config.analytics)? {
                PortfolioOutcome::Report(report) => {
                    println!("\nEqual-weighted portfolio ({} symbols):", report.symbols.len());
                    println!("  period:                {} to {}", report.period_start, report.period_end);
                    println!("  total return:          {}", fmt_decimal(report.total_return));
                    println!("  annualized return:     {}", fmt_decimal(report.annualized_return));
                    println!("  annualized volatility: {}", fmt_opt(report.annualized_volatility));
                    println!("  sharpe:                {}", fmt_opt(report.sharpe));
                    println!("  max drawdown:          {}", fmt_decimal(report.max_drawdown));
                }
                PortfolioOutcome::InsufficientOverlap { aligned_days } => {
                    println!(
                        "\nPortfolio view skipped: only {aligned_days} overlapping trading day(s) across the selected symbols."
                    );
                }
            }
        }
    }

    // 8. Alerts and per-symbol insights.
    let alerts = alert_engine.scan(&snapshot);
    if alerts.is_empty() {
        println!("\nNo current alerts.");
    } else {
        println!("\nAlerts:");
        for alert in &alerts {
            println!("  {alert}");
        }
    }

    for summary in &summaries {
        println!("\n{}:", summary.symbol);
        for line in alert_engine.insights(summary) {
            println!("  {line}");
        }
    }

    Ok(())
}

/// Renders the per-symbol period summaries as a table.
fn print_summary_table(summaries: &[analyzer::SymbolPeriodSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        "symbol",
        "days",
        "avg close",
        "total return",
        "avg volatility",
        "avg yield",
        "avg sharpe",
        "avg drawdown",
        "avg risk",
    ]);

    for s in summaries {
        table.add_row(vec![
            s.symbol.clone(),
            s.period_days.to_string(),
            fmt_decimal(s.avg_close),
            fmt_opt(s.total_return),
            fmt_opt(s.avg_volatility),
            fmt_opt(s.avg_rolling_yield),
            fmt_opt(s.avg_sharpe),
            fmt_decimal(s.avg_max_drawdown),
            fmt_opt(s.avg_risk_score),
        ]);
    }

    println!("\nPeriod summary:\n{table}");
}

/// Renders a snapshot ranking as a table.
fn print_ranking_table(title: &str, rows: &[&AnalyticsRow]) {
    let mut table = Table::new();
    table.set_header(vec!["symbol", "date", "risk score", "rolling yield", "sharpe"]);

    for row in rows {
        table.add_row(vec![
            row.symbol.clone(),
            row.date.to_string(),
            fmt_opt(row.risk_score),
            fmt_opt(row.rolling_yield),
            fmt_opt(row.sharpe),
        ]);
    }

    println!("\n{title}:\n{table}");
}

fn fmt_decimal(value: Decimal) -> String {
    value.round_dp(4).normalize().to_string()
}

fn fmt_opt(value: Option<Decimal>) -> String {
    value.map(fmt_decimal).unwrap_or_else(|| "n/a".to_string())
}
