// src/main.rs

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dividend_screener::config::{OutputFormat, ScreenerConfig};
use dividend_screener::models::{find_by_ticker, last_synced};
use dividend_screener::{load_and_refresh, ScoredRecord, SortDirection, SortKey, SortState};

#[derive(Parser, Debug)]
#[command(name = "dividend-screener")]
#[command(about = "Scores and ranks high-yield dividend stocks", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./screener.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the eligible stocks in ranked order
    Rank {
        /// Stock data JSON file
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Column to sort by (e.g. score, ticker, yield, pe)
        #[arg(short, long)]
        sort: Option<SortKey>,

        /// asc, desc or none
        #[arg(long)]
        direction: Option<SortDirection>,

        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show the scores of a single stock
    Show {
        ticker: String,

        /// Stock data JSON file
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Table,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ScreenerConfig::resolve(cli.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Rank {
            data,
            sort,
            direction,
            format,
            limit,
        } => {
            let path = data.unwrap_or_else(|| config.data.path.clone());
            let ranked = load_and_refresh(&path)
                .with_context(|| format!("Failed to load stock data from {}", path.display()))?;

            let mut state = config.display.sort_state();
            if let Some(key) = sort {
                // A new key without an explicit direction starts ascending
                state = match direction {
                    Some(direction) => SortState::new(key, direction),
                    None if key == state.key => state,
                    None => state.activate(key),
                };
            } else if let Some(direction) = direction {
                state.direction = direction;
            }
            info!(key = %state.key, direction = ?state.direction, "sorting");

            let mut rows = state.apply(&ranked);
            if let Some(limit) = limit.or(config.display.limit) {
                rows.truncate(limit);
            }

            match format.map(OutputFormat::from).unwrap_or(config.display.format) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Table => print_table(&rows, &ranked),
            }
        }
        Commands::Show { ticker, data } => {
            let path = data.unwrap_or_else(|| config.data.path.clone());
            let ranked = load_and_refresh(&path)
                .with_context(|| format!("Failed to load stock data from {}", path.display()))?;

            let ticker = ticker.to_uppercase();
            let Some(stock) = find_by_ticker(&ranked, &ticker) else {
                bail!("{} is not among the eligible stocks", ticker);
            };
            print_detail(stock);
        }
    }

    Ok(())
}

fn print_table(rows: &[ScoredRecord], all: &[ScoredRecord]) {
    if let Some(date) = last_synced(all) {
        println!("Last sync: {}", date.format("%d/%m/%Y"));
    }
    println!("{:<7} {:<32} {:<24} {:>7} {:>6}", "TICKER", "COMPANY", "SECTOR", "YIELD", "SCORE");
    for row in rows {
        let r = &row.record;
        let marker = if r.is_aristocrat() { "*" } else { " " };
        println!(
            "{:<6}{} {:<32.32} {:<24.24} {:>6.2}% {:>6}",
            r.ticker,
            marker,
            r.name,
            r.sector,
            r.dividend_yield * 100.0,
            row.scores.overall
        );
    }
}

fn print_detail(stock: &ScoredRecord) {
    let r = &stock.record;
    println!("{} - {} ({})", r.ticker, r.name, r.sector);
    println!("Price:            ${:.2}", r.price);
    match r.range_position() {
        Some(position) => println!(
            "52-week range:    ${:.2} - ${:.2} ({:.0}% of range)",
            r.low52,
            r.high52,
            position * 100.0
        ),
        None => println!("52-week range:    unavailable"),
    }
    println!("Dividend yield:   {:.2}%", r.dividend_yield * 100.0);
    println!("Payout ratio:     {:.1}%", r.payout_ratio * 100.0);
    println!("5Y growth:        {:.2}%", r.dividend_growth_5y * 100.0);
    println!(
        "Increases:        {} years{}",
        r.consecutive_years,
        if r.is_aristocrat() { " (aristocrat)" } else { "" }
    );
    println!("P/E:              {:.1}", r.pe_ratio);
    println!("ROE:              {:.1}%", r.roe * 100.0);
    println!("Debt/Equity:      {:.2}", r.debt_to_equity);
    println!(
        "Scores:           overall {} ({:?}), dividend {}, fundamentals {}",
        stock.scores.overall,
        stock.scores.band(),
        stock.scores.dividend,
        stock.scores.fundamentals
    );
    println!("Last updated:     {}", r.last_updated);
    println!();
    println!("{}", r.description);
}
