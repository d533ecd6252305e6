mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;
use trade_journal_core::JournalSettings;

use commands::journal::{BatchArgs, ExportArgs, ImportArgs, NormalizeArgs};

/// Trade journal: log closed trades and review performance
#[derive(Parser)]
#[command(
    name = "tj",
    version,
    about = "Trade journal analytics with decimal precision",
    long_about = "Normalizes closed trades (PnL, PnL %, R-multiple) and aggregates them \
                  into journal statistics: net PnL, win rate, average R, equity curve \
                  and per-strategy breakdown. Trades are read as JSON from --input or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a JSON settings file (currency, extra strategy labels)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one raw trade and print the derived record
    Normalize(NormalizeArgs),
    /// Dashboard metrics, equity curve and strategy breakdown
    Summary(BatchArgs),
    /// Flat journal table, one row per trade in entry order
    Journal(BatchArgs),
    /// Write the journal table to a CSV file
    Export(ExportArgs),
    /// Read an exported CSV back and summarize it
    Import(ImportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn load_settings(path: Option<&str>) -> Result<JournalSettings, Box<dyn std::error::Error>> {
    match path {
        Some(p) => input::file::read_json(p),
        None => Ok(JournalSettings::default()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> =
        load_settings(cli.config.as_deref()).and_then(|settings| match cli.command {
            Commands::Normalize(args) => commands::journal::run_normalize(args, &settings),
            Commands::Summary(args) => commands::journal::run_summary(args, &settings),
            Commands::Journal(args) => commands::journal::run_journal(args, &settings),
            Commands::Export(args) => commands::journal::run_export(args, &settings),
            Commands::Import(args) => commands::journal::run_import(args, &settings),
            Commands::Version => Ok(serde_json::json!({
                "result": { "version": env!("CARGO_PKG_VERSION") }
            })),
        });

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
