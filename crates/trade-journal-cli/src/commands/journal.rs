use clap::Args;
use serde_json::Value;
use std::error::Error;
use std::fs::File;
use tracing::info;

use trade_journal_core::{
    normalize_with_catalog, project, restore, summarize, JournalSettings, Portfolio,
};

use crate::input::{self, trades};
use crate::output::{csv_out, dashboard};

/// Arguments for normalizing a single trade
#[derive(Args)]
pub struct NormalizeArgs {
    /// Path to a JSON file holding one raw trade
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for commands that ingest a batch of trades
#[derive(Args)]
pub struct BatchArgs {
    /// Path to a JSON array of raw trades (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for CSV export
#[derive(Args)]
pub struct ExportArgs {
    /// Path to a JSON array of raw trades (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Destination CSV file
    #[arg(long, default_value = "trading_journal.csv")]
    pub out: String,
}

/// Arguments for CSV import
#[derive(Args)]
pub struct ImportArgs {
    /// CSV file previously written by `tj export`
    #[arg(long)]
    pub input: String,
}

pub fn run_normalize(
    args: NormalizeArgs,
    settings: &JournalSettings,
) -> Result<Value, Box<dyn Error>> {
    let raw = trades::load_trade(args.input.as_deref())?;
    let record = normalize_with_catalog(&raw, &settings.catalog())?;
    Ok(serde_json::to_value(record)?)
}

pub fn run_summary(args: BatchArgs, settings: &JournalSettings) -> Result<Value, Box<dyn Error>> {
    let portfolio = ingest(args.input.as_deref(), settings)?;
    summary_value(&portfolio, settings)
}

pub fn run_journal(args: BatchArgs, settings: &JournalSettings) -> Result<Value, Box<dyn Error>> {
    let portfolio = ingest(args.input.as_deref(), settings)?;
    Ok(serde_json::to_value(project(portfolio.records()))?)
}

pub fn run_export(args: ExportArgs, settings: &JournalSettings) -> Result<Value, Box<dyn Error>> {
    let portfolio = ingest(args.input.as_deref(), settings)?;
    let rows = project(portfolio.records());
    let file = File::create(&args.out)
        .map_err(|e| format!("Failed to create '{}': {}", args.out, e))?;
    csv_out::write_rows(file, &rows)?;
    info!(rows = rows.len(), path = %args.out, "exported journal");
    Ok(serde_json::json!({
        "result": {
            "exported": rows.len(),
            "path": args.out,
        }
    }))
}

pub fn run_import(args: ImportArgs, settings: &JournalSettings) -> Result<Value, Box<dyn Error>> {
    let path = input::file::resolve_path(&args.input)?;
    let file = File::open(&path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let rows = trades::read_rows(file)
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
    let portfolio = restore(&rows, &settings.catalog())?;
    info!(rows = rows.len(), "imported journal");
    summary_value(&portfolio, settings)
}

/// Normalize every trade from the input into a fresh session portfolio.
fn ingest(path: Option<&str>, settings: &JournalSettings) -> Result<Portfolio, Box<dyn Error>> {
    let raw = trades::load_trades(path)?;
    let mut portfolio = Portfolio::new();
    portfolio.submit_all(&raw, &settings.catalog())?;
    Ok(portfolio)
}

fn summary_value(
    portfolio: &Portfolio,
    settings: &JournalSettings,
) -> Result<Value, Box<dyn Error>> {
    let output = summarize(portfolio, settings);
    let headline = dashboard::headline(&output.result, &settings.currency);
    let mut value = serde_json::to_value(output)?;
    if let Value::Object(map) = &mut value {
        map.insert("dashboard".into(), Value::String(headline));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRADES: &str = r#"[
        {"date": "2025-06-15", "pair": "btc/usdt", "direction": "LONG", "strategy": "Breakout",
         "entry_price": 100, "stop_loss": 90, "take_profit": 120, "exit_price": 110,
         "size": 2, "fees": 1, "rating": 4},
        {"date": "2025-06-16", "pair": "eth/usdt", "direction": "SHORT", "strategy": "Reversal",
         "entry_price": 50, "stop_loss": 55, "take_profit": 40, "exit_price": 45,
         "size": 10, "fees": 2, "rating": 3}
    ]"#;

    fn trades_file(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("trades.json");
        let mut f = File::create(&path).unwrap();
        f.write_all(TRADES.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_summary_includes_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let value = run_summary(
            BatchArgs {
                input: Some(trades_file(&dir)),
            },
            &JournalSettings::default(),
        )
        .unwrap();
        assert_eq!(value["result"]["total_pnl"], "67");
        assert_eq!(
            value["dashboard"],
            "Net PnL $67.00 | Win rate 100.0% | Avg R 0.96R | Trades 2"
        );
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("journal.csv").to_string_lossy().into_owned();
        let settings = JournalSettings::default();

        let exported = run_export(
            ExportArgs {
                input: Some(trades_file(&dir)),
                out: out.clone(),
            },
            &settings,
        )
        .unwrap();
        assert_eq!(exported["result"]["exported"], 2);

        let imported = run_import(ImportArgs { input: out }, &settings).unwrap();
        assert_eq!(imported["result"]["record_count"], 2);
        assert_eq!(imported["result"]["equity_curve"][1]["cumulative_pnl"], "67");
    }

    #[test]
    fn test_rejected_trade_reports_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, TRADES.replace("\"SHORT\"", "\"SIDEWAYS\"")).unwrap();
        let err = run_journal(
            BatchArgs {
                input: Some(path.to_string_lossy().into_owned()),
            },
            &JournalSettings::default(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Trade #1 rejected"));
    }
}
