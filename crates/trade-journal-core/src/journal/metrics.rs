use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::trace;

use crate::journal::portfolio::Portfolio;
use crate::journal::record::TradeRecord;
use crate::journal::strategy::Strategy;
use crate::settings::JournalSettings;
use crate::types::*;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Dashboard-level view of a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub record_count: usize,
    pub total_pnl: Money,
    /// Percent of trades with strictly positive PnL
    pub win_rate: Rate,
    /// Mean R-multiple; 0 for an empty portfolio
    pub average_r_multiple: Multiple,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub breakeven_trades: usize,
    /// Largest peak-to-trough decline of cumulative PnL, as a positive amount
    pub max_drawdown: Money,
    pub equity_curve: Vec<EquityPoint>,
    pub strategy_breakdown: Vec<StrategyStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// 1-based position in insertion order
    pub sequence: usize,
    pub date: NaiveDate,
    pub pair: String,
    pub pnl: Money,
    pub cumulative_pnl: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyStats {
    pub strategy: Strategy,
    pub trades: usize,
    pub total_pnl: Money,
    pub win_rate: Rate,
    pub average_r_multiple: Multiple,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Sum of pnl_currency. Saturates at the decimal bounds instead of
/// panicking, so aggregates stay total over any set of valid records.
pub fn total_pnl(records: &[TradeRecord]) -> Money {
    records
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.pnl_currency()))
}

/// Winning share in percent. A trade at exactly zero PnL is not a win.
pub fn win_rate(records: &[TradeRecord]) -> Rate {
    let winners = records.iter().filter(|r| r.is_winner()).count();
    percent_of(winners, records.len())
}

/// Arithmetic mean of r_multiple, or 0 when there are no records.
pub fn average_r_multiple(records: &[TradeRecord]) -> Multiple {
    let sum = records
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.r_multiple()));
    mean(sum, records.len())
}

/// Running sum of pnl_currency in insertion order (the equity curve).
/// The last point always equals `total_pnl`.
pub fn cumulative_equity(records: &[TradeRecord]) -> Vec<Money> {
    records
        .iter()
        .scan(Decimal::ZERO, |running, r| {
            *running = running.saturating_add(r.pnl_currency());
            Some(*running)
        })
        .collect()
}

pub fn record_count(records: &[TradeRecord]) -> usize {
    records.len()
}

/// Largest peak-to-trough decline in the equity curve. The peak starts at
/// zero, so an opening loss counts as drawdown.
pub fn max_drawdown(records: &[TradeRecord]) -> Money {
    let mut peak = Decimal::ZERO;
    let mut max_dd = Decimal::ZERO;
    for equity in cumulative_equity(records) {
        if equity > peak {
            peak = equity;
        }
        let drawdown = peak.saturating_sub(equity);
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }
    max_dd
}

/// Per-strategy statistics, in order of each strategy's first appearance.
pub fn strategy_breakdown(records: &[TradeRecord]) -> Vec<StrategyStats> {
    #[derive(Default)]
    struct Tally {
        trades: usize,
        winners: usize,
        pnl: Money,
        r_sum: Multiple,
    }

    let mut tallies: Vec<(&Strategy, Tally)> = Vec::new();
    for r in records {
        let idx = match tallies.iter().position(|(s, _)| *s == r.strategy()) {
            Some(i) => i,
            None => {
                tallies.push((r.strategy(), Tally::default()));
                tallies.len() - 1
            }
        };
        let tally = &mut tallies[idx].1;
        tally.trades += 1;
        tally.winners += usize::from(r.is_winner());
        tally.pnl = tally.pnl.saturating_add(r.pnl_currency());
        tally.r_sum = tally.r_sum.saturating_add(r.r_multiple());
    }

    tallies
        .into_iter()
        .map(|(strategy, t)| StrategyStats {
            strategy: strategy.clone(),
            trades: t.trades,
            total_pnl: t.pnl,
            win_rate: percent_of(t.winners, t.trades),
            average_r_multiple: mean(t.r_sum, t.trades),
        })
        .collect()
}

fn percent_of(part: usize, whole: usize) -> Rate {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) / Decimal::from(whole) * dec!(100)
}

fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum / Decimal::from(count)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Recompute every dashboard metric from the full record set.
pub fn summarize(
    portfolio: &Portfolio,
    settings: &JournalSettings,
) -> ComputationOutput<PortfolioSummary> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let records = portfolio.records();

    if records.is_empty() {
        warnings.push("Journal is empty; all metrics default to zero".into());
    }
    let undefined_risk = records.iter().filter(|r| !r.has_defined_risk()).count();
    if undefined_risk > 0 {
        warnings.push(format!(
            "{} trade(s) without a valid stop loss; their R-multiple is counted as 0",
            undefined_risk
        ));
    }

    let equity = cumulative_equity(records);
    let equity_curve = records
        .iter()
        .zip(equity.iter())
        .enumerate()
        .map(|(i, (r, cumulative))| EquityPoint {
            sequence: i + 1,
            date: r.date(),
            pair: r.pair().to_string(),
            pnl: r.pnl_currency(),
            cumulative_pnl: *cumulative,
        })
        .collect();

    let winning_trades = records.iter().filter(|r| r.is_winner()).count();
    let losing_trades = records
        .iter()
        .filter(|r| r.pnl_currency() < Decimal::ZERO)
        .count();

    let summary = PortfolioSummary {
        record_count: record_count(records),
        total_pnl: total_pnl(records),
        win_rate: win_rate(records),
        average_r_multiple: average_r_multiple(records),
        winning_trades,
        losing_trades,
        breakeven_trades: records.len() - winning_trades - losing_trades,
        max_drawdown: max_drawdown(records),
        equity_curve,
        strategy_breakdown: strategy_breakdown(records),
    };

    trace!(
        records = summary.record_count,
        total_pnl = %summary.total_pnl,
        "recomputed portfolio summary"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "currency": settings.currency.symbol(),
        "win": "pnl_currency > 0 (breakeven is not a win)",
        "win_rate": "percent of all trades",
        "empty_average_r_multiple": "0",
        "equity_curve": "running sum of pnl_currency in insertion order",
        "drawdown": "peak-to-trough on cumulative PnL, peak starting at 0",
    });

    with_metadata(
        "Trade Journal Portfolio Summary",
        &assumptions,
        warnings,
        elapsed,
        summary,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
