use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::journal::strategy::{Strategy, StrategyCatalog};
use crate::types::*;
use crate::{JournalError, JournalResult};

/// Decimal places kept on pnl_currency, pnl_percent and r_multiple.
pub const DERIVED_DP: u32 = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            _ => Err(JournalError::Domain {
                field: "direction".into(),
                value: s.to_string(),
                allowed: "LONG, SHORT".into(),
            }),
        }
    }
}

/// Trade fields as gathered by an input form, before validation.
///
/// Enumerated fields are kept as strings so that an out-of-set value is
/// reported as a domain error naming the field rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrade {
    pub date: NaiveDate,
    /// Instrument, e.g. "btc/usdt"; stored upper-cased
    pub pair: String,
    /// "LONG" or "SHORT"
    pub direction: String,
    pub strategy: String,
    pub entry_price: Money,
    pub stop_loss: Money,
    pub take_profit: Money,
    pub exit_price: Money,
    /// Units held
    pub size: Decimal,
    pub fees: Money,
    /// Execution quality, 1-5
    pub rating: i64,
}

/// One closed, validated trade.
///
/// Fields are private: the derived values can only come out of
/// [`normalize`], so they always agree with the raw fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeRecord {
    date: NaiveDate,
    pair: String,
    direction: Direction,
    strategy: Strategy,
    entry_price: Money,
    stop_loss: Money,
    take_profit: Money,
    exit_price: Money,
    size: Decimal,
    fees: Money,
    rating: u8,
    pnl_currency: Money,
    pnl_percent: Rate,
    r_multiple: Multiple,
}

impl TradeRecord {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn entry_price(&self) -> Money {
        self.entry_price
    }

    pub fn stop_loss(&self) -> Money {
        self.stop_loss
    }

    pub fn take_profit(&self) -> Money {
        self.take_profit
    }

    pub fn exit_price(&self) -> Money {
        self.exit_price
    }

    pub fn size(&self) -> Decimal {
        self.size
    }

    pub fn fees(&self) -> Money {
        self.fees
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn pnl_currency(&self) -> Money {
        self.pnl_currency
    }

    pub fn pnl_percent(&self) -> Rate {
        self.pnl_percent
    }

    pub fn r_multiple(&self) -> Multiple {
        self.r_multiple
    }

    /// Signed distance from entry to stop, positive when the stop sits on
    /// the losing side of the entry.
    pub fn risk_per_unit(&self) -> Money {
        risk_per_unit(self.direction, self.entry_price, self.stop_loss)
    }

    /// False when the stop is missing, misplaced, or the size is zero; the
    /// r_multiple of such a trade is 0 by convention.
    pub fn has_defined_risk(&self) -> bool {
        self.risk_per_unit() > Decimal::ZERO && self.size > Decimal::ZERO
    }

    pub fn is_winner(&self) -> bool {
        self.pnl_currency > Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate a raw trade against the built-in strategy catalog and derive
/// its PnL fields.
pub fn normalize(raw: &RawTrade) -> JournalResult<TradeRecord> {
    normalize_with_catalog(raw, &StrategyCatalog::default())
}

/// Validate a raw trade and derive its PnL fields.
///
/// Pure: identical inputs always produce identical records.
pub fn normalize_with_catalog(
    raw: &RawTrade,
    catalog: &StrategyCatalog,
) -> JournalResult<TradeRecord> {
    // -- Validation ----------------------------------------------------------
    for (field, value) in [
        ("entry_price", raw.entry_price),
        ("stop_loss", raw.stop_loss),
        ("take_profit", raw.take_profit),
        ("exit_price", raw.exit_price),
        ("size", raw.size),
        ("fees", raw.fees),
    ] {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(JournalError::negative(field, value));
        }
    }
    let rating = validate_rating(raw.rating)?;
    let direction: Direction = raw.direction.parse()?;
    let strategy = catalog.parse(&raw.strategy)?;
    let pair = normalize_pair(&raw.pair)?;

    // -- Derivation ----------------------------------------------------------
    let derived = derive(
        direction,
        raw.entry_price,
        raw.stop_loss,
        raw.exit_price,
        raw.size,
        raw.fees,
    )?;

    debug!(
        pair = %pair,
        direction = %direction,
        pnl = %derived.pnl_currency,
        r = %derived.r_multiple,
        "normalized trade"
    );

    Ok(TradeRecord {
        date: raw.date,
        pair,
        direction,
        strategy,
        entry_price: raw.entry_price,
        stop_loss: raw.stop_loss,
        take_profit: raw.take_profit,
        exit_price: raw.exit_price,
        size: raw.size,
        fees: raw.fees,
        rating,
        pnl_currency: derived.pnl_currency,
        pnl_percent: derived.pnl_percent,
        r_multiple: derived.r_multiple,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct Derived {
    pnl_currency: Money,
    pnl_percent: Rate,
    r_multiple: Multiple,
}

// Operands are validated non-negative, so the difference stays in range.
fn risk_per_unit(direction: Direction, entry: Money, stop: Money) -> Money {
    match direction {
        Direction::Long => entry - stop,
        Direction::Short => stop - entry,
    }
}

/// PnL, PnL% of notional and R-multiple, rounded only at the end.
///
/// Every step is checked: inputs that pass validation can still push a
/// product or quotient past the 96-bit mantissa, which is reported as a
/// range error on the derived field.
fn derive(
    direction: Direction,
    entry: Money,
    stop: Money,
    exit: Money,
    size: Decimal,
    fees: Money,
) -> JournalResult<Derived> {
    let move_per_unit = match direction {
        Direction::Long => exit.checked_sub(entry),
        Direction::Short => entry.checked_sub(exit),
    }
    .ok_or_else(|| JournalError::overflow("pnl_currency", exit))?;
    let pnl = move_per_unit
        .checked_mul(size)
        .and_then(|gross| gross.checked_sub(fees))
        .ok_or_else(|| JournalError::overflow("pnl_currency", size))?;

    let notional = entry
        .checked_mul(size)
        .ok_or_else(|| JournalError::overflow("pnl_percent", size))?;
    let pnl_percent = if notional > Decimal::ZERO {
        pnl.checked_div(notional)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or_else(|| JournalError::overflow("pnl_percent", entry))?
    } else {
        Decimal::ZERO
    };

    // Non-positive risk means the stop is absent or on the wrong side: neutral R.
    let risk_unit = risk_per_unit(direction, entry, stop);
    let r_multiple = if risk_unit > Decimal::ZERO {
        let total_risk = risk_unit
            .checked_mul(size)
            .ok_or_else(|| JournalError::overflow("r_multiple", size))?;
        if total_risk.is_zero() {
            Decimal::ZERO
        } else {
            pnl.checked_div(total_risk)
                .ok_or_else(|| JournalError::overflow("r_multiple", stop))?
        }
    } else {
        Decimal::ZERO
    };

    Ok(Derived {
        pnl_currency: round_derived(pnl),
        pnl_percent: round_derived(pnl_percent),
        r_multiple: round_derived(r_multiple),
    })
}

fn round_derived(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DERIVED_DP, RoundingStrategy::MidpointNearestEven)
}

fn validate_rating(rating: i64) -> JournalResult<u8> {
    match u8::try_from(rating) {
        Ok(r @ 1..=5) => Ok(r),
        _ => Err(JournalError::Range {
            field: "rating".into(),
            value: rating.to_string(),
            reason: "must be an integer from 1 to 5".into(),
        }),
    }
}

fn normalize_pair(pair: &str) -> JournalResult<String> {
    let trimmed = pair.trim();
    if trimmed.is_empty() {
        return Err(JournalError::Domain {
            field: "pair".into(),
            value: pair.to_string(),
            allowed: "any non-empty instrument identifier".into(),
        });
    }
    Ok(trimmed.to_uppercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
