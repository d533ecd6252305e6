use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::journal::portfolio::Portfolio;
use crate::journal::record::{normalize_with_catalog, RawTrade, TradeRecord};
use crate::journal::strategy::StrategyCatalog;
use crate::types::*;
use crate::{JournalError, JournalResult};

/// Column headers of the flat journal view, in row order.
pub const COLUMNS: [&str; 14] = [
    "Date",
    "Pair",
    "Direction",
    "Strategy",
    "Entry Price",
    "Stop Loss",
    "Take Profit",
    "Exit Price",
    "Size (Units)",
    "Fees ($)",
    "Rating",
    "PnL ($)",
    "PnL (%)",
    "R-Multiple",
];

/// One trade flattened for table and export collaborators.
///
/// Decimal columns serialize as strings so no precision is lost through
/// formats that would otherwise parse them as floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Pair")]
    pub pair: String,
    #[serde(rename = "Direction")]
    pub direction: String,
    #[serde(rename = "Strategy")]
    pub strategy: String,
    #[serde(rename = "Entry Price", with = "rust_decimal::serde::str")]
    pub entry_price: Money,
    #[serde(rename = "Stop Loss", with = "rust_decimal::serde::str")]
    pub stop_loss: Money,
    #[serde(rename = "Take Profit", with = "rust_decimal::serde::str")]
    pub take_profit: Money,
    #[serde(rename = "Exit Price", with = "rust_decimal::serde::str")]
    pub exit_price: Money,
    #[serde(rename = "Size (Units)", with = "rust_decimal::serde::str")]
    pub size: Decimal,
    #[serde(rename = "Fees ($)", with = "rust_decimal::serde::str")]
    pub fees: Money,
    #[serde(rename = "Rating")]
    pub rating: u8,
    #[serde(rename = "PnL ($)", with = "rust_decimal::serde::str")]
    pub pnl_currency: Money,
    #[serde(rename = "PnL (%)", with = "rust_decimal::serde::str")]
    pub pnl_percent: Rate,
    #[serde(rename = "R-Multiple", with = "rust_decimal::serde::str")]
    pub r_multiple: Multiple,
}

impl From<&TradeRecord> for TradeRow {
    fn from(r: &TradeRecord) -> Self {
        TradeRow {
            date: r.date(),
            pair: r.pair().to_string(),
            direction: r.direction().as_str().to_string(),
            strategy: r.strategy().label().to_string(),
            entry_price: r.entry_price(),
            stop_loss: r.stop_loss(),
            take_profit: r.take_profit(),
            exit_price: r.exit_price(),
            size: r.size(),
            fees: r.fees(),
            rating: r.rating(),
            pnl_currency: r.pnl_currency(),
            pnl_percent: r.pnl_percent(),
            r_multiple: r.r_multiple(),
        }
    }
}

impl TradeRow {
    /// The raw input fields of this row, ignoring the derived columns.
    pub fn to_raw(&self) -> RawTrade {
        RawTrade {
            date: self.date,
            pair: self.pair.clone(),
            direction: self.direction.clone(),
            strategy: self.strategy.clone(),
            entry_price: self.entry_price,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            exit_price: self.exit_price,
            size: self.size,
            fees: self.fees,
            rating: i64::from(self.rating),
        }
    }

    /// Rebuild the record by re-running normalization on the raw columns,
    /// then check the stored derived columns against the recomputed ones.
    pub fn to_record(&self, row: usize, catalog: &StrategyCatalog) -> JournalResult<TradeRecord> {
        let record = normalize_with_catalog(&self.to_raw(), catalog).map_err(|e| {
            JournalError::Rejected {
                index: row,
                source: Box::new(e),
            }
        })?;
        for (field, stored, derived) in [
            ("PnL ($)", self.pnl_currency, record.pnl_currency()),
            ("PnL (%)", self.pnl_percent, record.pnl_percent()),
            ("R-Multiple", self.r_multiple, record.r_multiple()),
        ] {
            if stored != derived {
                return Err(JournalError::RowMismatch {
                    row,
                    field: field.into(),
                    stored,
                    derived,
                });
            }
        }
        Ok(record)
    }
}

/// Flat, order-preserving view of every record.
pub fn project(records: &[TradeRecord]) -> Vec<TradeRow> {
    records.iter().map(TradeRow::from).collect()
}

/// Read a projection back into a fresh portfolio. Fails on the first row
/// that does not validate or whose derived columns disagree with its raw
/// columns; nothing is returned in that case.
pub fn restore(rows: &[TradeRow], catalog: &StrategyCatalog) -> JournalResult<Portfolio> {
    let mut portfolio = Portfolio::new();
    for (i, row) in rows.iter().enumerate() {
        portfolio.append(row.to_record(i, catalog)?);
    }
    Ok(portfolio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::record::normalize;
    use crate::ErrorKind;
    use rust_decimal_macros::dec;

    fn records() -> Vec<TradeRecord> {
        let base = RawTrade {
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            pair: "btc/usdt".into(),
            direction: "LONG".into(),
            strategy: "trend follow".into(),
            entry_price: dec!(100),
            stop_loss: dec!(90),
            take_profit: dec!(120),
            exit_price: dec!(110),
            size: dec!(2),
            fees: dec!(1),
            rating: 4,
        };
        let second = RawTrade {
            date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            pair: "eth/usdt".into(),
            direction: "SHORT".into(),
            strategy: "Scalp".into(),
            entry_price: dec!(50),
            stop_loss: dec!(55),
            exit_price: dec!(45),
            size: dec!(10),
            fees: dec!(2),
            rating: 2,
            ..base.clone()
        };
        vec![normalize(&base).unwrap(), normalize(&second).unwrap()]
    }

    #[test]
    fn test_project_is_complete_and_ordered() {
        let rows = project(&records());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pair, "BTC/USDT");
        assert_eq!(rows[0].strategy, "Trend Follow");
        assert_eq!(rows[0].pnl_currency, dec!(19));
        assert_eq!(rows[1].direction, "SHORT");
        assert_eq!(rows[1].r_multiple, dec!(0.96));
    }

    #[test]
    fn test_serialized_headers_match_columns() {
        let rows = project(&records());
        let value = serde_json::to_value(&rows[0]).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), COLUMNS.len());
        for col in COLUMNS {
            assert!(obj.contains_key(col), "missing column {}", col);
        }
        assert_eq!(obj["PnL ($)"], serde_json::json!("19"));
    }

    #[test]
    fn test_restore_round_trip() {
        let original = records();
        let rows = project(&original);
        let json = serde_json::to_string(&rows).unwrap();
        let back: Vec<TradeRow> = serde_json::from_str(&json).unwrap();
        let portfolio = restore(&back, &StrategyCatalog::default()).unwrap();
        assert_eq!(portfolio.records(), original.as_slice());
    }

    #[test]
    fn test_restore_rejects_tampered_pnl() {
        let mut rows = project(&records());
        rows[1].pnl_currency = dec!(99);
        let err = restore(&rows, &StrategyCatalog::default()).unwrap_err();
        match err {
            JournalError::RowMismatch { row, field, .. } => {
                assert_eq!(row, 1);
                assert_eq!(field, "PnL ($)");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_restore_rejects_invalid_raw_column() {
        let mut rows = project(&records());
        rows[0].rating = 9;
        let err = restore(&rows, &StrategyCatalog::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.field(), Some("rating"));
    }
}
