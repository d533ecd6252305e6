use serde_json::Value;
use std::error::Error;
use std::io;
use trade_journal_core::{RawTrade, TradeRow};

use crate::input;

/// Load raw trades from `--input` or piped stdin.
///
/// Accepts a JSON array of trades, a single trade object, or an object with
/// a `trades` array.
pub fn load_trades(path: Option<&str>) -> Result<Vec<RawTrade>, Box<dyn Error>> {
    let value: Value = match path {
        Some(p) => input::file::read_json(p)?,
        None => input::stdin::read_stdin()?
            .ok_or("--input <trades.json> or stdin required")?,
    };
    trades_from_value(value)
}

/// Load exactly one raw trade.
pub fn load_trade(path: Option<&str>) -> Result<RawTrade, Box<dyn Error>> {
    let mut trades = load_trades(path)?;
    match trades.len() {
        1 => Ok(trades.remove(0)),
        n => Err(format!("expected exactly one trade, found {}", n).into()),
    }
}

pub fn trades_from_value(value: Value) -> Result<Vec<RawTrade>, Box<dyn Error>> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) if map.contains_key("trades") => {
            let trades = map.remove("trades").unwrap_or_default();
            Ok(serde_json::from_value(trades)?)
        }
        Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        _ => Err("expected a trade object or an array of trades".into()),
    }
}

/// Read journal rows previously written by `tj export`.
pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<TradeRow>, csv::Error> {
    csv::Reader::from_reader(reader).deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn trade_json(pair: &str) -> Value {
        json!({
            "date": "2025-06-15",
            "pair": pair,
            "direction": "LONG",
            "strategy": "Breakout",
            "entry_price": 100,
            "stop_loss": 90,
            "take_profit": 120,
            "exit_price": 110,
            "size": 2,
            "fees": 1,
            "rating": 4
        })
    }

    #[test]
    fn test_accepts_array_object_and_wrapper() {
        let arr = trades_from_value(json!([trade_json("a"), trade_json("b")])).unwrap();
        assert_eq!(arr.len(), 2);

        let single = trades_from_value(trade_json("c")).unwrap();
        assert_eq!(single[0].pair, "c");

        let wrapped = trades_from_value(json!({ "trades": [trade_json("d")] })).unwrap();
        assert_eq!(wrapped[0].pair, "d");
    }

    #[test]
    fn test_rejects_scalar() {
        assert!(trades_from_value(json!(42)).is_err());
    }

    #[test]
    fn test_missing_field_is_error() {
        let mut broken = trade_json("x");
        broken.as_object_mut().unwrap().remove("exit_price");
        assert!(trades_from_value(broken).is_err());
    }
}
