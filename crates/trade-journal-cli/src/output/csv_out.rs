use serde_json::Value;
use std::io;
use trade_journal_core::journal::projection::COLUMNS;
use trade_journal_core::TradeRow;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    if let Err(e) = write_csv(io::stdout().lock(), value) {
        eprintln!("failed to write CSV output: {}", e);
    }
}

/// Render a command result as CSV. Objects become `field,value` pairs of
/// their scalar `result` entries; arrays of objects become one row each.
pub fn write_csv<W: io::Write>(writer: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    match value {
        Value::Object(map) => {
            wtr.write_record(["field", "value"])?;
            match map.get("result") {
                Some(Value::Object(result)) => {
                    for (key, val) in result {
                        if val.is_array() {
                            continue;
                        }
                        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
                    }
                }
                _ => {
                    for (key, val) in map {
                        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
                    }
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr)?,
        _ => wtr.write_record([&format_csv_value(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

/// Write journal rows with the fixed column header, even when there are no
/// rows.
pub fn write_rows<W: io::Write>(writer: W, rows: &[TradeRow]) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(first) = arr.first() else {
        return Ok(());
    };

    if let Value::Object(first) = first {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        wtr.write_record(&headers)?;

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                wtr.write_record(&row)?;
            }
        }
    } else {
        for item in arr {
            wtr.write_record([&format_csv_value(item)])?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::trades::read_rows;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use trade_journal_core::{project, restore, Portfolio, RawTrade, StrategyCatalog};

    fn portfolio() -> Portfolio {
        let mut p = Portfolio::new();
        let base = RawTrade {
            date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            pair: "btc/usdt".into(),
            direction: "LONG".into(),
            strategy: "Trend Follow".into(),
            entry_price: dec!(100),
            stop_loss: dec!(90),
            take_profit: dec!(120),
            exit_price: dec!(110),
            size: dec!(2),
            fees: dec!(1),
            rating: 4,
        };
        p.submit(&base).unwrap();
        p.submit(&RawTrade {
            pair: "eth/usdt".into(),
            direction: "SHORT".into(),
            entry_price: dec!(50.125),
            stop_loss: dec!(55),
            exit_price: dec!(45.5),
            size: dec!(10),
            fees: dec!(2),
            ..base
        })
        .unwrap();
        p
    }

    #[test]
    fn test_csv_round_trip_preserves_rows_and_order() {
        let original = portfolio();
        let rows = project(original.records());

        let mut buf: Vec<u8> = Vec::new();
        write_rows(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("Date,Pair,Direction,Strategy,Entry Price"));

        let back = read_rows(buf.as_slice()).unwrap();
        assert_eq!(back, rows);
        let restored = restore(&back, &StrategyCatalog::default()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_result_object_becomes_field_value_pairs() {
        let value = serde_json::json!({
            "result": { "total_pnl": "67", "record_count": 2, "equity_curve": [] },
            "warnings": []
        });
        let mut buf: Vec<u8> = Vec::new();
        write_csv(&mut buf, &value).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "field,value\ntotal_pnl,67\nrecord_count,2\n"
        );
    }

    struct BrokenPipe;

    impl io::Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_write_errors_are_reported() {
        let value = serde_json::json!([{ "Pair": "BTC/USDT" }]);
        let err = write_csv(BrokenPipe, &value).unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let mut buf: Vec<u8> = Vec::new();
        write_rows(&mut buf, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.trim_end().ends_with("R-Multiple"));
    }
}
