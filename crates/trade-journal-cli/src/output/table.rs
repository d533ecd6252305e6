use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::highlight;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    print!("{}", render_table(value));
}

pub fn render_table(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => render_envelope(result, map),
            None => render_fields(map),
        },
        Value::Array(arr) => render_rows(arr),
        _ => format!("{}\n", value),
    }
}

fn render_envelope(result: &Value, envelope: &Map<String, Value>) -> String {
    let mut out = String::new();

    if let Some(Value::String(dashboard)) = envelope.get("dashboard") {
        out.push_str(dashboard);
        out.push_str("\n\n");
    }

    match result {
        Value::Object(res_map) => {
            out.push_str(&render_fields(res_map));
            // Nested row collections (equity curve, strategy breakdown)
            for (key, val) in res_map {
                if let Value::Array(rows) = val {
                    if rows.iter().all(Value::is_object) && !rows.is_empty() {
                        out.push_str(&format!("\n{}:\n", key));
                        out.push_str(&render_rows(rows));
                    }
                }
            }
        }
        other => out.push_str(&render_table(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for w in warnings {
                if let Value::String(s) = w {
                    out.push_str(&format!("  - {}\n", s));
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        out.push_str(&format!("\nMethodology: {}\n", meth));
    }
    out
}

/// Two-column Field/Value table of the scalar entries in `map`.
fn render_fields(map: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if matches!(val, Value::Array(rows) if rows.iter().any(Value::is_object)) {
            continue;
        }
        let text = format_value(val);
        builder.push_record([key.clone(), highlight::paint_cell(key, &text)]);
    }
    format!("{}\n", Table::from(builder))
}

fn render_rows(arr: &[Value]) -> String {
    if arr.is_empty() {
        return "(empty)\n".to_string();
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        let text = map.get(h.as_str()).map(format_value).unwrap_or_default();
                        highlight::paint_cell(h, &text)
                    })
                    .collect();
                builder.push_record(row);
            }
        }
        format!("{}\n", Table::from(builder))
    } else {
        arr.iter().map(|v| format!("{}\n", format_value(v))).collect()
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
