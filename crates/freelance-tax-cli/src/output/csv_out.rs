use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
///
/// A result holding a list of rows (the advance-tax `payments`, for
/// instance) is written as that table; anything else becomes field/value
/// pairs with nested objects flattened to dotted keys.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let result = map.get("result").unwrap_or(value);
            match result {
                Value::Object(res) => match rows_of(res) {
                    Some(rows) => write_array_csv(&mut wtr, rows),
                    None => write_pairs(&mut wtr, res),
                },
                Value::Array(arr) => write_array_csv(&mut wtr, arr),
                other => {
                    let _ = wtr.write_record([&format_csv_value(other)]);
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

/// The `payments` schedule is the natural table for advance-tax output.
fn rows_of(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    match map.get("payments") {
        Some(Value::Array(rows)) => Some(rows),
        _ => None,
    }
}

fn write_pairs(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    let mut pairs = Vec::new();
    flatten("", map, &mut pairs);
    for (key, val) in pairs {
        let _ = wtr.write_record([key.as_str(), val.as_str()]);
    }
}

fn flatten(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten(&name, inner, out),
            other => out.push((name, format_csv_value(other))),
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr
            .iter()
            .map(format_csv_value)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
