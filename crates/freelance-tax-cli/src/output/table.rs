use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// Scalar fields go into a Field/Value table. Arrays of objects, such as the
/// advance-tax schedule, get a table of their own underneath.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map, None);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map, None),
        other => println!("{}", format_value(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>, title: Option<&str>) {
    if let Some(title) = title {
        println!("\n{}:", title);
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested: Vec<(&str, &Value)> = Vec::new();

    for (key, val) in map {
        if is_table_like(val) {
            nested.push((key.as_str(), val));
        } else {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
    }
    println!("{}", Table::from(builder));

    for (key, val) in nested {
        match val {
            Value::Object(inner) => print_object(inner, Some(key)),
            Value::Array(arr) => {
                println!("\n{}:", key);
                print_array_table(arr);
            }
            _ => {}
        }
    }
}

/// Objects, and arrays of objects, are printed as separate tables.
fn is_table_like(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(arr) => matches!(arr.first(), Some(Value::Object(_))),
        _ => false,
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("  - {}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
