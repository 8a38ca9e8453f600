use serde_json::Value;

/// Headline fields, most specific first. Nulls are skipped.
const PRIORITY_KEYS: [&str; 7] = [
    "total_tax_liability",
    "final_tax",
    "total_gst",
    "next_due",
    "quarter",
    "financial_year",
    "recommended_scheme",
];

/// Print just the key answer value from the output.
///
/// Looks inside the `result` envelope, and inside a ledger report's
/// `summary`, then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let mut result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    if let Some(summary) = result_obj.as_object().and_then(|m| m.get("summary")) {
        result_obj = summary;
    }

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
