//! Shared helpers for reading tool arguments and provider records. The
//! provider's schema varies by import source, so amounts may arrive as
//! numbers or numeric strings and missing fields are treated as empty.

use serde_json::{Map, Value};

use crate::dispatch::ToolError;

/// Transaction amount as a float; tolerates string-encoded numbers.
pub(crate) fn amount_of(txn: &Value) -> f64 {
    match txn.get("amount") {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub(crate) fn str_field<'a>(txn: &'a Value, key: &str) -> Option<&'a str> {
    txn.get(key).and_then(Value::as_str)
}

pub(crate) fn require_str(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ToolError::InvalidArguments(format!("{key} is required")))
}

/// Integer argument; tolerates numeric strings the way the original
/// implementations coerced with `int(...)`.
pub(crate) fn require_i64(args: &Map<String, Value>, key: &str) -> Result<i64, ToolError> {
    match args.get(key) {
        Some(Value::Number(number)) => number
            .as_i64()
            .ok_or_else(|| ToolError::InvalidArguments(format!("{key} must be an integer"))),
        Some(Value::String(text)) => text
            .trim()
            .parse()
            .map_err(|_| ToolError::InvalidArguments(format!("{key} must be an integer"))),
        _ => Err(ToolError::InvalidArguments(format!("{key} is required"))),
    }
}

pub(crate) fn opt_i64(args: &Map<String, Value>, key: &str) -> Option<i64> {
    args.get(key).and_then(Value::as_i64)
}

pub(crate) fn opt_u32(args: &Map<String, Value>, key: &str, default: u32) -> u32 {
    args.get(key)
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(default)
}

pub(crate) fn opt_bool(args: &Map<String, Value>, key: &str, default: bool) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amount_of_reads_numbers_and_strings() {
        assert_eq!(amount_of(&json!({"amount": -42.5})), -42.5);
        assert_eq!(amount_of(&json!({"amount": "-42.50"})), -42.5);
        assert_eq!(amount_of(&json!({"amount": null})), 0.0);
        assert_eq!(amount_of(&json!({})), 0.0);
        assert_eq!(amount_of(&json!({"amount": "not a number"})), 0.0);
    }

    #[test]
    fn require_i64_coerces_numeric_strings() {
        let args = json!({"id": "42", "other": 7, "bad": "x"});
        let args = args.as_object().unwrap();
        assert_eq!(require_i64(args, "id").unwrap(), 42);
        assert_eq!(require_i64(args, "other").unwrap(), 7);
        assert!(require_i64(args, "bad").is_err());
        assert!(require_i64(args, "missing").is_err());
    }

    #[test]
    fn require_str_reports_missing_key() {
        let args = json!({"start_date": "2025-01-01"});
        let args = args.as_object().unwrap();
        assert_eq!(require_str(args, "start_date").unwrap(), "2025-01-01");
        let error = require_str(args, "end_date").unwrap_err();
        assert_eq!(error.to_string(), "Invalid arguments: end_date is required");
    }
}
