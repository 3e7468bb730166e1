//! Parameter extraction helpers for gateway operations.
//!
//! A missing required parameter is returned as a ready-to-emit
//! `{"error": "<param> is required"}` envelope, not an error. Numeric
//! parameters are extracted leniently (number or numeric string) and fall
//! back to their default on anything unparseable.

use serde_json::Value;

use rxfinder_core::tools::error_envelope;

/// Extract a required, trimmed, non-empty string parameter.
///
/// `Err` carries the failure envelope for the caller to return as-is.
pub fn require_string(args: &Value, param: &str) -> Result<String, Value> {
    match args.get(param).and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_owned()),
        _ => Err(error_envelope(format!("{param} is required"))),
    }
}

/// Extract an optional trimmed string parameter (empty → `None`).
pub fn optional_string(args: &Value, param: &str) -> Option<String> {
    args.get(param)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Extract an optional boolean parameter with a default.
pub fn bool_or(args: &Value, param: &str, default: bool) -> bool {
    args.get(param).and_then(Value::as_bool).unwrap_or(default)
}

/// Extract an integer leniently: JSON number or numeric string, anything
/// else → `default`.
pub fn int_or(args: &Value, param: &str, default: i64) -> i64 {
    match args.get(param) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// Extract an integer leniently and clamp it to `[lo, hi]`.
pub fn clip_limit(args: &Value, param: &str, lo: i64, hi: i64, default: i64) -> i64 {
    int_or(args, param, default).clamp(lo, hi)
}

/// Coerce a JSON value to an integer where possible (RxNav returns
/// numeric fields as strings in places); otherwise `null`.
pub fn lenient_int(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Number(n)) => n.as_i64().map_or(Value::Null, Value::from),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_or(Value::Null, Value::from),
        _ => Value::Null,
    }
}
