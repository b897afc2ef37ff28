//! Helpers for extracting typed tuning values from a `serde_json::Value` object.
//!
//! A missing key or a value of the wrong type yields the default. These never
//! fail; range checking happens later in [`FieldConfig::validate`](crate::config::FieldConfig::validate).

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, accepting integers as well as floats.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`.
///
/// Only non-negative integers are accepted; floats and negatives fall back.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `String` from `params[name]`.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}
