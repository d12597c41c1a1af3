//! Stateless helpers shared by delegates and handlers.

use rand::Rng;
use serde_json::{Map, Value};

pub const ALPHANUMERIC: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Random string of `length` characters drawn uniformly from `charset` (alphanumeric when `None`).
pub fn random_string(length: usize, charset: Option<&str>) -> String {
    let chars: Vec<char> = charset.unwrap_or(ALPHANUMERIC).chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let mut rng = rand::rng();
    (0..length).map(|_| chars[rng.random_range(0..chars.len())]).collect()
}

/// True for null, and for values whose textual form is blank.
pub fn is_null_or_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        other => other.to_string().trim().is_empty(),
    }
}

/// Copy from `source` only the keys `target` already has.
pub fn copy_properties(source: &Map<String, Value>, target: &mut Map<String, Value>) {
    for (k, v) in source {
        if let Some(slot) = target.get_mut(k) {
            *slot = v.clone();
        } else {
            tracing::debug!(property = %k, "cannot set undefined property");
        }
    }
}
