//! HTTP handlers: pull parameters by fixed key names, call one delegate, answer JSON.

pub mod expert;
pub mod integration;
pub mod transaction;

use crate::case::object_keys_to_snake_case;
use crate::error::AppError;
use crate::model::Record;
use crate::utils::is_null_or_empty;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Body and query keys.
pub mod keys {
    pub const EXPERT: &str = "expert";
    pub const INTEGRATION_MEMBER: &str = "integration_member";
    pub const FLAG: &str = "flag";
    pub const ROLE: &str = "role";
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: u64,
}

/// Request body as a record with snake_case keys.
pub(crate) fn body_record(body: Value) -> Result<Record, AppError> {
    match body {
        Value::Object(mut m) => {
            object_keys_to_snake_case(&mut m);
            Ok(m)
        }
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// The object under `key` in the body, e.g. `{"expert": {...}}`.
pub(crate) fn nested_record(body: Value, key: &str) -> Result<Record, AppError> {
    let mut outer = body_record(body)?;
    let inner = outer.remove(key).unwrap_or(Value::Null);
    if is_null_or_empty(&inner) || inner.as_object().is_some_and(|m| m.is_empty()) {
        return Err(AppError::BadRequest(format!("body must carry a non-empty '{}' object", key)));
    }
    body_record(inner)
}

pub(crate) fn entity_from<T: DeserializeOwned>(record: Record) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(record)).map_err(|e| AppError::BadRequest(e.to_string()))
}
