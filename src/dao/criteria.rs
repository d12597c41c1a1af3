//! Field -> value equality filters shared by the SQL and in-memory DAOs.

use crate::error::AppError;
use crate::model::{Record, SqlType, TableDef};
use serde_json::Value;

/// Ordered equality conditions joined by AND.
/// A JSON array means membership (`IN`), `null` means `IS NULL`, an empty criteria matches every row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Criteria(Vec<(String, Value)>);

impl Criteria {
    pub fn new() -> Self {
        Criteria(Vec::new())
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Query-string pairs typed by the column they name. Unknown columns are kept so `check` can reject them.
    pub fn from_query<'a, I>(table: &TableDef, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Criteria(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), query_value_for_column(table, k, v)))
                .collect(),
        )
    }

    /// Every named column must exist; `allow_empty` is false for writes so a missing filter never hits the whole table.
    pub fn check(&self, table: &TableDef, allow_empty: bool) -> Result<(), AppError> {
        if !allow_empty && self.is_empty() {
            return Err(AppError::BadRequest(format!(
                "refusing to modify every row of {}: criteria is empty",
                table.name
            )));
        }
        match self.0.iter().find(|(k, _)| !table.has_column(k)) {
            Some((bad, _)) => Err(AppError::BadRequest(format!("{} has no column '{}'", table.name, bad))),
            None => Ok(()),
        }
    }

    pub fn matches(&self, row: &Record) -> bool {
        self.0.iter().all(|(col, expected)| {
            let actual = row.get(col).unwrap_or(&Value::Null);
            match expected {
                Value::Null => actual.is_null(),
                Value::Array(options) => options.iter().any(|o| value_eq(actual, o)),
                other => value_eq(actual, other),
            }
        })
    }
}

impl From<Record> for Criteria {
    fn from(record: Record) -> Self {
        Criteria(record.into_iter().collect())
    }
}

/// SQL-style equality: numbers compare numerically, and a number matches its decimal string.
pub fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            s.trim().parse::<f64>().ok() == n.as_f64()
        }
        _ => a == b,
    }
}

fn query_value_for_column(table: &TableDef, column: &str, raw: &str) -> Value {
    let is_int = table
        .column(column)
        .map(|c| matches!(c.sql_type, SqlType::BigInt | SqlType::Int))
        .unwrap_or(false);
    if is_int {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Number(n.into());
        }
    }
    Value::String(raw.to_string())
}
