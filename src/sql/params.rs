//! Bind serde_json values to MySQL statements.

use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;

pub type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// A value that can be bound to a MySQL statement. Converts from serde_json::Value.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    Json(Value),
}

impl BindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::I64(i)
                } else if let Some(u) = n.as_u64() {
                    BindValue::U64(u)
                } else {
                    BindValue::F64(n.as_f64().unwrap_or_default())
                }
            }
            Value::String(s) => BindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => BindValue::Json(v.clone()),
        }
    }

    pub fn bind<'q>(self, query: MySqlQuery<'q>) -> MySqlQuery<'q> {
        match self {
            BindValue::Null => query.bind(None::<String>),
            BindValue::Bool(b) => query.bind(b),
            BindValue::I64(n) => query.bind(n),
            BindValue::U64(n) => query.bind(n),
            BindValue::F64(n) => query.bind(n),
            BindValue::String(s) => query.bind(s),
            BindValue::Json(v) => query.bind(sqlx::types::Json(v)),
        }
    }
}

/// Bind every param in order.
pub fn bind_all<'q>(mut query: MySqlQuery<'q>, params: &[Value]) -> MySqlQuery<'q> {
    for p in params {
        query = BindValue::from_json(p).bind(query);
    }
    query
}
