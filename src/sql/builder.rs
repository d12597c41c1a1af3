//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from a table definition.

use crate::dao::Criteria;
use crate::error::AppError;
use crate::model::{Id, Record, TableDef};
use serde_json::Value;

/// Quote identifier for MySQL (safe: only from table definitions).
fn quoted(s: &str) -> String {
    format!("`{}`", s.replace('`', "``"))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }
}

/// Column list for SELECT/RETURNING: requested fields (validated) or every column.
fn select_column_list(table: &TableDef, fields: Option<&[String]>) -> Result<String, AppError> {
    match fields {
        Some(fields) if !fields.is_empty() => {
            table.check_fields(fields)?;
            Ok(fields.iter().map(|f| quoted(f)).collect::<Vec<_>>().join(", "))
        }
        _ => Ok(table.column_names().map(quoted).collect::<Vec<_>>().join(", ")),
    }
}

/// WHERE clause (with leading space) for criteria; params are appended to `q` in criteria order.
fn where_clause(table: &TableDef, criteria: &Criteria, q: &mut QueryBuf) -> String {
    let mut parts = Vec::new();
    for (col, val) in criteria.iter() {
        let col_q = quoted(col);
        match val {
            Value::Null => parts.push(format!("{} IS NULL", col_q)),
            Value::Array(items) if items.is_empty() => parts.push("1 = 0".to_string()),
            Value::Array(items) => {
                let placeholders = vec!["?"; items.len()].join(", ");
                q.params.extend(items.iter().cloned());
                parts.push(format!("{} IN ({})", col_q, placeholders));
            }
            other => {
                q.params.push(other.clone());
                parts.push(format!("{} = ?", col_q));
            }
        }
    }
    debug_assert!(criteria.iter().all(|(c, _)| table.has_column(c)));
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// SELECT by primary key.
pub fn select_by_id(table: &TableDef, id: Id, fields: Option<&[String]>) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let cols = select_column_list(table, fields)?;
    q.params.push(Value::Number(id.into()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        cols,
        quoted(table.name),
        quoted(table.id_column)
    );
    Ok(q)
}

/// SELECT with equality criteria, ORDER BY id. Empty criteria selects the whole table.
pub fn select_where(table: &TableDef, criteria: &Criteria, fields: Option<&[String]>) -> Result<QueryBuf, AppError> {
    criteria.check(table, true)?;
    let mut q = QueryBuf::new();
    let cols = select_column_list(table, fields)?;
    let where_sql = where_clause(table, criteria, &mut q);
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        cols,
        quoted(table.name),
        where_sql,
        quoted(table.id_column)
    );
    Ok(q)
}

/// INSERT the insertable subset of `record`; omitted columns take their DB default.
pub fn insert(table: &TableDef, record: &Record) -> Result<QueryBuf, AppError> {
    let values = table.insertable(record);
    if values.is_empty() {
        return Err(AppError::BadRequest(format!("nothing to insert into {}", table.name)));
    }
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(values.len());
    for (k, v) in values {
        cols.push(quoted(&k));
        q.params.push(v);
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(table.name),
        cols.join(", "),
        vec!["?"; cols.len()].join(", ")
    );
    Ok(q)
}

/// UPDATE ... SET for the updatable subset of `values`. Criteria must be non-empty.
pub fn update_where(table: &TableDef, criteria: &Criteria, values: &Record) -> Result<QueryBuf, AppError> {
    criteria.check(table, false)?;
    let values = table.updatable(values);
    if values.is_empty() {
        return Err(AppError::BadRequest(format!("no updatable columns for {}", table.name)));
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(values.len());
    for (k, v) in values {
        sets.push(format!("{} = ?", quoted(&k)));
        q.params.push(v);
    }
    let where_sql = where_clause(table, criteria, &mut q);
    q.sql = format!("UPDATE {} SET {}{}", quoted(table.name), sets.join(", "), where_sql);
    Ok(q)
}

/// DELETE with criteria. Criteria must be non-empty.
pub fn delete_where(table: &TableDef, criteria: &Criteria) -> Result<QueryBuf, AppError> {
    criteria.check(table, false)?;
    let mut q = QueryBuf::new();
    let where_sql = where_clause(table, criteria, &mut q);
    q.sql = format!("DELETE FROM {}{}", quoted(table.name), where_sql);
    Ok(q)
}
