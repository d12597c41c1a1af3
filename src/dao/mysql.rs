//! DAO over a MySQL table.

use super::{Criteria, Dao};
use crate::error::AppError;
use crate::model::{Id, Record, TableDef};
use crate::sql::{bind_all, delete_where, insert, select_by_id, select_where, update_where, QueryBuf};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

#[derive(Clone)]
pub struct MySqlDao {
    pool: MySqlPool,
    table: &'static TableDef,
}

impl MySqlDao {
    pub fn new(pool: MySqlPool, table: &'static TableDef) -> Self {
        MySqlDao { pool, table }
    }

    async fn query_many(&self, q: &QueryBuf) -> Result<Vec<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query(&q.sql), &q.params).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_record).collect()
    }

    async fn query_one(&self, q: &QueryBuf) -> Result<Option<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query(&q.sql), &q.params).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_record).transpose()
    }

    async fn execute(&self, q: &QueryBuf) -> Result<sqlx::mysql::MySqlQueryResult, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        Ok(bind_all(sqlx::query(&q.sql), &q.params).execute(&self.pool).await?)
    }
}

#[async_trait]
impl Dao for MySqlDao {
    fn table(&self) -> &'static TableDef {
        self.table
    }

    async fn get(&self, id: Id, fields: Option<&[String]>) -> Result<Option<Record>, AppError> {
        let q = select_by_id(self.table, id, fields)?;
        self.query_one(&q).await
    }

    async fn search(&self, criteria: &Criteria, fields: Option<&[String]>) -> Result<Vec<Record>, AppError> {
        let q = select_where(self.table, criteria, fields)?;
        self.query_many(&q).await
    }

    async fn create(&self, record: &Record) -> Result<Record, AppError> {
        let q = insert(self.table, record)?;
        let result = self.execute(&q).await?;
        let id = match record.get(self.table.id_column).and_then(Value::as_i64) {
            Some(id) => id,
            None => i64::try_from(result.last_insert_id())
                .map_err(|_| AppError::BadRequest(format!("{} id out of range", self.table.name)))?,
        };
        self.get(id, None)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn update(&self, criteria: &Criteria, values: &Record) -> Result<u64, AppError> {
        let q = update_where(self.table, criteria, values)?;
        Ok(self.execute(&q).await?.rows_affected())
    }

    async fn delete(&self, criteria: &Criteria) -> Result<u64, AppError> {
        let q = delete_where(self.table, criteria)?;
        Ok(self.execute(&q).await?.rows_affected())
    }
}

fn row_to_record(row: &MySqlRow) -> Result<Record, AppError> {
    use sqlx::Column;
    let mut map = Record::new();
    for col in row.columns() {
        map.insert(col.name().to_string(), cell_to_value(row, col.ordinal(), col.type_info())?);
    }
    Ok(map)
}

/// Decode by declared column type; VARCHAR that happens to hold JSON text must stay a string.
/// A cell the driver cannot decode is an error, never a null.
fn cell_to_value(row: &MySqlRow, idx: usize, ty: &sqlx::mysql::MySqlTypeInfo) -> Result<Value, AppError> {
    use sqlx::Row;
    use sqlx::TypeInfo;
    let value = match ty.name() {
        "BOOLEAN" => row.try_get::<Option<bool>, _>(idx)?.map(Value::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<Option<i64>, _>(idx)?.map(Value::from)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED" | "BIGINT UNSIGNED" => {
            row.try_get::<Option<u64>, _>(idx)?.map(Value::from)
        }
        "FLOAT" | "DOUBLE" => match row.try_get::<Option<f64>, _>(idx)? {
            Some(f) => Some(
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| sqlx::Error::Decode(format!("column {} holds a non-finite number", idx).into()))?,
            ),
            None => None,
        },
        "DATETIME" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(idx)?
            .map(|d| Value::String(d.format("%Y-%m-%dT%H:%M:%S").to_string())),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)?
            .map(|d| Value::String(d.to_rfc3339())),
        "JSON" => row.try_get::<Option<Value>, _>(idx)?,
        _ => row.try_get::<Option<String>, _>(idx)?.map(Value::String),
    };
    Ok(value.unwrap_or(Value::Null))
}
