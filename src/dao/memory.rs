//! In-memory DAO with the same filter semantics as the SQL one. Used by tests and `--memory` runs.

use super::{Criteria, Dao};
use crate::error::AppError;
use crate::model::{ColumnDefault, Id, Record, TableDef};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct MemoryDao {
    table: &'static TableDef,
    rows: Arc<RwLock<BTreeMap<Id, Record>>>,
    next_id: Arc<RwLock<Id>>,
}

impl MemoryDao {
    pub fn new(table: &'static TableDef) -> Self {
        MemoryDao {
            table,
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(RwLock::new(1)),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn project(&self, row: &Record, fields: Option<&[String]>) -> Record {
        match fields {
            Some(fields) if !fields.is_empty() => fields
                .iter()
                .map(|f| (f.clone(), row.get(f).cloned().unwrap_or(Value::Null)))
                .collect(),
            _ => row.clone(),
        }
    }

    fn check_fields(&self, fields: Option<&[String]>) -> Result<(), AppError> {
        match fields {
            Some(fields) => self.table.check_fields(fields),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Dao for MemoryDao {
    fn table(&self) -> &'static TableDef {
        self.table
    }

    async fn get(&self, id: Id, fields: Option<&[String]>) -> Result<Option<Record>, AppError> {
        self.check_fields(fields)?;
        let rows = self.rows.read().await;
        Ok(rows.get(&id).map(|r| self.project(r, fields)))
    }

    async fn search(&self, criteria: &Criteria, fields: Option<&[String]>) -> Result<Vec<Record>, AppError> {
        criteria.check(self.table, true)?;
        self.check_fields(fields)?;
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|r| criteria.matches(r))
            .map(|r| self.project(r, fields))
            .collect())
    }

    async fn create(&self, record: &Record) -> Result<Record, AppError> {
        let mut row = self.table.insertable(record);
        if row.is_empty() {
            return Err(AppError::BadRequest(format!("nothing to insert into {}", self.table.name)));
        }
        let mut rows = self.rows.write().await;
        let mut next_id = self.next_id.write().await;
        let id = match row.get(self.table.id_column).and_then(Value::as_i64) {
            Some(id) => id,
            None => *next_id,
        };
        if rows.contains_key(&id) {
            return Err(AppError::BadRequest(format!("duplicate {} id {}", self.table.name, id)));
        }
        *next_id = (*next_id).max(id + 1);
        for c in self.table.columns {
            if row.contains_key(c.name) {
                continue;
            }
            let v = match c.default {
                ColumnDefault::AutoIncrement => Value::Number(id.into()),
                ColumnDefault::Now => {
                    Value::String(chrono::Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string())
                }
                ColumnDefault::Text(s) => Value::String(s.to_string()),
                ColumnDefault::Int(n) => Value::Number(n.into()),
                ColumnDefault::None => Value::Null,
            };
            row.insert(c.name.to_string(), v);
        }
        rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, criteria: &Criteria, values: &Record) -> Result<u64, AppError> {
        criteria.check(self.table, false)?;
        let values = self.table.updatable(values);
        if values.is_empty() {
            return Err(AppError::BadRequest(format!("no updatable columns for {}", self.table.name)));
        }
        let mut rows = self.rows.write().await;
        let mut affected = 0;
        for row in rows.values_mut().filter(|r| criteria.matches(r)) {
            for (k, v) in &values {
                row.insert(k.clone(), v.clone());
            }
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, criteria: &Criteria) -> Result<u64, AppError> {
        criteria.check(self.table, false)?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, r| !criteria.matches(r));
        Ok((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entity, Integration, IntegrationMember};
    use serde_json::json;

    fn record(v: Value) -> Record {
        serde_json::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_ids_and_defaults() {
        let dao = MemoryDao::new(IntegrationMember::TABLE);
        let a = dao.create(&record(json!({"integration_id": 1, "role": "OWNER"}))).await.unwrap();
        let b = dao.create(&record(json!({"integration_id": 1, "role": "EXPERT", "user_id": 4}))).await.unwrap();
        assert_eq!(a["id"], json!(1));
        assert_eq!(b["id"], json!(2));
        assert_eq!(a["status"], json!("ENABLED"));
        assert!(a["created_at"].is_string());
        assert_eq!(a["user_id"], Value::Null);
        assert_eq!(dao.len().await, 2);
    }

    #[tokio::test]
    async fn explicit_id_is_kept_and_duplicates_rejected() {
        let dao = MemoryDao::new(Integration::TABLE);
        let rec = record(json!({"id": 10, "title": "acme", "secret": "s"}));
        assert_eq!(dao.create(&rec).await.unwrap()["id"], json!(10));
        assert!(dao.create(&rec).await.is_err());
        let next = dao.create(&record(json!({"title": "b", "secret": "t"}))).await.unwrap();
        assert_eq!(next["id"], json!(11));
    }

    #[tokio::test]
    async fn search_update_delete_follow_criteria() {
        let dao = MemoryDao::new(IntegrationMember::TABLE);
        for (i, role) in [(1, "OWNER"), (1, "EXPERT"), (2, "EXPERT")] {
            dao.create(&record(json!({"integration_id": i, "role": role}))).await.unwrap();
        }
        let experts = dao.search(&Criteria::new().eq("role", "EXPERT"), None).await.unwrap();
        assert_eq!(experts.len(), 2);
        assert_eq!(dao.get_all().await.unwrap().len(), 3);

        let n = dao
            .update(&Criteria::new().eq("integration_id", 1), &record(json!({"status": "DISABLED", "id": 50})))
            .await
            .unwrap();
        assert_eq!(n, 2);
        let row = dao.get(1, None).await.unwrap().unwrap();
        assert_eq!(row["status"], json!("DISABLED"));
        assert_eq!(row["id"], json!(1));

        assert_eq!(dao.delete(&Criteria::new().eq("id", 99)).await.unwrap(), 0);
        assert_eq!(dao.delete(&Criteria::new().eq("integration_id", 2)).await.unwrap(), 1);
        assert_eq!(dao.len().await, 2);
    }

    #[tokio::test]
    async fn fields_restrict_the_projection() {
        let dao = MemoryDao::new(Integration::TABLE);
        dao.create(&record(json!({"title": "acme", "secret": "s3"}))).await.unwrap();
        let fields = vec!["secret".to_string()];
        let row = dao.get(1, Some(fields.as_slice())).await.unwrap().unwrap();
        assert_eq!(Value::Object(row), json!({"secret": "s3"}));
        assert!(dao.get(1, Some(["nope".to_string()].as_slice())).await.is_err());
    }

    #[tokio::test]
    async fn writes_without_criteria_are_refused() {
        let dao = MemoryDao::new(Integration::TABLE);
        dao.create(&record(json!({"title": "acme", "secret": "s"}))).await.unwrap();
        assert!(dao.delete(&Criteria::new()).await.is_err());
        assert!(dao.update(&Criteria::new(), &record(json!({"title": "x"}))).await.is_err());
        assert!(!dao.is_empty().await);
    }
}
