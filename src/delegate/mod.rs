//! Delegates: business operations over one or more DAOs.
//!
//! `Delegate<T>` supplies get/search/create/update/delete for any entity; the entity-specific
//! delegates wrap it and add their own operations.

mod activity;
mod email;
mod integration;
mod integration_member;
mod transaction;

pub use activity::{ActivityDelegate, ExpertActivity, OwnerActivity};
pub use integration::IntegrationDelegate;
pub use integration_member::{IntegrationMemberDelegate, REGISTRATION_REQUIRED};
pub use transaction::{TransactionDelegate, TransactionField};

use crate::dao::{Criteria, Dao};
use crate::error::AppError;
use crate::model::{Email, Entity, Id, Record, User};
use crate::utils::copy_properties;
use crate::validation::RequestValidator;
use std::marker::PhantomData;
use std::sync::Arc;

pub type UserDelegate = Delegate<User>;
pub type EmailDelegate = Delegate<Email>;

pub struct Delegate<T: Entity> {
    dao: Arc<dyn Dao>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for Delegate<T> {
    fn clone(&self) -> Self {
        Delegate {
            dao: Arc::clone(&self.dao),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Delegate<T> {
    pub fn new(dao: Arc<dyn Dao>) -> Self {
        debug_assert_eq!(dao.table().name, T::TABLE.name, "DAO bound to the wrong table");
        Delegate {
            dao,
            _entity: PhantomData,
        }
    }

    pub fn dao(&self) -> &Arc<dyn Dao> {
        &self.dao
    }

    pub async fn get(&self, id: Id) -> Result<Option<T>, AppError> {
        self.dao.get(id, None).await?.map(T::from_record).transpose()
    }

    /// Row restricted to `fields`; every field must be a column.
    pub async fn get_fields(&self, id: Id, fields: &[String]) -> Result<Option<Record>, AppError> {
        self.dao.get(id, Some(fields)).await
    }

    pub async fn search(&self, criteria: &Criteria) -> Result<Vec<T>, AppError> {
        self.dao
            .search(criteria, None)
            .await?
            .into_iter()
            .map(T::from_record)
            .collect()
    }

    pub async fn get_all(&self) -> Result<Vec<T>, AppError> {
        self.search(&Criteria::new()).await
    }

    pub async fn create(&self, entity: &T) -> Result<T, AppError> {
        let record = entity.to_record()?;
        T::TABLE.check_required(&record)?;
        RequestValidator::validate(&record, &T::rules())?;
        T::from_record(self.dao.create(&record).await?)
    }

    /// Apply `changes` to the row with `id` and return it re-read; `None` when no such row.
    /// Keys that are not columns are ignored; unchanged values are not written.
    pub async fn update_by_id(&self, id: Id, changes: &Record) -> Result<Option<T>, AppError> {
        self.update_one(&Criteria::new().eq(T::TABLE.id_column, id), changes).await
    }

    /// Like `update_by_id`, for a single row identified by any criteria (first match wins).
    pub async fn update_one(&self, criteria: &Criteria, changes: &Record) -> Result<Option<T>, AppError> {
        let Some(existing) = self.dao.search(criteria, None).await?.into_iter().next() else {
            return Ok(None);
        };
        let changes = T::TABLE.updatable(changes);
        T::TABLE.check_types(&changes)?;
        let mut merged = existing.clone();
        copy_properties(&changes, &mut merged);
        RequestValidator::validate(&merged, &T::rules())?;
        serde_json::from_value::<T>(serde_json::Value::Object(merged.clone()))
            .map_err(|e| AppError::BadRequest(format!("{}: {}", T::TABLE.name, e)))?;
        let changed: Record = merged
            .into_iter()
            .filter(|(k, v)| existing.get(k) != Some(v))
            .collect();
        let Some(id) = existing.get(T::TABLE.id_column).and_then(serde_json::Value::as_i64) else {
            return Err(AppError::NotFound(format!("{} row without id", T::TABLE.name)));
        };
        if !changed.is_empty() {
            self.dao.update(&Criteria::new().eq(T::TABLE.id_column, id), &changed).await?;
        }
        self.get(id).await
    }

    /// Rows matched by `criteria` get `changes`; returns how many matched.
    pub async fn update(&self, criteria: &Criteria, changes: &Record) -> Result<u64, AppError> {
        T::TABLE.check_types(changes)?;
        RequestValidator::validate(changes, &T::rules())?;
        self.dao.update(criteria, changes).await
    }

    /// Zero when the id does not exist.
    pub async fn delete(&self, id: Id) -> Result<u64, AppError> {
        self.dao.delete(&Criteria::new().eq(T::TABLE.id_column, id)).await
    }

    pub async fn delete_where(&self, criteria: &Criteria) -> Result<u64, AppError> {
        self.dao.delete(criteria).await
    }
}
