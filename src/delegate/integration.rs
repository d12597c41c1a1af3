//! Delegate for third-party integrations and their shared secret.

use super::Delegate;
use crate::dao::{Criteria, Dao};
use crate::error::AppError;
use crate::model::{Entity, Id, Integration, Record};
use crate::utils::random_string;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct IntegrationDelegate {
    base: Delegate<Integration>,
    secret_length: usize,
}

impl IntegrationDelegate {
    pub fn new(dao: Arc<dyn Dao>, secret_length: usize) -> Self {
        IntegrationDelegate {
            base: Delegate::new(dao),
            secret_length: secret_length.max(1),
        }
    }

    pub fn base(&self) -> &Delegate<Integration> {
        &self.base
    }

    pub async fn get(&self, id: Id) -> Result<Option<Integration>, AppError> {
        self.base.get(id).await
    }

    pub async fn get_all(&self) -> Result<Vec<Integration>, AppError> {
        self.base.get_all().await
    }

    pub async fn get_multiple(&self, ids: &[Id]) -> Result<Vec<Integration>, AppError> {
        self.base
            .search(&Criteria::new().eq(Integration::TABLE.id_column, ids.to_vec()))
            .await
    }

    /// Insert; a secret is generated when the caller did not supply one.
    pub async fn create(&self, integration: &Integration) -> Result<Integration, AppError> {
        let mut integration = integration.clone();
        if integration.get_secret().map_or(true, |s| s.trim().is_empty()) {
            integration.set_secret(Some(random_string(self.secret_length, None)));
        }
        self.base.create(&integration).await
    }

    /// Replace the secret with a fresh random one and return it.
    pub async fn reset_secret(&self, integration_id: Id) -> Result<String, AppError> {
        let fields = ["secret".to_string()];
        let current = self
            .base
            .get_fields(integration_id, &fields)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("integration {}", integration_id)))?;
        let old = current.get("secret").and_then(Value::as_str).unwrap_or_default();

        let mut new_secret = random_string(self.secret_length, None);
        while new_secret == old {
            new_secret = random_string(self.secret_length, None);
        }

        let mut changes = Record::new();
        changes.insert("secret".into(), Value::String(new_secret.clone()));
        let affected = self
            .base
            .update(&Criteria::new().eq(Integration::TABLE.id_column, integration_id), &changes)
            .await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!("integration {}", integration_id)));
        }
        tracing::info!(integration_id, "integration secret reset");
        Ok(new_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::MemoryDao;

    fn delegate(len: usize) -> IntegrationDelegate {
        IntegrationDelegate::new(Arc::new(MemoryDao::new(Integration::TABLE)), len)
    }

    #[tokio::test]
    async fn create_generates_a_secret() {
        let d = delegate(30);
        let created = d.create(&Integration::new("Acme")).await.unwrap();
        assert_eq!(created.get_secret().map(str::len), Some(30));

        let mut given = Integration::new("Globex");
        given.set_secret(Some("preset".into()));
        assert_eq!(d.create(&given).await.unwrap().get_secret(), Some("preset"));
    }

    #[tokio::test]
    async fn reset_secret_returns_and_persists_a_new_value() {
        let d = delegate(30);
        let created = d.create(&Integration::new("Acme")).await.unwrap();
        let id = created.get_id().unwrap();
        let mut previous = created.get_secret().unwrap().to_string();
        for _ in 0..5 {
            let fresh = d.reset_secret(id).await.unwrap();
            assert_ne!(fresh, previous);
            assert_eq!(d.get(id).await.unwrap().unwrap().get_secret(), Some(fresh.as_str()));
            previous = fresh;
        }
    }

    #[tokio::test]
    async fn reset_secret_differs_even_from_a_tiny_keyspace() {
        // One-character secrets collide often; the reset must still change it.
        let d = delegate(1);
        let id = d.create(&Integration::new("Acme")).await.unwrap().get_id().unwrap();
        for _ in 0..20 {
            let before = d.get(id).await.unwrap().unwrap().get_secret().unwrap().to_string();
            assert_ne!(d.reset_secret(id).await.unwrap(), before);
        }
    }

    #[tokio::test]
    async fn reset_secret_of_unknown_integration_is_not_found() {
        let d = delegate(30);
        assert!(matches!(d.reset_secret(9).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn get_multiple_and_get_all() {
        let d = delegate(8);
        for title in ["a", "b", "c"] {
            d.create(&Integration::new(title)).await.unwrap();
        }
        let some = d.get_multiple(&[1, 3]).await.unwrap();
        assert_eq!(some.iter().map(|i| i.get_title()).collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(d.get_all().await.unwrap().len(), 3);
        assert!(d.get_multiple(&[]).await.unwrap().is_empty());
    }
}
