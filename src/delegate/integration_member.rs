//! Delegate for integration members, experts included.

use super::Delegate;
use crate::dao::{Criteria, Dao};
use crate::error::AppError;
use crate::model::{Id, IntegrationMember, IntegrationMemberRole, Record};
use std::sync::Arc;

pub const REGISTRATION_REQUIRED: &str = "User needs to be registered before becoming an expert";

#[derive(Clone)]
pub struct IntegrationMemberDelegate {
    base: Delegate<IntegrationMember>,
}

impl IntegrationMemberDelegate {
    pub fn new(dao: Arc<dyn Dao>) -> Self {
        IntegrationMemberDelegate {
            base: Delegate::new(dao),
        }
    }

    pub fn base(&self) -> &Delegate<IntegrationMember> {
        &self.base
    }

    /// Make a registered user an expert of an integration. Unregistered users (no user id)
    /// are refused before anything is written.
    pub async fn create_expert(&self, member: &IntegrationMember) -> Result<IntegrationMember, AppError> {
        let mut member = member.clone();
        member.set_role(IntegrationMemberRole::Expert);
        if member.get_user_id().is_none() {
            tracing::warn!(integration_id = member.get_integration_id(), "expert promotion without user id");
            return Err(AppError::Unauthorized(REGISTRATION_REQUIRED.into()));
        }
        self.base.create(&member).await
    }

    pub async fn add_member(
        &self,
        integration_id: Id,
        user_id: Option<Id>,
        role: IntegrationMemberRole,
    ) -> Result<IntegrationMember, AppError> {
        self.base
            .create(&IntegrationMember::new(integration_id, user_id, role))
            .await
    }

    pub async fn members_of(&self, integration_id: Id) -> Result<Vec<IntegrationMember>, AppError> {
        self.base
            .search(&Criteria::new().eq("integration_id", integration_id))
            .await
    }

    /// Update one member, only if it belongs to `integration_id`.
    pub async fn update_member(
        &self,
        integration_id: Id,
        member_id: Id,
        changes: &Record,
    ) -> Result<Option<IntegrationMember>, AppError> {
        let criteria = Criteria::new()
            .eq("id", member_id)
            .eq("integration_id", integration_id);
        self.base.update_one(&criteria, changes).await
    }

    /// Number removed; zero when the member is not part of `integration_id`.
    pub async fn remove_member(&self, integration_id: Id, member_id: Id) -> Result<u64, AppError> {
        let criteria = Criteria::new()
            .eq("id", member_id)
            .eq("integration_id", integration_id);
        self.base.delete_where(&criteria).await
    }
}
