//! Activity summaries composed from members and transactions.

use super::{IntegrationMemberDelegate, TransactionDelegate};
use crate::dao::Criteria;
use crate::error::AppError;
use crate::model::{Id, IntegrationMemberRole, MemberStatus, Transaction, TransactionStatus};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, PartialEq, Serialize)]
pub struct ExpertActivity {
    pub expert_id: Id,
    pub integration_id: Id,
    pub status: MemberStatus,
    pub transactions: u64,
    /// Sum of completed transaction totals.
    pub revenue: i64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct OwnerActivity {
    pub integration_id: Id,
    pub members: BTreeMap<IntegrationMemberRole, u64>,
    pub transactions: u64,
    pub revenue: i64,
}

#[derive(Clone)]
pub struct ActivityDelegate {
    members: IntegrationMemberDelegate,
    transactions: TransactionDelegate,
}

fn tally(transactions: &[Transaction]) -> Result<(u64, i64), AppError> {
    let revenue = transactions
        .iter()
        .filter(|t| t.get_status() == TransactionStatus::Completed)
        .try_fold(0i64, |sum, t| sum.checked_add(t.get_total()))
        .ok_or_else(|| AppError::Validation("revenue is out of range".into()))?;
    Ok((transactions.len() as u64, revenue))
}

impl ActivityDelegate {
    pub fn new(members: IntegrationMemberDelegate, transactions: TransactionDelegate) -> Self {
        ActivityDelegate { members, transactions }
    }

    /// `None` when the member does not exist or is not an expert.
    pub async fn expert_summary(&self, expert_id: Id) -> Result<Option<ExpertActivity>, AppError> {
        let Some(expert) = self.members.base().get(expert_id).await? else {
            return Ok(None);
        };
        if expert.get_role() != IntegrationMemberRole::Expert {
            return Ok(None);
        }
        let served = self
            .transactions
            .base()
            .search(&Criteria::new().eq("expert_id", expert_id))
            .await?;
        let (transactions, revenue) = tally(&served)?;
        Ok(Some(ExpertActivity {
            expert_id,
            integration_id: expert.get_integration_id(),
            status: expert.get_status(),
            transactions,
            revenue,
        }))
    }

    pub async fn owner_summary(&self, integration_id: Id) -> Result<OwnerActivity, AppError> {
        let mut members: BTreeMap<IntegrationMemberRole, u64> =
            IntegrationMemberRole::ALL.into_iter().map(|r| (r, 0)).collect();
        for m in self.members.members_of(integration_id).await? {
            *members.entry(m.get_role()).or_default() += 1;
        }
        let all = self
            .transactions
            .base()
            .search(&Criteria::new().eq("integration_id", integration_id))
            .await?;
        let (transactions, revenue) = tally(&all)?;
        Ok(OwnerActivity {
            integration_id,
            members,
            transactions,
            revenue,
        })
    }
}
