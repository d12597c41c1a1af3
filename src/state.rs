//! Shared application state for all routes: the delegates, wired once at startup.

use crate::access::{AccessControl, AllowAll};
use crate::config::Config;
use crate::dao::{Dao, MemoryDao, MySqlDao};
use crate::delegate::{
    ActivityDelegate, EmailDelegate, IntegrationDelegate, IntegrationMemberDelegate, TransactionDelegate,
    UserDelegate,
};
use crate::model::{Email, Entity, Integration, IntegrationMember, TableDef, Transaction, TransactionItem, User};
use sqlx::MySqlPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: UserDelegate,
    pub integrations: IntegrationDelegate,
    pub members: IntegrationMemberDelegate,
    pub emails: EmailDelegate,
    pub transactions: TransactionDelegate,
    pub activity: ActivityDelegate,
    pub access: Arc<dyn AccessControl>,
    /// Probed by `/ready`; `None` for the in-memory store.
    pub pool: Option<MySqlPool>,
}

impl AppState {
    fn wire<F>(config: &Config, pool: Option<MySqlPool>, dao: F) -> Self
    where
        F: Fn(&'static TableDef) -> Arc<dyn Dao>,
    {
        let members = IntegrationMemberDelegate::new(dao(IntegrationMember::TABLE));
        let transactions = TransactionDelegate::new(dao(Transaction::TABLE), dao(TransactionItem::TABLE));
        AppState {
            users: UserDelegate::new(dao(User::TABLE)),
            integrations: IntegrationDelegate::new(dao(Integration::TABLE), config.secret_length),
            emails: EmailDelegate::new(dao(Email::TABLE)),
            activity: ActivityDelegate::new(members.clone(), transactions.clone()),
            members,
            transactions,
            access: Arc::new(AllowAll),
            pool,
        }
    }

    /// Every delegate backed by MySQL through one shared pool.
    pub fn mysql(pool: MySqlPool, config: &Config) -> Self {
        let shared = pool.clone();
        Self::wire(config, Some(pool), move |table| {
            Arc::new(MySqlDao::new(shared.clone(), table)) as Arc<dyn Dao>
        })
    }

    /// Every delegate backed by a fresh `MemoryDao`.
    pub fn in_memory(config: &Config) -> Self {
        Self::wire(config, None, |table| Arc::new(MemoryDao::new(table)) as Arc<dyn Dao>)
    }

    pub fn with_access(mut self, access: Arc<dyn AccessControl>) -> Self {
        self.access = access;
        self
    }
}
