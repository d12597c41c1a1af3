//! Data access: one DAO per table, issuing single statements. No joins, no cross-table transactions.

mod criteria;
mod memory;
mod mysql;

pub use criteria::{value_eq, Criteria};
pub use memory::MemoryDao;
pub use mysql::MySqlDao;

use crate::error::AppError;
use crate::model::{Id, Record, TableDef};
use async_trait::async_trait;

#[async_trait]
pub trait Dao: Send + Sync {
    fn table(&self) -> &'static TableDef;

    /// Row by id, optionally restricted to `fields`.
    async fn get(&self, id: Id, fields: Option<&[String]>) -> Result<Option<Record>, AppError>;

    /// Rows matching every condition, ordered by id. Empty criteria returns the whole table.
    async fn search(&self, criteria: &Criteria, fields: Option<&[String]>) -> Result<Vec<Record>, AppError>;

    async fn get_all(&self) -> Result<Vec<Record>, AppError> {
        self.search(&Criteria::new(), None).await
    }

    /// Insert and return the stored row, defaults included.
    async fn create(&self, record: &Record) -> Result<Record, AppError>;

    /// Number of rows matched.
    async fn update(&self, criteria: &Criteria, values: &Record) -> Result<u64, AppError>;

    /// Number of rows removed; zero when nothing matched.
    async fn delete(&self, criteria: &Criteria) -> Result<u64, AppError>;
}
