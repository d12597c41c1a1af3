//! Delegate for payment transactions and their line items.

use super::Delegate;
use crate::dao::{Criteria, Dao};
use crate::error::AppError;
use crate::model::{Id, Record, Transaction, TransactionItem};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;

/// Parts of a transaction a GET may ask for via `fields=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionField {
    Summary,
    Items,
    /// No store behind these yet; accepted and left out of the response.
    Discounts,
    Invoice,
}

impl FromStr for TransactionField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "summary" => Ok(TransactionField::Summary),
            "items" => Ok(TransactionField::Items),
            "discounts" => Ok(TransactionField::Discounts),
            "invoice" => Ok(TransactionField::Invoice),
            other => Err(AppError::BadRequest(format!("unknown transaction field '{}'", other))),
        }
    }
}

impl TransactionField {
    /// Comma-separated list; empty means summary only.
    pub fn parse_list(raw: Option<&str>) -> Result<Vec<TransactionField>, AppError> {
        let parsed: Vec<TransactionField> = raw
            .unwrap_or_default()
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<TransactionField>)
            .collect::<Result<_, _>>()?;
        if parsed.is_empty() {
            return Ok(vec![TransactionField::Summary]);
        }
        Ok(parsed)
    }
}

/// Sum of line totals, refusing anything that overflows an i64.
fn sum_lines(transaction_id: Id, lines: &[TransactionItem]) -> Result<i64, AppError> {
    lines
        .iter()
        .try_fold(0i64, |sum, line| line.line_total().and_then(|t| sum.checked_add(t)))
        .ok_or_else(|| AppError::Validation(format!("transaction {} total is out of range", transaction_id)))
}

#[derive(Clone)]
pub struct TransactionDelegate {
    transactions: Delegate<Transaction>,
    items: Delegate<TransactionItem>,
}

impl TransactionDelegate {
    pub fn new(transaction_dao: Arc<dyn Dao>, item_dao: Arc<dyn Dao>) -> Self {
        TransactionDelegate {
            transactions: Delegate::new(transaction_dao),
            items: Delegate::new(item_dao),
        }
    }

    pub fn base(&self) -> &Delegate<Transaction> {
        &self.transactions
    }

    /// Starts with a zero total whatever the caller sent; items move it.
    pub async fn create(&self, transaction: &Transaction) -> Result<Transaction, AppError> {
        let mut transaction = transaction.clone();
        transaction.set_total(0);
        self.transactions.create(&transaction).await
    }

    pub async fn get(&self, id: Id) -> Result<Option<Transaction>, AppError> {
        self.transactions.get(id).await
    }

    /// The total is derived from the items and cannot be set directly.
    pub async fn update_by_id(&self, id: Id, changes: &Record) -> Result<Option<Transaction>, AppError> {
        let mut changes = changes.clone();
        changes.remove("total");
        self.transactions.update_by_id(id, &changes).await
    }

    /// Removes the items first, then the transaction. Zero when it does not exist.
    pub async fn delete(&self, id: Id) -> Result<u64, AppError> {
        self.items
            .delete_where(&Criteria::new().eq("transaction_id", id))
            .await?;
        self.transactions.delete(id).await
    }

    pub async fn items_of(&self, transaction_id: Id) -> Result<Vec<TransactionItem>, AppError> {
        self.items
            .search(&Criteria::new().eq("transaction_id", transaction_id))
            .await
    }

    pub async fn add_item(&self, transaction_id: Id, item: &TransactionItem) -> Result<TransactionItem, AppError> {
        self.require(transaction_id).await?;
        let mut item = item.clone();
        item.set_transaction_id(transaction_id);
        let mut lines = self.items_of(transaction_id).await?;
        lines.push(item.clone());
        sum_lines(transaction_id, &lines)?;
        let created = self.items.create(&item).await?;
        self.recompute_total(transaction_id).await?;
        Ok(created)
    }

    /// `None` when the item is not part of the transaction.
    pub async fn update_item(
        &self,
        transaction_id: Id,
        item_id: Id,
        changes: &Record,
    ) -> Result<Option<TransactionItem>, AppError> {
        let mut changes = changes.clone();
        changes.remove("transaction_id");
        let mut lines = self.items_of(transaction_id).await?;
        let Some(line) = lines.iter_mut().find(|i| i.get_id() == Some(item_id)) else {
            return Ok(None);
        };
        if let Some(amount) = changes.get("amount").and_then(Value::as_i64) {
            line.set_amount(amount);
        }
        if let Some(quantity) = changes.get("quantity").and_then(Value::as_i64).and_then(|q| i32::try_from(q).ok()) {
            line.set_quantity(quantity);
        }
        sum_lines(transaction_id, &lines)?;
        let criteria = Criteria::new().eq("id", item_id).eq("transaction_id", transaction_id);
        let updated = self.items.update_one(&criteria, &changes).await?;
        if updated.is_some() {
            self.recompute_total(transaction_id).await?;
        }
        Ok(updated)
    }

    pub async fn remove_item(&self, transaction_id: Id, item_id: Id) -> Result<u64, AppError> {
        let criteria = Criteria::new().eq("id", item_id).eq("transaction_id", transaction_id);
        let removed = self.items.delete_where(&criteria).await?;
        if removed > 0 {
            self.recompute_total(transaction_id).await?;
        }
        Ok(removed)
    }

    /// Requested parts as one JSON object keyed by field name; `None` when the transaction does not exist.
    pub async fn get_with_fields(&self, id: Id, fields: &[TransactionField]) -> Result<Option<Value>, AppError> {
        let Some(transaction) = self.get(id).await? else {
            return Ok(None);
        };
        let mut out = Map::new();
        for field in fields {
            match field {
                TransactionField::Summary => {
                    out.insert("summary".into(), serde_json::to_value(&transaction)?);
                }
                TransactionField::Items => {
                    out.insert("items".into(), serde_json::to_value(self.items_of(id).await?)?);
                }
                TransactionField::Discounts | TransactionField::Invoice => {}
            }
        }
        Ok(Some(Value::Object(out)))
    }

    async fn require(&self, transaction_id: Id) -> Result<Transaction, AppError> {
        self.get(transaction_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("transaction {}", transaction_id)))
    }

    async fn recompute_total(&self, transaction_id: Id) -> Result<(), AppError> {
        let total = sum_lines(transaction_id, &self.items_of(transaction_id).await?)?;
        let mut changes = Record::new();
        changes.insert("total".into(), Value::from(total));
        self.transactions
            .update(&Criteria::new().eq("id", transaction_id), &changes)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::MemoryDao;
    use crate::model::{Entity, TransactionStatus};
    use serde_json::json;

    fn delegate() -> TransactionDelegate {
        TransactionDelegate::new(
            Arc::new(MemoryDao::new(Transaction::TABLE)),
            Arc::new(MemoryDao::new(TransactionItem::TABLE)),
        )
    }

    #[test]
    fn field_lists() {
        assert_eq!(TransactionField::parse_list(None).unwrap(), vec![TransactionField::Summary]);
        assert_eq!(
            TransactionField::parse_list(Some("items, summary")).unwrap(),
            vec![TransactionField::Items, TransactionField::Summary]
        );
        assert!(TransactionField::parse_list(Some("summary,refunds")).is_err());
    }

    #[tokio::test]
    async fn items_drive_the_total() {
        let d = delegate();
        let t = d.create(&Transaction::new(1, Some(2))).await.unwrap();
        let id = t.get_id().unwrap();
        assert_eq!(t.get_status(), TransactionStatus::Pending);
        assert_eq!(t.get_total(), 0);

        let mut call = TransactionItem::new(0, "call", 1500);
        call.set_quantity(2);
        let call = d.add_item(id, &call).await.unwrap();
        assert_eq!(call.get_transaction_id(), id);
        d.add_item(id, &TransactionItem::new(id, "fee", 100)).await.unwrap();
        assert_eq!(d.get(id).await.unwrap().unwrap().get_total(), 3100);

        let changes: Record = serde_json::from_value(json!({"quantity": 1, "transaction_id": 99})).unwrap();
        let updated = d.update_item(id, call.get_id().unwrap(), &changes).await.unwrap().unwrap();
        assert_eq!(updated.get_transaction_id(), id);
        assert_eq!(d.get(id).await.unwrap().unwrap().get_total(), 1600);

        assert_eq!(d.remove_item(id, call.get_id().unwrap()).await.unwrap(), 1);
        assert_eq!(d.get(id).await.unwrap().unwrap().get_total(), 100);
    }

    #[tokio::test]
    async fn items_require_an_existing_transaction() {
        let d = delegate();
        let err = d.add_item(5, &TransactionItem::new(5, "call", 10)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn total_is_not_writable_and_delete_cascades() {
        let d = delegate();
        let id = d.create(&Transaction::new(1, None)).await.unwrap().get_id().unwrap();
        d.add_item(id, &TransactionItem::new(id, "call", 700)).await.unwrap();
        let changes: Record = serde_json::from_value(json!({"total": 1, "status": "COMPLETED"})).unwrap();
        let t = d.update_by_id(id, &changes).await.unwrap().unwrap();
        assert_eq!(t.get_total(), 700);
        assert_eq!(t.get_status(), TransactionStatus::Completed);

        assert_eq!(d.delete(id).await.unwrap(), 1);
        assert!(d.items_of(id).await.unwrap().is_empty());
        assert_eq!(d.delete(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_ignores_a_supplied_total() {
        let d = delegate();
        let mut t = Transaction::new(1, None);
        t.set_total(999_999);
        t.set_status(TransactionStatus::Completed);
        let created = d.create(&t).await.unwrap();
        assert_eq!(created.get_total(), 0);
        assert_eq!(d.get(created.get_id().unwrap()).await.unwrap().unwrap().get_total(), 0);
    }

    #[tokio::test]
    async fn overflowing_lines_are_refused_before_writing() {
        let d = delegate();
        let id = d.create(&Transaction::new(1, None)).await.unwrap().get_id().unwrap();
        let mut huge = TransactionItem::new(id, "call", 9_000_000_000_000_000_000);
        huge.set_quantity(2);
        assert!(matches!(d.add_item(id, &huge).await, Err(AppError::Validation(_))));
        assert!(d.items_of(id).await.unwrap().is_empty());

        let big = d.add_item(id, &TransactionItem::new(id, "call", i64::MAX - 10)).await.unwrap();
        assert!(matches!(
            d.add_item(id, &TransactionItem::new(id, "fee", 100)).await,
            Err(AppError::Validation(_))
        ));
        let changes: Record = serde_json::from_value(json!({"quantity": 3})).unwrap();
        assert!(matches!(
            d.update_item(id, big.get_id().unwrap(), &changes).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(d.get(id).await.unwrap().unwrap().get_total(), i64::MAX - 10);
        assert_eq!(d.items_of(id).await.unwrap()[0].get_quantity(), 1);
    }

    #[tokio::test]
    async fn get_with_fields_assembles_requested_parts() {
        let d = delegate();
        let id = d.create(&Transaction::new(1, None)).await.unwrap().get_id().unwrap();
        d.add_item(id, &TransactionItem::new(id, "call", 250)).await.unwrap();
        let fields = TransactionField::parse_list(Some("summary,items,invoice")).unwrap();
        let v = d.get_with_fields(id, &fields).await.unwrap().unwrap();
        assert_eq!(v["summary"]["total"], json!(250));
        assert_eq!(v["items"].as_array().map(Vec::len), Some(1));
        assert!(v.get("invoice").is_none());
        assert_eq!(d.get_with_fields(404, &fields).await.unwrap(), None);
    }
}
