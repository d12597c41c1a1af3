use super::{ColumnDef, ColumnDefault, Entity, Id, SqlType, TableDef, TransactionStatus, CREATED_AT, ID};
use chrono::NaiveDateTime;
use crate::validation::ValidationRule;
use serde::{Deserialize, Serialize};

/// A customer's purchase within an integration. Amounts are in minor currency units.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    id: Option<Id>,
    user_id: Option<Id>,
    integration_id: Id,
    /// Member who serves the purchase, when it is an expert call.
    expert_id: Option<Id>,
    status: TransactionStatus,
    total: i64,
    created_at: Option<NaiveDateTime>,
}

impl Transaction {
    pub fn new(integration_id: Id, user_id: Option<Id>) -> Self {
        Transaction { integration_id, user_id, ..Default::default() }
    }

    pub fn get_id(&self) -> Option<Id> { self.id }
    pub fn get_user_id(&self) -> Option<Id> { self.user_id }
    pub fn get_integration_id(&self) -> Id { self.integration_id }
    pub fn get_expert_id(&self) -> Option<Id> { self.expert_id }
    pub fn get_status(&self) -> TransactionStatus { self.status }
    pub fn get_total(&self) -> i64 { self.total }

    pub fn set_expert_id(&mut self, val: Option<Id>) { self.expert_id = val; }
    pub fn set_status(&mut self, val: TransactionStatus) { self.status = val; }
    pub fn set_total(&mut self, val: i64) { self.total = val; }
}

const TRANSACTION_TABLE: TableDef = TableDef {
    name: "transaction",
    id_column: "id",
    columns: &[
        ID,
        ColumnDef::optional("user_id", SqlType::BigInt),
        ColumnDef::required("integration_id", SqlType::BigInt),
        ColumnDef::optional("expert_id", SqlType::BigInt),
        ColumnDef::defaulted("status", SqlType::Varchar(16), ColumnDefault::Text("PENDING")),
        ColumnDef::defaulted("total", SqlType::BigInt, ColumnDefault::Int(0)),
        CREATED_AT,
    ],
};

impl Entity for Transaction {
    const TABLE: &'static TableDef = &TRANSACTION_TABLE;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn rules() -> Vec<(&'static str, ValidationRule)> {
        vec![(
            "status",
            ValidationRule { allowed: Some(&["PENDING", "COMPLETED", "CANCELLED"]), ..Default::default() },
        )]
    }
}

fn one() -> i32 {
    1
}

/// One line of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionItem {
    id: Option<Id>,
    transaction_id: Id,
    item_type: String,
    item_id: Option<Id>,
    amount: i64,
    #[serde(default = "one")]
    quantity: i32,
}

impl TransactionItem {
    pub fn new(transaction_id: Id, item_type: impl Into<String>, amount: i64) -> Self {
        TransactionItem {
            transaction_id,
            item_type: item_type.into(),
            amount,
            quantity: 1,
            ..Default::default()
        }
    }

    pub fn get_id(&self) -> Option<Id> { self.id }
    pub fn get_transaction_id(&self) -> Id { self.transaction_id }
    pub fn get_item_type(&self) -> &str { &self.item_type }
    pub fn get_item_id(&self) -> Option<Id> { self.item_id }
    pub fn get_amount(&self) -> i64 { self.amount }
    pub fn get_quantity(&self) -> i32 { self.quantity }

    pub fn set_transaction_id(&mut self, val: Id) { self.transaction_id = val; }
    pub fn set_item_id(&mut self, val: Option<Id>) { self.item_id = val; }
    pub fn set_amount(&mut self, val: i64) { self.amount = val; }
    pub fn set_quantity(&mut self, val: i32) { self.quantity = val; }

    /// amount * quantity; `None` when it does not fit in an i64.
    pub fn line_total(&self) -> Option<i64> {
        self.amount.checked_mul(i64::from(self.quantity))
    }
}

const ITEM_TABLE: TableDef = TableDef {
    name: "transaction_item",
    id_column: "id",
    columns: &[
        ID,
        ColumnDef::required("transaction_id", SqlType::BigInt),
        ColumnDef::required("item_type", SqlType::Varchar(32)),
        ColumnDef::optional("item_id", SqlType::BigInt),
        ColumnDef::required("amount", SqlType::BigInt),
        ColumnDef::defaulted("quantity", SqlType::Int, ColumnDefault::Int(1)),
    ],
};

impl Entity for TransactionItem {
    const TABLE: &'static TableDef = &ITEM_TABLE;

    fn id(&self) -> Option<Id> {
        self.id
    }
}
