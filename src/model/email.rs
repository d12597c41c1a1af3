use super::{ColumnDef, Entity, Id, SqlType, TableDef, ID};
use crate::validation::ValidationRule;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound message rendered from `template` with `data` at `scheduled_date` (epoch millis).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Email {
    id: Option<Id>,
    recipient_email: String,
    sender_email: String,
    subject: String,
    template: String,
    data: Value,
    scheduled_date: Option<i64>,
}

impl Email {
    pub fn get_id(&self) -> Option<Id> { self.id }
    pub fn get_recipient_email(&self) -> &str { &self.recipient_email }
    pub fn get_sender_email(&self) -> &str { &self.sender_email }
    pub fn get_subject(&self) -> &str { &self.subject }
    pub fn get_template(&self) -> &str { &self.template }
    pub fn get_email_data(&self) -> &Value { &self.data }
    pub fn get_scheduled_date(&self) -> Option<i64> { self.scheduled_date }

    pub fn set_recipient_email(&mut self, val: impl Into<String>) { self.recipient_email = val.into(); }
    pub fn set_sender_email(&mut self, val: impl Into<String>) { self.sender_email = val.into(); }
    pub fn set_subject(&mut self, val: impl Into<String>) { self.subject = val.into(); }
    pub fn set_template(&mut self, val: impl Into<String>) { self.template = val.into(); }
    pub fn set_email_data(&mut self, val: Value) { self.data = val; }
    pub fn set_scheduled_date(&mut self, val: Option<i64>) { self.scheduled_date = val; }
}

const TABLE_DEF: TableDef = TableDef {
    name: "email",
    id_column: "id",
    columns: &[
        ID,
        ColumnDef::required("recipient_email", SqlType::Varchar(255)),
        ColumnDef::required("sender_email", SqlType::Varchar(255)),
        ColumnDef::required("subject", SqlType::Varchar(255)),
        ColumnDef::required("template", SqlType::Varchar(100)),
        ColumnDef::optional("data", SqlType::Json),
        ColumnDef::optional("scheduled_date", SqlType::BigInt),
    ],
};

impl Entity for Email {
    const TABLE: &'static TableDef = &TABLE_DEF;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn rules() -> Vec<(&'static str, ValidationRule)> {
        vec![
            ("recipient_email", ValidationRule { format: Some("email"), max_length: Some(255), ..Default::default() }),
            ("sender_email", ValidationRule { format: Some("email"), max_length: Some(255), ..Default::default() }),
            ("template", ValidationRule { pattern: Some(r"^[A-Za-z0-9_\-]+$"), ..Default::default() }),
            ("scheduled_date", ValidationRule { minimum: Some(0.0), ..Default::default() }),
        ]
    }
}
