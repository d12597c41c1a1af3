use super::{ColumnDef, Entity, Id, SqlType, TableDef, CREATED_AT, ID};
use chrono::NaiveDateTime;
use crate::validation::ValidationRule;
use serde::{Deserialize, Serialize};

/// Marketplace user. Only the fields this service reads are modelled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    id: Option<Id>,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        User { email: email.into(), ..Default::default() }
    }

    pub fn get_id(&self) -> Option<Id> { self.id }
    pub fn get_email(&self) -> &str { &self.email }
    pub fn get_first_name(&self) -> Option<&str> { self.first_name.as_deref() }
    pub fn get_last_name(&self) -> Option<&str> { self.last_name.as_deref() }
    pub fn get_created_at(&self) -> Option<NaiveDateTime> { self.created_at }

    pub fn set_email(&mut self, val: impl Into<String>) { self.email = val.into(); }
    pub fn set_first_name(&mut self, val: Option<String>) { self.first_name = val; }
    pub fn set_last_name(&mut self, val: Option<String>) { self.last_name = val; }
}

const TABLE_DEF: TableDef = TableDef {
    name: "user",
    id_column: "id",
    columns: &[
        ID,
        ColumnDef::required("email", SqlType::Varchar(255)),
        ColumnDef::optional("first_name", SqlType::Varchar(100)),
        ColumnDef::optional("last_name", SqlType::Varchar(100)),
        CREATED_AT,
    ],
};

impl Entity for User {
    const TABLE: &'static TableDef = &TABLE_DEF;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn rules() -> Vec<(&'static str, ValidationRule)> {
        vec![("email", ValidationRule { format: Some("email"), max_length: Some(255), ..Default::default() })]
    }
}
