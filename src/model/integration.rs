use super::{ColumnDef, Entity, Id, SqlType, TableDef, CREATED_AT, ID};
use chrono::NaiveDateTime;
use crate::validation::ValidationRule;
use serde::{Deserialize, Serialize};

/// A third-party site embedding the marketplace; callers authenticate with its shared secret.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Integration {
    id: Option<Id>,
    title: String,
    website_url: Option<String>,
    redirect_url: Option<String>,
    secret: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl Integration {
    pub fn new(title: impl Into<String>) -> Self {
        Integration { title: title.into(), ..Default::default() }
    }

    pub fn get_id(&self) -> Option<Id> { self.id }
    pub fn get_title(&self) -> &str { &self.title }
    pub fn get_website_url(&self) -> Option<&str> { self.website_url.as_deref() }
    pub fn get_redirect_url(&self) -> Option<&str> { self.redirect_url.as_deref() }
    pub fn get_secret(&self) -> Option<&str> { self.secret.as_deref() }
    pub fn get_created_at(&self) -> Option<NaiveDateTime> { self.created_at }

    pub fn set_title(&mut self, val: impl Into<String>) { self.title = val.into(); }
    pub fn set_website_url(&mut self, val: Option<String>) { self.website_url = val; }
    pub fn set_redirect_url(&mut self, val: Option<String>) { self.redirect_url = val; }
    pub fn set_secret(&mut self, val: Option<String>) { self.secret = val; }
}

const TABLE_DEF: TableDef = TableDef {
    name: "integration",
    id_column: "id",
    columns: &[
        ID,
        ColumnDef::required("title", SqlType::Varchar(255)),
        ColumnDef::optional("website_url", SqlType::Varchar(255)),
        ColumnDef::optional("redirect_url", SqlType::Varchar(255)),
        ColumnDef::required("secret", SqlType::Varchar(64)),
        CREATED_AT,
    ],
};

impl Entity for Integration {
    const TABLE: &'static TableDef = &TABLE_DEF;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn rules() -> Vec<(&'static str, ValidationRule)> {
        let url = ValidationRule { pattern: Some("^https?://"), max_length: Some(255), ..Default::default() };
        vec![
            ("title", ValidationRule { max_length: Some(255), ..Default::default() }),
            ("website_url", url.clone()),
            ("redirect_url", url),
        ]
    }
}
