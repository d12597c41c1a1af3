//! Record types persisted one-per-table, and the static table definitions the SQL layer reads.

mod email;
mod enums;
mod integration;
mod integration_member;
mod transaction;
mod user;

pub use email::Email;
pub use enums::{ApiFlag, IntegrationMemberRole, MemberStatus, TransactionStatus};
pub use integration::Integration;
pub use integration_member::IntegrationMember;
pub use transaction::{Transaction, TransactionItem};
pub use user::User;


use crate::error::AppError;
use crate::validation::ValidationRule;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Primary keys are signed BIGINT AUTO_INCREMENT everywhere.
pub type Id = i64;

/// One row as a column -> value map.
pub type Record = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlType {
    BigInt,
    Int,
    Varchar(u16),
    Text,
    Json,
    DateTime,
}

impl SqlType {
    pub fn ddl(&self) -> String {
        match self {
            SqlType::BigInt => "BIGINT".into(),
            SqlType::Int => "INT".into(),
            SqlType::Varchar(n) => format!("VARCHAR({})", n),
            SqlType::Text => "TEXT".into(),
            SqlType::Json => "JSON".into(),
            SqlType::DateTime => "DATETIME".into(),
        }
    }
}

/// Value the store fills in when an insert omits the column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnDefault {
    None,
    AutoIncrement,
    Now,
    Text(&'static str),
    Int(i64),
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub default: ColumnDefault,
}

impl ColumnDef {
    pub const fn required(name: &'static str, sql_type: SqlType) -> Self {
        ColumnDef { name, sql_type, nullable: false, default: ColumnDefault::None }
    }

    pub const fn optional(name: &'static str, sql_type: SqlType) -> Self {
        ColumnDef { name, sql_type, nullable: true, default: ColumnDefault::None }
    }

    pub const fn defaulted(name: &'static str, sql_type: SqlType, default: ColumnDefault) -> Self {
        ColumnDef { name, sql_type, nullable: false, default }
    }

    pub fn has_default(&self) -> bool {
        self.default != ColumnDefault::None
    }
}

#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub id_column: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    /// Values an INSERT may carry: known columns only, no null id, no null for a defaulted column.
    pub fn insertable(&self, record: &Record) -> Record {
        record
            .iter()
            .filter(|(k, v)| match self.column(k) {
                Some(c) => !(v.is_null() && c.has_default()),
                None => false,
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Values an UPDATE may set: known columns other than the id.
    pub fn updatable(&self, values: &Record) -> Record {
        values
            .iter()
            .filter(|(k, _)| k.as_str() != self.id_column && self.has_column(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Non-nullable columns without a default must be present and non-null.
    pub fn check_required(&self, record: &Record) -> Result<(), AppError> {
        for c in self.columns {
            if c.nullable || c.has_default() {
                continue;
            }
            if record.get(c.name).map_or(true, Value::is_null) {
                return Err(AppError::Validation(format!("{}.{} is required", self.name, c.name)));
            }
        }
        Ok(())
    }

    /// Each known column's value must fit its SQL type; null only where the column allows it.
    pub fn check_types(&self, values: &Record) -> Result<(), AppError> {
        for (k, v) in values {
            let Some(c) = self.column(k) else { continue };
            let ok = match (v, c.sql_type) {
                (Value::Null, _) => c.nullable,
                (_, SqlType::Json) => true,
                (Value::Number(n), SqlType::BigInt) => n.is_i64(),
                (Value::Number(n), SqlType::Int) => n.as_i64().is_some_and(|n| i32::try_from(n).is_ok()),
                (Value::String(_), SqlType::Varchar(_) | SqlType::Text | SqlType::DateTime) => true,
                _ => false,
            };
            if !ok {
                return Err(AppError::BadRequest(format!(
                    "{}.{} expects {}, got {}",
                    self.name,
                    c.name,
                    c.sql_type.ddl(),
                    v
                )));
            }
        }
        Ok(())
    }

    /// Requested field names, all of which must be columns.
    pub fn check_fields(&self, fields: &[String]) -> Result<(), AppError> {
        match fields.iter().find(|f| !self.has_column(f)) {
            Some(bad) => Err(AppError::BadRequest(format!("{} has no field '{}'", self.name, bad))),
            None => Ok(()),
        }
    }
}

/// A model stored in exactly one table. Conversion goes through JSON so the same
/// record shape serves the SQL and in-memory DAOs and the HTTP layer.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static TableDef;

    fn id(&self) -> Option<Id>;

    /// Field rules applied on create and update.
    fn rules() -> Vec<(&'static str, ValidationRule)> {
        Vec::new()
    }

    /// Non-null fields only; absent columns take their DB default.
    fn to_record(&self) -> Result<Record, AppError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
            _ => Err(AppError::BadRequest(format!("{} must serialize to an object", Self::TABLE.name))),
        }
    }

    fn from_record(record: Record) -> Result<Self, AppError> {
        Ok(serde_json::from_value(Value::Object(record))?)
    }
}

/// Every table carries these two in addition to its own columns.
pub(crate) const ID: ColumnDef = ColumnDef::defaulted("id", SqlType::BigInt, ColumnDefault::AutoIncrement);
pub(crate) const CREATED_AT: ColumnDef = ColumnDef::defaulted("created_at", SqlType::DateTime, ColumnDefault::Now);

/// All tables, in foreign-key order for DDL.
pub fn all_tables() -> [&'static TableDef; 6] {
    [
        User::TABLE,
        Integration::TABLE,
        IntegrationMember::TABLE,
        Email::TABLE,
        Transaction::TABLE,
        TransactionItem::TABLE,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_record_drops_nulls_and_from_record_restores_defaults() {
        let mut member = IntegrationMember::default();
        member.set_integration_id(3);
        member.set_role(IntegrationMemberRole::Expert);
        let rec = member.to_record().unwrap();
        assert_eq!(rec.get("integration_id"), Some(&json!(3)));
        assert_eq!(rec.get("role"), Some(&json!("EXPERT")));
        assert!(!rec.contains_key("user_id"));
        assert!(!rec.contains_key("id"));

        let back = IntegrationMember::from_record(rec).unwrap();
        assert_eq!(back.get_user_id(), None);
        assert_eq!(back.get_status(), MemberStatus::Enabled);
    }

    #[test]
    fn insertable_and_updatable_filter_columns() {
        let rec: Record = serde_json::from_value(json!({
            "id": null, "integration_id": 1, "status": null, "role": "ADMIN", "nope": 1
        }))
        .unwrap();
        let table = IntegrationMember::TABLE;
        let ins = table.insertable(&rec);
        assert_eq!(ins.keys().collect::<Vec<_>>(), vec!["integration_id", "role"]);

        let upd = table.updatable(&serde_json::from_value(json!({"id": 9, "role": "OWNER"})).unwrap());
        assert_eq!(upd.keys().collect::<Vec<_>>(), vec!["role"]);
    }

    #[test]
    fn required_columns_are_enforced() {
        let table = Integration::TABLE;
        let rec: Record = serde_json::from_value(json!({"title": "acme"})).unwrap();
        let err = table.check_required(&rec).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "integration.secret is required"));
        assert!(table.check_fields(&["title".into(), "secret".into()]).is_ok());
        assert!(table.check_fields(&["password".into()]).is_err());
    }

    #[test]
    fn values_must_fit_the_column_type() {
        let table = IntegrationMember::TABLE;
        let ok: Record = serde_json::from_value(json!({"user_id": null, "revenue_share": 20, "role": "EXPERT"})).unwrap();
        assert!(table.check_types(&ok).is_ok());
        for bad in [
            json!({"user_id": "abc"}),
            json!({"integration_id": null}),
            json!({"revenue_share": 1.5}),
            json!({"revenue_share": 3_000_000_000_i64}),
            json!({"role": 3}),
        ] {
            let rec: Record = serde_json::from_value(bad.clone()).unwrap();
            assert!(matches!(table.check_types(&rec), Err(AppError::BadRequest(_))), "{}", bad);
        }
    }

    #[test]
    fn every_table_has_an_id_column() {
        for table in all_tables() {
            assert!(table.has_column(table.id_column), "{}", table.name);
        }
    }
}
