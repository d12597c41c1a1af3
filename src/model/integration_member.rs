use super::{ColumnDef, ColumnDefault, Entity, Id, IntegrationMemberRole, MemberStatus, SqlType, TableDef, CREATED_AT, ID};
use chrono::NaiveDateTime;
use crate::validation::ValidationRule;
use serde::{Deserialize, Serialize};

/// A user's role within one integration. Experts are members with role EXPERT.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationMember {
    id: Option<Id>,
    integration_id: Id,
    user_id: Option<Id>,
    role: IntegrationMemberRole,
    status: MemberStatus,
    /// Percentage of call revenue paid to the member.
    revenue_share: Option<i32>,
    created_at: Option<NaiveDateTime>,
}

impl IntegrationMember {
    pub fn new(integration_id: Id, user_id: Option<Id>, role: IntegrationMemberRole) -> Self {
        IntegrationMember { integration_id, user_id, role, ..Default::default() }
    }

    pub fn get_id(&self) -> Option<Id> { self.id }
    pub fn get_integration_id(&self) -> Id { self.integration_id }
    pub fn get_user_id(&self) -> Option<Id> { self.user_id }
    pub fn get_role(&self) -> IntegrationMemberRole { self.role }
    pub fn get_status(&self) -> MemberStatus { self.status }
    pub fn get_revenue_share(&self) -> Option<i32> { self.revenue_share }
    pub fn get_created_at(&self) -> Option<NaiveDateTime> { self.created_at }

    pub fn set_integration_id(&mut self, val: Id) { self.integration_id = val; }
    pub fn set_user_id(&mut self, val: Option<Id>) { self.user_id = val; }
    pub fn set_role(&mut self, val: IntegrationMemberRole) { self.role = val; }
    pub fn set_status(&mut self, val: MemberStatus) { self.status = val; }
    pub fn set_revenue_share(&mut self, val: Option<i32>) { self.revenue_share = val; }
}

const TABLE_DEF: TableDef = TableDef {
    name: "integration_member",
    id_column: "id",
    columns: &[
        ID,
        ColumnDef::required("integration_id", SqlType::BigInt),
        ColumnDef::optional("user_id", SqlType::BigInt),
        ColumnDef::required("role", SqlType::Varchar(16)),
        ColumnDef::defaulted("status", SqlType::Varchar(16), ColumnDefault::Text("ENABLED")),
        ColumnDef::optional("revenue_share", SqlType::Int),
        CREATED_AT,
    ],
};

impl Entity for IntegrationMember {
    const TABLE: &'static TableDef = &TABLE_DEF;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn rules() -> Vec<(&'static str, ValidationRule)> {
        vec![
            ("role", ValidationRule { allowed: Some(&["OWNER", "ADMIN", "EXPERT"]), ..Default::default() }),
            ("status", ValidationRule { allowed: Some(&["ENABLED", "DISABLED"]), ..Default::default() }),
            (
                "revenue_share",
                ValidationRule { minimum: Some(0.0), maximum: Some(100.0), ..Default::default() },
            ),
        ]
    }
}
