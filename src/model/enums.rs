use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationMemberRole {
    Owner,
    Admin,
    #[default]
    Expert,
}

impl IntegrationMemberRole {
    pub const ALL: [IntegrationMemberRole; 3] = [Self::Owner, Self::Admin, Self::Expert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Expert => "EXPERT",
        }
    }
}

impl fmt::Display for IntegrationMemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationMemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role '{}'", s))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

/// `flag=` query values that expand referenced rows into a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiFlag {
    IncludeUser,
}

impl ApiFlag {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "include_user" => Some(ApiFlag::IncludeUser),
            _ => None,
        }
    }

    /// Response key the expanded row lands under ("include_user" -> "user").
    pub fn key(&self) -> &'static str {
        match self {
            ApiFlag::IncludeUser => "user",
        }
    }
}
