//! Identify the caller from headers set by the fronting gateway.

use crate::model::{Id, IntegrationMemberRole};
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const ROLE_HEADER: &str = "x-coral-role";
pub const USER_ID_HEADER: &str = "x-coral-user-id";

/// Role and user id as asserted by the gateway; unparseable values count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Caller {
    pub role: Option<IntegrationMemberRole>,
    pub user_id: Option<Id>,
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller {
            role: header(parts, ROLE_HEADER).and_then(|s| s.parse().ok()),
            user_id: header(parts, USER_ID_HEADER).and_then(|s| s.parse().ok()),
        })
    }
}
