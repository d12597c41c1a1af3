//! Route-level access rules. The decision itself is pluggable; routes only declare which rule applies.

use crate::error::AppError;
use crate::extractors::Caller;
use crate::model::IntegrationMemberRole;
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessRule {
    /// Any integration dashboard user (owner or admin).
    Dashboard,
    Admin,
    Owner,
    Expert,
}

pub trait AccessControl: Send + Sync {
    fn allows(&self, rule: AccessRule, caller: &Caller) -> bool;
}

/// No checks; for deployments where the gateway already enforces access.
pub struct AllowAll;

impl AccessControl for AllowAll {
    fn allows(&self, _rule: AccessRule, _caller: &Caller) -> bool {
        true
    }
}

/// Decides from the gateway-asserted role. ADMIN passes every rule, OWNER passes Owner and Dashboard,
/// EXPERT passes Expert only.
pub struct HeaderRoleAccess;

impl AccessControl for HeaderRoleAccess {
    fn allows(&self, rule: AccessRule, caller: &Caller) -> bool {
        use IntegrationMemberRole::*;
        match (caller.role, rule) {
            (Some(Admin), _) => true,
            (Some(Owner), AccessRule::Owner | AccessRule::Dashboard) => true,
            (Some(Expert), AccessRule::Expert) => true,
            _ => false,
        }
    }
}

#[derive(Clone)]
struct Guard {
    access: Arc<dyn AccessControl>,
    rule: AccessRule,
}

async fn guard(State(g): State<Guard>, caller: Caller, req: Request, next: Next) -> Response {
    if g.access.allows(g.rule, &caller) {
        return next.run(req).await;
    }
    tracing::warn!(rule = ?g.rule, role = ?caller.role, path = %req.uri().path(), "access denied");
    AppError::Forbidden("access denied".into()).into_response()
}

/// Wrap one method route so it only runs when `rule` allows the caller.
pub fn allow<S>(access: &Arc<dyn AccessControl>, rule: AccessRule, route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(
        Guard {
            access: Arc::clone(access),
            rule,
        },
        guard,
    ))
}
