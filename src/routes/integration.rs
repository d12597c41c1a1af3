//! Integration owner routes.

use crate::access::{allow, AccessRule};
use crate::handlers::integration as h;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn integration_routes(state: AppState) -> Router {
    let access = &state.access.clone();
    Router::new()
        .route(
            "/integrations/:integration_id",
            allow(access, AccessRule::Owner, get(h::read)),
        )
        .route(
            "/integrations/:integration_id/secret",
            allow(access, AccessRule::Owner, post(h::reset_secret)),
        )
        .route(
            "/integrations/:integration_id/members",
            allow(access, AccessRule::Owner, put(h::add_member))
                .merge(allow(access, AccessRule::Admin, get(h::list_members))),
        )
        .route(
            "/integrations/:integration_id/members/:member_id",
            allow(access, AccessRule::Admin, post(h::update_member).merge(delete(h::remove_member))),
        )
        .route(
            "/integrations/:integration_id/activity",
            allow(access, AccessRule::Admin, get(h::activity)),
        )
        .with_state(state)
}
