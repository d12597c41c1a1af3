//! Expert routes, mounted under both /expert and /experts.

use crate::access::{allow, AccessRule};
use crate::handlers::expert;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn expert_routes(state: AppState) -> Router {
    let access = &state.access.clone();
    let mut router = Router::new();
    for base in ["/expert", "/experts"] {
        router = router
            .route(
                base,
                allow(access, AccessRule::Dashboard, get(expert::search))
                    .merge(allow(access, AccessRule::Dashboard, put(expert::create))),
            )
            .route(
                &format!("{}/:expert_id", base),
                get(expert::read)
                    .merge(allow(access, AccessRule::Dashboard, post(expert::update)))
                    .merge(allow(access, AccessRule::Admin, delete(expert::delete))),
            )
            .route(
                &format!("{}/:expert_id/activity", base),
                allow(access, AccessRule::Expert, get(expert::activity)),
            );
    }
    router.with_state(state)
}
