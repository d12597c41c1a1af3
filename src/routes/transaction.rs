//! Transaction routes.

use crate::handlers::transaction as h;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn transaction_routes(state: AppState) -> Router {
    Router::new()
        .route("/transactions", put(h::create))
        .route(
            "/transactions/:transaction_id",
            get(h::read).post(h::update).delete(h::delete),
        )
        .route("/transactions/:transaction_id/items", put(h::add_item))
        .route(
            "/transactions/:transaction_id/items/:item_id",
            post(h::update_item).delete(h::remove_item),
        )
        .with_state(state)
}
