//! Route registrants, one per resource, and the assembled application.

mod common;
mod expert;
mod integration;
mod transaction;

pub use common::common_routes;
pub use expert::expert_routes;
pub use integration::integration_routes;
pub use transaction::transaction_routes;

use crate::config::Config;
use crate::state::AppState;
use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Every resource router merged, with body limit and request tracing.
pub fn app(state: AppState, config: &Config) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(expert_routes(state.clone()))
        .merge(integration_routes(state.clone()))
        .merge(transaction_routes(state))
        .layer(RequestBodyLimitLayer::new(config.body_limit))
        .layer(TraceLayer::new_for_http())
}
