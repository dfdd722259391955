//! Route definitions for the bid indexer API

mod bids;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::handlers::health_check;
use crate::middleware;
use crate::state::AppState;

pub use bids::bid_routes;

/// Full application router with tracing and CORS layers applied.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(bid_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(cors)
}
