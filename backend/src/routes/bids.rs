//! Bid route definitions

use axum::{routing::get, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn bid_routes() -> Router<AppState> {
    Router::new()
        .route("/api/bids", get(list_bids))
        .route("/api/bids/:id", get(get_bid))
        .route("/api/snapshot", get(get_snapshot))
}
