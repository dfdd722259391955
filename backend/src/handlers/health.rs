use axum::{extract::State, Json};
use serde::Serialize;

use crate::bids::SharedLedger;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub last_ledger: u64,
    pub version: String,
}

/// Reports `syncing` until the first ledger has been indexed.
pub async fn health_check(State(ledger): State<SharedLedger>) -> Json<HealthResponse> {
    let last_ledger = ledger.read().await.last_ledger();
    let status = if last_ledger > 0 { "healthy" } else { "syncing" };

    Json(HealthResponse {
        status: status.to_string(),
        last_ledger,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
