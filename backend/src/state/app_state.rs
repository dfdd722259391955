//! Application state shared across handlers

use axum::extract::FromRef;

use crate::bids::SharedLedger;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ledger: SharedLedger,
}

impl AppState {
    pub fn new(ledger: SharedLedger) -> Self {
        Self { ledger }
    }
}

impl FromRef<AppState> for SharedLedger {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ledger.clone()
    }
}
