use serde::{Deserialize, Serialize};

/// Soroban RPC getEvents response
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEventsResponse {
    pub events: Vec<SorobanEvent>,
    pub latest_ledger: u64,
    /// Cursor past the last scanned ledger, returned by newer RPC versions
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Raw Soroban event from RPC
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SorobanEvent {
    /// Paging token/cursor
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub ledger: u64,
    pub ledger_closed_at: String,
    pub contract_id: String,
    /// XDR (base64) encoded ScVal topics
    pub topic: Vec<String>,
    /// XDR (base64) encoded ScVal payload
    pub value: String,
    #[serde(default)]
    pub in_successful_contract_call: Option<bool>,
}
