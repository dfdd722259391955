//! API handlers for the bid indexer

pub mod bids;
mod health;

pub use bids::{get_bid, get_snapshot, list_bids};
pub use health::{health_check, HealthResponse};
