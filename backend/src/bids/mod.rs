//! Bid domain module
//!
//! Contains the bid models and the event-driven ledger projection.

mod ledger;
mod model;

pub use ledger::{BidLedger, LedgerError, SharedLedger};
pub use model::*;
