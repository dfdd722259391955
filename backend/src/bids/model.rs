//! Bid models mirrored from the on-chain queue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Lifecycle state of a bid, matching the contract's `BidStatus`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    Active,
    Accepted,
    Canceled,
}

impl BidStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BidStatus::Active)
    }
}

/// Projection of one on-chain bid
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct BidRecord {
    pub bid_id: u64,
    /// Currently escrowed amount, zero once the bid is closed
    #[serde(serialize_with = "serialize_amount")]
    pub amount: i128,
    /// Submitter strkey
    pub submitter: String,
    /// Hex encoded opaque details
    pub details: String,
    pub status: BidStatus,
    pub created_ledger: u64,
    pub created_at: DateTime<Utc>,
    /// Member that accepted the bid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<String>,
    /// Amount paid out when the bid closed (to the destination or as a refund)
    #[serde(
        serialize_with = "serialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub settled_amount: Option<i128>,
    pub updated_at: DateTime<Utc>,
}

/// Decoded queue event, fields in the order the contract publishes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidEvent {
    NewBid {
        amount: i128,
        submitter: String,
        bid_id: u64,
        details: String,
    },
    Increased {
        new_amount: i128,
        bid_id: u64,
    },
    Withdrawn {
        new_amount: i128,
        bid_id: u64,
    },
    Canceled {
        bid_id: u64,
    },
    Accepted {
        accepter: String,
        bid_id: u64,
    },
}

impl BidEvent {
    pub fn bid_id(&self) -> u64 {
        match self {
            BidEvent::NewBid { bid_id, .. }
            | BidEvent::Increased { bid_id, .. }
            | BidEvent::Withdrawn { bid_id, .. }
            | BidEvent::Canceled { bid_id }
            | BidEvent::Accepted { bid_id, .. } => *bid_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BidEvent::NewBid { .. } => "new_bid",
            BidEvent::Increased { .. } => "bid_inc",
            BidEvent::Withdrawn { .. } => "bid_wdrw",
            BidEvent::Canceled { .. } => "bid_cncl",
            BidEvent::Accepted { .. } => "bid_acpt",
        }
    }
}

/// Query parameters for listing bids
#[derive(Debug, Default, Deserialize)]
pub struct ListBidsQuery {
    pub status: Option<BidStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ListBidsResponse {
    pub bids: Vec<BidRecord>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

/// Export of the indexed queue state
#[derive(Debug, Serialize)]
pub struct LedgerSnapshot {
    pub next_bid_id: u64,
    pub active_bids: usize,
    #[serde(serialize_with = "serialize_amount")]
    pub total_escrowed: i128,
    pub last_ledger: u64,
    pub cursor: String,
    pub bids: Vec<BidRecord>,
}

// Token amounts are i128 on chain; strings keep them exact for JSON clients.
fn serialize_amount<S: Serializer>(amount: &i128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&amount.to_string())
}

fn serialize_optional_amount<S: Serializer>(
    amount: &Option<i128>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match amount {
        Some(amount) => serialize_amount(amount, serializer),
        None => serializer.serialize_none(),
    }
}
