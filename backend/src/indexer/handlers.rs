use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use stellar_xdr::next::{Limits, ReadXdr, ScVal};
use tracing::{debug, info, warn};

use super::types::SorobanEvent;
use crate::bids::{BidEvent, SharedLedger};

/// Topics published by the queue that change a bid.
const BID_TOPICS: [&str; 5] = ["new_bid", "bid_inc", "bid_wdrw", "bid_cncl", "bid_acpt"];

// Upper bound on a single decoded ScVal
const XDR_LEN_LIMIT: usize = 32_768;

pub struct EventHandler {
    ledger: SharedLedger,
}

impl EventHandler {
    pub fn new(ledger: SharedLedger) -> Self {
        Self { ledger }
    }

    /// Apply a raw RPC event to the ledger.
    ///
    /// Returns `Ok(true)` when the projection changed. Events the ledger
    /// rejects are logged and skipped; undecodable events are errors so the
    /// caller retries from the same cursor.
    pub async fn handle_event(&self, event: &SorobanEvent) -> Result<bool> {
        if event.in_successful_contract_call == Some(false) {
            return Ok(false);
        }

        let Some(bid_event) = decode_event(event)? else {
            return Ok(false);
        };
        let closed_at = parse_closed_at(&event.ledger_closed_at)?;

        let mut ledger = self.ledger.write().await;
        match ledger.apply(&bid_event, event.ledger, closed_at) {
            Ok(()) => {
                info!(
                    event = bid_event.name(),
                    bid_id = bid_event.bid_id(),
                    ledger = event.ledger,
                    "Applied bid event"
                );
                Ok(true)
            }
            Err(err) => {
                warn!(event_id = %event.id, error = %err, "Skipping inconsistent bid event");
                Ok(false)
            }
        }
    }
}

/// Decode a queue event. Unrelated topics (including `bq_init`) yield `None`.
pub fn decode_event(event: &SorobanEvent) -> Result<Option<BidEvent>> {
    let topics = decode_topics(&event.topic)?;

    let name = match topics.first() {
        Some(ScVal::Symbol(s)) => s.to_string(),
        _ => return Ok(None),
    };
    if !BID_TOPICS.contains(&name.as_str()) {
        debug!("Ignoring queue event {}", name);
        return Ok(None);
    }

    let data = decode_scval(&event.value)?;
    let args = match &data {
        ScVal::Vec(Some(args)) => args,
        _ => return Err(anyhow!("Payload of {} is not a tuple", name)),
    };

    let arity = match name.as_str() {
        "new_bid" => 4,
        "bid_cncl" => 1,
        _ => 2,
    };
    if args.len() < arity {
        return Err(anyhow!(
            "Invalid args length for {}: expected {}, got {}",
            name,
            arity,
            args.len()
        ));
    }

    let bid_event = match name.as_str() {
        "new_bid" => BidEvent::NewBid {
            amount: scval_to_i128(&args[0])?,
            submitter: scval_to_address(&args[1])?,
            bid_id: scval_to_u64(&args[2])?,
            details: scval_to_hex(&args[3])?,
        },
        "bid_inc" => BidEvent::Increased {
            new_amount: scval_to_i128(&args[0])?,
            bid_id: scval_to_u64(&args[1])?,
        },
        "bid_wdrw" => BidEvent::Withdrawn {
            new_amount: scval_to_i128(&args[0])?,
            bid_id: scval_to_u64(&args[1])?,
        },
        "bid_cncl" => BidEvent::Canceled {
            bid_id: scval_to_u64(&args[0])?,
        },
        "bid_acpt" => BidEvent::Accepted {
            accepter: scval_to_address(&args[0])?,
            bid_id: scval_to_u64(&args[1])?,
        },
        _ => return Ok(None),
    };

    Ok(Some(bid_event))
}

fn parse_closed_at(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("Invalid ledgerClosedAt: {}", raw))
}

// Helpers
fn decode_topics(topics: &[String]) -> Result<Vec<ScVal>> {
    topics.iter().map(|t| decode_scval(t)).collect()
}

fn decode_scval(encoded: &str) -> Result<ScVal> {
    let bytes = general_purpose::STANDARD.decode(encoded)?;
    Ok(ScVal::from_xdr(&bytes, Limits::len(XDR_LEN_LIMIT))?)
}

fn scval_to_u64(val: &ScVal) -> Result<u64> {
    match val {
        ScVal::U64(v) => Ok(*v),
        ScVal::U32(v) => Ok(*v as u64),
        _ => Err(anyhow!("Expected U64-like")),
    }
}

fn scval_to_i128(val: &ScVal) -> Result<i128> {
    match val {
        ScVal::I128(v) => Ok(i128::from(v.lo) | (i128::from(v.hi) << 64)),
        ScVal::I64(v) => Ok(*v as i128),
        ScVal::U64(v) => Ok(*v as i128),
        _ => Err(anyhow!("Expected I128-like")),
    }
}

fn scval_to_address(val: &ScVal) -> Result<String> {
    match val {
        ScVal::Address(addr) => Ok(addr.to_string()),
        _ => Err(anyhow!("Expected Address")),
    }
}

fn scval_to_hex(val: &ScVal) -> Result<String> {
    match val {
        ScVal::Bytes(bytes) => Ok(hex::encode(bytes.as_slice())),
        _ => Err(anyhow!("Expected Bytes")),
    }
}
