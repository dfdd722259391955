//! In-memory projection of the queue's bid mapping
//!
//! Events are applied in chain order and re-checked against the queue's state
//! machine, so a gap or a replay shows up as a [`LedgerError`] instead of
//! silently corrupting the projection. A rejected event leaves the ledger
//! untouched.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use super::model::{BidEvent, BidRecord, BidStatus, LedgerSnapshot};

/// Ledger shared between the indexer task and HTTP handlers
pub type SharedLedger = Arc<RwLock<BidLedger>>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Bid {got} arrived out of order, expected {expected}")]
    OutOfOrder { expected: u64, got: u64 },

    #[error("Event {event} references unknown bid {bid_id}")]
    UnknownBid { event: &'static str, bid_id: u64 },

    #[error("Event {event} on closed bid {bid_id}")]
    BidInactive { event: &'static str, bid_id: u64 },

    #[error("Event {event} reports amount {reported} for bid {bid_id} holding {current}")]
    AmountMismatch {
        event: &'static str,
        bid_id: u64,
        current: i128,
        reported: i128,
    },
}

#[derive(Debug, Default)]
pub struct BidLedger {
    next_bid_id: u64,
    bids: BTreeMap<u64, BidRecord>,
    cursor: String,
    last_ledger: u64,
}

impl BidLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedLedger {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Apply one decoded event observed in `ledger`, closed at `closed_at`.
    pub fn apply(
        &mut self,
        event: &BidEvent,
        ledger: u64,
        closed_at: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        match event {
            BidEvent::NewBid {
                amount,
                submitter,
                bid_id,
                details,
            } => {
                if *bid_id != self.next_bid_id {
                    return Err(LedgerError::OutOfOrder {
                        expected: self.next_bid_id,
                        got: *bid_id,
                    });
                }

                self.bids.insert(
                    *bid_id,
                    BidRecord {
                        bid_id: *bid_id,
                        amount: *amount,
                        submitter: submitter.clone(),
                        details: details.clone(),
                        status: BidStatus::Active,
                        created_ledger: ledger,
                        created_at: closed_at,
                        accepted_by: None,
                        settled_amount: None,
                        updated_at: closed_at,
                    },
                );
                self.next_bid_id += 1;
            }
            BidEvent::Increased { new_amount, bid_id } => {
                let bid = self.active_bid_mut(event)?;
                if *new_amount < bid.amount {
                    return Err(mismatch(event, *bid_id, bid.amount, *new_amount));
                }
                bid.amount = *new_amount;
                bid.updated_at = closed_at;
            }
            BidEvent::Withdrawn { new_amount, bid_id } => {
                let bid = self.active_bid_mut(event)?;
                if *new_amount > bid.amount || *new_amount < 0 {
                    return Err(mismatch(event, *bid_id, bid.amount, *new_amount));
                }
                bid.amount = *new_amount;
                bid.updated_at = closed_at;
            }
            BidEvent::Canceled { .. } => {
                let bid = self.active_bid_mut(event)?;
                bid.settled_amount = Some(bid.amount);
                bid.amount = 0;
                bid.status = BidStatus::Canceled;
                bid.updated_at = closed_at;
            }
            BidEvent::Accepted { accepter, .. } => {
                let bid = self.active_bid_mut(event)?;
                bid.settled_amount = Some(bid.amount);
                bid.amount = 0;
                bid.status = BidStatus::Accepted;
                bid.accepted_by = Some(accepter.clone());
                bid.updated_at = closed_at;
            }
        }

        self.last_ledger = self.last_ledger.max(ledger);
        Ok(())
    }

    fn active_bid_mut(&mut self, event: &BidEvent) -> Result<&mut BidRecord, LedgerError> {
        let bid_id = event.bid_id();
        let bid = self.bids.get_mut(&bid_id).ok_or(LedgerError::UnknownBid {
            event: event.name(),
            bid_id,
        })?;

        if bid.status.is_terminal() {
            return Err(LedgerError::BidInactive {
                event: event.name(),
                bid_id,
            });
        }
        Ok(bid)
    }

    pub fn get(&self, bid_id: u64) -> Option<&BidRecord> {
        self.bids.get(&bid_id)
    }

    /// Bids matching `status`, ordered by id. `page` is 1-based.
    pub fn list(&self, status: Option<BidStatus>, page: u32, limit: u32) -> Vec<BidRecord> {
        let skip = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
        self.matching(status)
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect()
    }

    pub fn count(&self, status: Option<BidStatus>) -> usize {
        self.matching(status).count()
    }

    fn matching(&self, status: Option<BidStatus>) -> impl Iterator<Item = &BidRecord> {
        self.bids
            .values()
            .filter(move |bid| status.map_or(true, |s| bid.status == s))
    }

    /// Sum escrowed across active bids; equals the queue's token custody.
    pub fn total_escrowed(&self) -> i128 {
        self.matching(Some(BidStatus::Active))
            .map(|bid| bid.amount)
            .sum()
    }

    pub fn next_bid_id(&self) -> u64 {
        self.next_bid_id
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    pub fn last_ledger(&self) -> u64 {
        self.last_ledger
    }

    /// Record RPC progress. The ledger number never moves backwards here; a
    /// network reset goes through [`BidLedger::reset`].
    pub fn advance(&mut self, cursor: &str, ledger: u64) {
        self.cursor = cursor.to_string();
        self.last_ledger = self.last_ledger.max(ledger);
    }

    /// Drop everything and re-index from scratch.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            next_bid_id: self.next_bid_id,
            active_bids: self.count(Some(BidStatus::Active)),
            total_escrowed: self.total_escrowed(),
            last_ledger: self.last_ledger,
            cursor: self.cursor.clone(),
            bids: self.bids.values().cloned().collect(),
        }
    }
}

fn mismatch(event: &BidEvent, bid_id: u64, current: i128, reported: i128) -> LedgerError {
    LedgerError::AmountMismatch {
        event: event.name(),
        bid_id,
        current,
        reported,
    }
}
