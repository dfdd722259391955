//! Bid Queue Contract
//!
//! An escrow queue where anyone can lock tokens behind a bid for some resource
//! or privilege, and members of an external registry holding enough shares can
//! accept a bid, settling its funds to a fixed destination.
//!
//! Bid lifecycle:
//! - `Active` on submission; the submitter may top it up at any time and may
//!   withdraw from it or cancel it once the lock-up window has passed
//! - `Accepted` when a registry member settles it to the destination
//! - `Canceled` when the submitter takes the whole balance back
//!
//! Both end states are terminal.

#![no_std]

mod error;
mod events;
mod membership;
mod storage;

use soroban_sdk::{contract, contractimpl, contracttype, log, token, Address, Bytes, Env, Vec};

pub use error::Error;
pub use membership::{Membership, MembershipClient};

/// Upper bound on a single `get_bids` page.
pub const MAX_PAGE_SIZE: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BidStatus {
    Active = 0,
    Accepted = 1,
    Canceled = 2,
}

/// A token-backed bid held in escrow by the queue.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bid {
    pub id: u64,
    /// Tokens currently escrowed. Zero once the bid is accepted or canceled.
    pub amount: i128,
    pub submitter: Address,
    /// Opaque description of what is being bid for.
    pub details: Bytes,
    pub created_at: u64,
    pub status: BidStatus,
}

/// Queue parameters, fixed by `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueueConfig {
    pub token: Address,
    /// Registry queried for the accepter's shares.
    pub membership: Address,
    /// Receives the escrowed balance of an accepted bid.
    pub destination: Address,
    /// Seconds after submission before the submitter may withdraw or cancel.
    pub lockup_duration: u64,
    pub min_membership_weight: i128,
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct BidQueue;

#[contractimpl]
impl BidQueue {
    /// Configure the queue. Callable once; the configuration never changes
    /// afterwards.
    pub fn init(
        env: Env,
        token: Address,
        membership: Address,
        destination: Address,
        lockup_duration: u64,
        min_membership_weight: i128,
    ) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        let config = QueueConfig {
            token,
            membership,
            destination,
            lockup_duration,
            min_membership_weight,
        };
        storage::write_config(&env, &config);

        events::initialized(&env, &config);

        Ok(())
    }

    /// Escrow `amount` tokens from `submitter` behind a new bid.
    ///
    /// Returns the id of the new bid.
    pub fn submit_bid(
        env: Env,
        submitter: Address,
        amount: i128,
        details: Bytes,
    ) -> Result<u64, Error> {
        let config = storage::read_config(&env)?;
        submitter.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        transfer(
            &env,
            &config.token,
            &submitter,
            &env.current_contract_address(),
            amount,
        )?;

        let bid_id = storage::take_bid_id(&env);
        let bid = Bid {
            id: bid_id,
            amount,
            submitter: submitter.clone(),
            details: details.clone(),
            created_at: env.ledger().timestamp(),
            status: BidStatus::Active,
        };
        storage::write_bid(&env, &bid);

        log!(&env, "bid submitted", bid_id, amount);
        events::new_bid(&env, amount, &submitter, bid_id, &details);

        Ok(bid_id)
    }

    /// Add `extra_amount` tokens to an active bid owned by `submitter`.
    pub fn increase_bid(
        env: Env,
        submitter: Address,
        extra_amount: i128,
        bid_id: u64,
    ) -> Result<(), Error> {
        let config = storage::read_config(&env)?;
        submitter.require_auth();

        let mut bid = Self::owned_active_bid(&env, &submitter, bid_id)?;

        if extra_amount < 0 {
            return Err(Error::InvalidAmount);
        }
        let new_amount = bid
            .amount
            .checked_add(extra_amount)
            .ok_or(Error::InvalidAmount)?;

        if extra_amount > 0 {
            transfer(
                &env,
                &config.token,
                &submitter,
                &env.current_contract_address(),
                extra_amount,
            )?;
        }

        bid.amount = new_amount;
        storage::write_bid(&env, &bid);

        events::bid_increased(&env, new_amount, bid_id);

        Ok(())
    }

    /// Return part of an active bid's escrow to its submitter once the
    /// lock-up has elapsed. The bid stays active even when drained to zero.
    pub fn withdraw_bid(
        env: Env,
        submitter: Address,
        withdraw_amount: i128,
        bid_id: u64,
    ) -> Result<(), Error> {
        let config = storage::read_config(&env)?;
        submitter.require_auth();

        let mut bid = Self::owned_active_bid(&env, &submitter, bid_id)?;
        Self::ensure_unlocked(&env, &config, &bid)?;

        if withdraw_amount < 0 || withdraw_amount > bid.amount {
            return Err(Error::InvalidAmount);
        }

        bid.amount -= withdraw_amount;
        storage::write_bid(&env, &bid);

        if withdraw_amount > 0 {
            transfer(
                &env,
                &config.token,
                &env.current_contract_address(),
                &bid.submitter,
                withdraw_amount,
            )?;
        }

        events::bid_withdrawn(&env, bid.amount, bid_id);

        Ok(())
    }

    /// Refund the full escrow of an active bid to its submitter once the
    /// lock-up has elapsed, closing the bid.
    pub fn cancel_bid(env: Env, submitter: Address, bid_id: u64) -> Result<(), Error> {
        let config = storage::read_config(&env)?;
        submitter.require_auth();

        let mut bid = Self::owned_active_bid(&env, &submitter, bid_id)?;
        Self::ensure_unlocked(&env, &config, &bid)?;

        let refund = bid.amount;
        bid.amount = 0;
        bid.status = BidStatus::Canceled;
        storage::write_bid(&env, &bid);

        if refund > 0 {
            transfer(
                &env,
                &config.token,
                &env.current_contract_address(),
                &bid.submitter,
                refund,
            )?;
        }

        log!(&env, "bid canceled", bid_id, refund);
        events::bid_canceled(&env, bid_id);

        Ok(())
    }

    /// Settle an active bid to the destination.
    ///
    /// `accepter` must hold at least `min_membership_weight` shares in the
    /// registry. Acceptance ignores the lock-up window.
    pub fn accept_bid(env: Env, accepter: Address, bid_id: u64) -> Result<(), Error> {
        let config = storage::read_config(&env)?;
        accepter.require_auth();

        let mut bid = storage::read_bid(&env, bid_id)?;

        let shares = MembershipClient::new(&env, &config.membership).shares_of(&accepter);
        if shares < config.min_membership_weight {
            return Err(Error::NotFullMember);
        }

        if bid.status != BidStatus::Active {
            return Err(Error::BidInactive);
        }

        let settled = bid.amount;
        bid.amount = 0;
        bid.status = BidStatus::Accepted;
        storage::write_bid(&env, &bid);

        if settled > 0 {
            transfer(
                &env,
                &config.token,
                &env.current_contract_address(),
                &config.destination,
                settled,
            )?;
        }

        log!(&env, "bid accepted", bid_id, settled);
        events::bid_accepted(&env, &accepter, bid_id);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get_bid(env: Env, bid_id: u64) -> Option<Bid> {
        storage::read_bid(&env, bid_id).ok()
    }

    /// Bids with ids in `start..start + limit`, stopping at the newest bid.
    /// `limit` is capped at [`MAX_PAGE_SIZE`].
    pub fn get_bids(env: Env, start: u64, limit: u32) -> Vec<Bid> {
        let end = start
            .saturating_add(limit.min(MAX_PAGE_SIZE) as u64)
            .min(storage::next_bid_id(&env));

        let mut bids = Vec::new(&env);
        for bid_id in start..end {
            if let Ok(bid) = storage::read_bid(&env, bid_id) {
                bids.push_back(bid);
            }
        }
        bids
    }

    /// Id the next submitted bid will receive; also the number of bids so far.
    pub fn next_bid_id(env: Env) -> u64 {
        storage::next_bid_id(&env)
    }

    pub fn get_config(env: Env) -> Result<QueueConfig, Error> {
        storage::read_config(&env)
    }

    /// Ledger timestamp from which the submitter may withdraw or cancel.
    pub fn unlock_time(env: Env, bid_id: u64) -> Result<u64, Error> {
        let config = storage::read_config(&env)?;
        let bid = storage::read_bid(&env, bid_id)?;
        Ok(bid.created_at.saturating_add(config.lockup_duration))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Loads `bid_id` for its submitter. Ownership is checked before status.
    fn owned_active_bid(env: &Env, caller: &Address, bid_id: u64) -> Result<Bid, Error> {
        let bid = storage::read_bid(env, bid_id)?;

        if bid.submitter != *caller {
            return Err(Error::NotSubmitter);
        }
        if bid.status != BidStatus::Active {
            return Err(Error::BidInactive);
        }

        Ok(bid)
    }

    fn ensure_unlocked(env: &Env, config: &QueueConfig, bid: &Bid) -> Result<(), Error> {
        let unlock_at = bid.created_at.saturating_add(config.lockup_duration);
        if env.ledger().timestamp() < unlock_at {
            return Err(Error::LockupNotElapsed);
        }
        Ok(())
    }
}

/// Moves `amount` of `token` between two addresses, mapping any token-side
/// failure to [`Error::TransferFailed`].
fn transfer(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), Error> {
    match token::Client::new(env, token).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

#[cfg(test)]
mod test;
