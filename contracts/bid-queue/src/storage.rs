//! Storage layout for the queue.
//!
//! Configuration and the id counter sit in instance storage and share the
//! contract's lifetime. Each bid is its own persistent entry keyed by
//! `("bid", id)` so a single bid can be read or bumped without loading the rest.

use soroban_sdk::{symbol_short, Env, Symbol};

use crate::{Bid, Error, QueueConfig};

const CONFIG: Symbol = symbol_short!("config");
const NEXT_ID: Symbol = symbol_short!("next_id");
const BID: Symbol = symbol_short!("bid");

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
const BID_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const BID_LIFETIME_THRESHOLD: u32 = BID_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&CONFIG)
}

pub fn write_config(env: &Env, config: &QueueConfig) {
    env.storage().instance().set(&CONFIG, config);
    env.storage().instance().set(&NEXT_ID, &0u64);
    bump_instance(env);
}

pub fn read_config(env: &Env) -> Result<QueueConfig, Error> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(Error::NotInitialized)
}

pub fn next_bid_id(env: &Env) -> u64 {
    env.storage().instance().get(&NEXT_ID).unwrap_or(0)
}

/// Reserves the next id and advances the counter.
pub fn take_bid_id(env: &Env) -> u64 {
    let bid_id = next_bid_id(env);
    env.storage().instance().set(&NEXT_ID, &(bid_id + 1));
    bid_id
}

/// Loads a bid, treating any id at or past the counter as nonexistent.
pub fn read_bid(env: &Env, bid_id: u64) -> Result<Bid, Error> {
    if bid_id >= next_bid_id(env) {
        return Err(Error::InvalidBid);
    }
    env.storage()
        .persistent()
        .get(&(BID, bid_id))
        .ok_or(Error::InvalidBid)
}

pub fn write_bid(env: &Env, bid: &Bid) {
    let key = (BID, bid.id);
    env.storage().persistent().set(&key, bid);
    env.storage()
        .persistent()
        .extend_ttl(&key, BID_LIFETIME_THRESHOLD, BID_BUMP_AMOUNT);
    bump_instance(env);
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}
