//! Domain events. Topic is a single short symbol; the data tuple's field order
//! is consumed positionally by off-chain indexers.

use soroban_sdk::{symbol_short, Address, Bytes, Env, Symbol};

use crate::QueueConfig;

pub const EVT_INIT: Symbol = symbol_short!("bq_init");
pub const EVT_NEW_BID: Symbol = symbol_short!("new_bid");
pub const EVT_INCREASED: Symbol = symbol_short!("bid_inc");
pub const EVT_WITHDRAWN: Symbol = symbol_short!("bid_wdrw");
pub const EVT_CANCELED: Symbol = symbol_short!("bid_cncl");
pub const EVT_ACCEPTED: Symbol = symbol_short!("bid_acpt");

pub fn initialized(env: &Env, config: &QueueConfig) {
    env.events().publish(
        (EVT_INIT,),
        (
            config.token.clone(),
            config.membership.clone(),
            config.destination.clone(),
            config.lockup_duration,
            config.min_membership_weight,
        ),
    );
}

pub fn new_bid(env: &Env, amount: i128, submitter: &Address, bid_id: u64, details: &Bytes) {
    env.events().publish(
        (EVT_NEW_BID,),
        (amount, submitter.clone(), bid_id, details.clone()),
    );
}

pub fn bid_increased(env: &Env, new_amount: i128, bid_id: u64) {
    env.events().publish((EVT_INCREASED,), (new_amount, bid_id));
}

pub fn bid_withdrawn(env: &Env, new_amount: i128, bid_id: u64) {
    env.events().publish((EVT_WITHDRAWN,), (new_amount, bid_id));
}

pub fn bid_canceled(env: &Env, bid_id: u64) {
    env.events().publish((EVT_CANCELED,), (bid_id,));
}

pub fn bid_accepted(env: &Env, accepter: &Address, bid_id: u64) {
    env.events()
        .publish((EVT_ACCEPTED,), (accepter.clone(), bid_id));
}
