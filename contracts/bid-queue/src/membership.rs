//! Client side of the external membership registry.

use soroban_sdk::{contractclient, Address, Env};

/// The only registry call the queue depends on.
#[contractclient(name = "MembershipClient")]
pub trait Membership {
    /// Voting shares held by `account`.
    fn shares_of(env: Env, account: Address) -> i128;
}
