use soroban_sdk::contracterror;

/// Failure codes returned by every BidQueue entry point.
///
/// Codes are part of the contract interface: clients and the indexer match on
/// the numeric value, so existing discriminants must never be renumbered.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidBid = 3,
    NotSubmitter = 4,
    BidInactive = 5,
    LockupNotElapsed = 6,
    NotFullMember = 7,
    InvalidAmount = 8,
    TransferFailed = 9,
}
