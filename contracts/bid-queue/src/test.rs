use super::*;
use soroban_sdk::{
    contract, contractimpl, symbol_short,
    testutils::{Address as _, Events as _, Ledger as _},
    token, Address, Bytes, Env, Symbol, TryFromVal, Val,
};

const LOCKUP: u64 = 3600;
const MIN_WEIGHT: i128 = 100;
const START_TS: u64 = 1_700_000_000;

// -- Mock membership registry ---------------------------------------------

#[contract]
pub struct MockMembership;

#[contractimpl]
impl MockMembership {
    pub fn shares_of(env: Env, account: Address) -> i128 {
        env.storage().persistent().get(&account).unwrap_or(0)
    }

    /// Test helper: assign voting shares to `account`.
    pub fn set_shares(env: Env, account: Address, shares: i128) {
        env.storage().persistent().set(&account, &shares);
    }
}

// -- Helpers --------------------------------------------------------------

struct TestEnv<'a> {
    env: Env,
    queue: BidQueueClient<'a>,
    queue_addr: Address,
    membership: MockMembershipClient<'a>,
    membership_addr: Address,
    token: token::Client<'a>,
    token_addr: Address,
    destination: Address,
    payer: Address,
    other: Address,
    member: Address,
}

fn setup() -> TestEnv<'static> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START_TS);

    let destination = Address::generate(&env);
    let payer = Address::generate(&env);
    let other = Address::generate(&env);
    let member = Address::generate(&env);

    let token_admin = Address::generate(&env);
    let token_contract = env.register_stellar_asset_contract_v2(token_admin);
    let token_addr = token_contract.address();
    let token_admin_client = token::StellarAssetClient::new(&env, &token_addr);
    token_admin_client.mint(&payer, &100);
    token_admin_client.mint(&other, &100);

    let membership_addr = env.register(MockMembership, ());
    let membership = MockMembershipClient::new(&env, &membership_addr);
    membership.set_shares(&member, &MIN_WEIGHT);

    let queue_addr = env.register(BidQueue, ());
    let queue = BidQueueClient::new(&env, &queue_addr);
    queue.init(&token_addr, &membership_addr, &destination, &LOCKUP, &MIN_WEIGHT);

    let token = token::Client::new(&env, &token_addr);

    TestEnv {
        env,
        queue,
        queue_addr,
        membership,
        membership_addr,
        token,
        token_addr,
        destination,
        payer,
        other,
        member,
    }
}

fn details(t: &TestEnv) -> Bytes {
    Bytes::from_slice(&t.env, b"guild membership application")
}

/// The payer escrows 75 of their 100 tokens as bid 0.
fn submit_default_bid(t: &TestEnv) -> u64 {
    t.queue.submit_bid(&t.payer, &75, &details(t))
}

fn pass_lockup(t: &TestEnv) {
    t.env.ledger().with_mut(|li| {
        li.timestamp += LOCKUP;
    });
}

/// Latest event of the most recent top-level invocation. Only that call's
/// events are recorded, so read this before any query or balance check.
fn last_event(t: &TestEnv) -> (Address, soroban_sdk::Vec<Val>, Val) {
    t.env.events().all().last().unwrap()
}

fn assert_topic(t: &TestEnv, topics: &soroban_sdk::Vec<Val>, expected: Symbol) {
    assert_eq!(topics.len(), 1);
    let topic = Symbol::try_from_val(&t.env, &topics.get(0).unwrap()).unwrap();
    assert_eq!(topic, expected);
}

// -- Initialization -------------------------------------------------------

#[test]
fn test_init_stores_config() {
    let t = setup();

    let config = t.queue.get_config();
    assert_eq!(config.token, t.token_addr);
    assert_eq!(config.membership, t.membership_addr);
    assert_eq!(config.destination, t.destination);
    assert_eq!(config.lockup_duration, LOCKUP);
    assert_eq!(config.min_membership_weight, MIN_WEIGHT);
    assert_eq!(t.queue.next_bid_id(), 0);
}

#[test]
fn test_init_twice_fails() {
    let t = setup();
    let dummy = Address::generate(&t.env);

    let result = t.queue.try_init(&dummy, &dummy, &dummy, &0, &0);
    assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));

    // Original configuration survives the rejected call.
    assert_eq!(t.queue.get_config().destination, t.destination);
}

#[test]
#[should_panic(expected = "HostError: Error(Contract, #1)")]
fn test_init_twice_panics_with_code() {
    let t = setup();
    let dummy = Address::generate(&t.env);
    t.queue.init(&dummy, &dummy, &dummy, &0, &0);
}

#[test]
fn test_uninitialized_queue_rejects_calls() {
    let env = Env::default();
    env.mock_all_auths();
    let queue_addr = env.register(BidQueue, ());
    let queue = BidQueueClient::new(&env, &queue_addr);
    let payer = Address::generate(&env);

    assert_eq!(queue.try_get_config(), Err(Ok(Error::NotInitialized)));
    assert_eq!(
        queue.try_submit_bid(&payer, &10, &Bytes::new(&env)),
        Err(Ok(Error::NotInitialized))
    );
    assert_eq!(queue.try_accept_bid(&payer, &0), Err(Ok(Error::NotInitialized)));
    assert_eq!(queue.next_bid_id(), 0);
}

#[test]
fn test_init_emits_event() {
    let t = setup();
    let dummy = Address::generate(&t.env);
    // Re-run init on a fresh queue so the init event is the latest one.
    let queue_addr = t.env.register(BidQueue, ());
    let queue = BidQueueClient::new(&t.env, &queue_addr);
    queue.init(&t.token_addr, &t.membership_addr, &dummy, &10, &5);

    let (contract, topics, data) = last_event(&t);
    assert_eq!(contract, queue_addr);
    assert_topic(&t, &topics, symbol_short!("bq_init"));
    let data = <(Address, Address, Address, u64, i128)>::try_from_val(&t.env, &data).unwrap();
    assert_eq!(data, (t.token_addr.clone(), t.membership_addr.clone(), dummy, 10, 5));
}

// -- Submission -----------------------------------------------------------

#[test]
fn test_submit_bid_escrows_funds() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    assert_eq!(bid_id, 0);
    assert_eq!(t.queue.next_bid_id(), 1);
    assert_eq!(t.token.balance(&t.payer), 25);
    assert_eq!(t.token.balance(&t.queue_addr), 75);

    let bid = t.queue.get_bid(&bid_id).unwrap();
    assert_eq!(bid.id, 0);
    assert_eq!(bid.amount, 75);
    assert_eq!(bid.submitter, t.payer);
    assert_eq!(bid.details, details(&t));
    assert_eq!(bid.created_at, START_TS);
    assert_eq!(bid.status, BidStatus::Active);
}

#[test]
fn test_submit_bid_emits_new_bid() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    let (contract, topics, data) = last_event(&t);
    assert_eq!(contract, t.queue_addr);
    assert_topic(&t, &topics, symbol_short!("new_bid"));
    let data = <(i128, Address, u64, Bytes)>::try_from_val(&t.env, &data).unwrap();
    assert_eq!(data, (75, t.payer.clone(), bid_id, details(&t)));
}

#[test]
fn test_submit_bids_get_sequential_ids() {
    let t = setup();
    let first = t.queue.submit_bid(&t.payer, &10, &details(&t));
    let second = t.queue.submit_bid(&t.other, &20, &details(&t));
    let third = t.queue.submit_bid(&t.payer, &30, &details(&t));

    assert_eq!((first, second, third), (0, 1, 2));
    assert_eq!(t.queue.next_bid_id(), 3);
    assert_eq!(t.queue.get_bid(&second).unwrap().submitter, t.other);
    assert_eq!(t.token.balance(&t.queue_addr), 60);
}

#[test]
fn test_submit_zero_amount_rejected() {
    let t = setup();
    assert_eq!(
        t.queue.try_submit_bid(&t.payer, &0, &details(&t)),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(
        t.queue.try_submit_bid(&t.payer, &-5, &details(&t)),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(t.queue.next_bid_id(), 0);
}

#[test]
fn test_submit_beyond_balance_fails_without_state_change() {
    let t = setup();
    let result = t.queue.try_submit_bid(&t.payer, &101, &details(&t));

    assert_eq!(result, Err(Ok(Error::TransferFailed)));
    assert_eq!(t.queue.next_bid_id(), 0);
    assert!(t.queue.get_bid(&0).is_none());
    assert_eq!(t.token.balance(&t.payer), 100);
    assert_eq!(t.token.balance(&t.queue_addr), 0);
}

#[test]
#[should_panic]
fn test_submit_requires_submitter_auth() {
    let t = setup();
    t.env.set_auths(&[]);
    submit_default_bid(&t);
}

// -- Increase -------------------------------------------------------------

#[test]
fn test_increase_bid() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    t.queue.increase_bid(&t.payer, &20, &bid_id);

    let (contract, topics, data) = last_event(&t);
    assert_eq!(contract, t.queue_addr);
    assert_topic(&t, &topics, symbol_short!("bid_inc"));
    let data = <(i128, u64)>::try_from_val(&t.env, &data).unwrap();
    assert_eq!(data, (95, bid_id));

    assert_eq!(t.queue.get_bid(&bid_id).unwrap().amount, 95);
    assert_eq!(t.token.balance(&t.payer), 5);
    assert_eq!(t.token.balance(&t.queue_addr), 95);
}

#[test]
fn test_increase_bid_not_submitter() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    assert_eq!(
        t.queue.try_increase_bid(&t.other, &20, &bid_id),
        Err(Ok(Error::NotSubmitter))
    );
    assert_eq!(t.queue.get_bid(&bid_id).unwrap().amount, 75);
}

#[test]
fn test_increase_nonexistent_bid() {
    let t = setup();
    submit_default_bid(&t);

    assert_eq!(
        t.queue.try_increase_bid(&t.payer, &20, &1),
        Err(Ok(Error::InvalidBid))
    );
}

#[test]
fn test_increase_bid_negative_amount() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    assert_eq!(
        t.queue.try_increase_bid(&t.payer, &-1, &bid_id),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(t.queue.get_bid(&bid_id).unwrap().amount, 75);
}

#[test]
fn test_increase_bid_by_zero() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    t.queue.increase_bid(&t.payer, &0, &bid_id);

    let (_, topics, data) = last_event(&t);
    assert_topic(&t, &topics, symbol_short!("bid_inc"));
    let data = <(i128, u64)>::try_from_val(&t.env, &data).unwrap();
    assert_eq!(data, (75, bid_id));

    assert_eq!(t.queue.get_bid(&bid_id).unwrap().amount, 75);
    assert_eq!(t.token.balance(&t.payer), 25);
    assert_eq!(t.token.balance(&t.queue_addr), 75);
}

#[test]
fn test_increase_bid_overflow() {
    let t = setup();
    // Payer now holds i128::MAX in total.
    token::StellarAssetClient::new(&t.env, &t.token_addr).mint(&t.payer, &(i128::MAX - 100));
    let bid_id = submit_default_bid(&t);

    assert_eq!(
        t.queue.try_increase_bid(&t.payer, &(i128::MAX - 74), &bid_id),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(t.queue.get_bid(&bid_id).unwrap().amount, 75);
    assert_eq!(t.token.balance(&t.payer), i128::MAX - 75);
    assert_eq!(t.token.balance(&t.queue_addr), 75);
}

#[test]
fn test_increase_bid_beyond_balance() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    assert_eq!(
        t.queue.try_increase_bid(&t.payer, &26, &bid_id),
        Err(Ok(Error::TransferFailed))
    );
    assert_eq!(t.queue.get_bid(&bid_id).unwrap().amount, 75);
    assert_eq!(t.token.balance(&t.payer), 25);
}

#[test]
fn test_increase_checks_bid_before_ownership() {
    let t = setup();
    submit_default_bid(&t);

    // Non-owner on a missing id still reports the missing id first.
    assert_eq!(
        t.queue.try_increase_bid(&t.other, &20, &7),
        Err(Ok(Error::InvalidBid))
    );
}

// -- Withdraw -------------------------------------------------------------

#[test]
fn test_withdraw_before_lockup_fails() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    assert_eq!(
        t.queue.try_withdraw_bid(&t.payer, &25, &bid_id),
        Err(Ok(Error::LockupNotElapsed))
    );

    // One second short of the window is still locked.
    t.env.ledger().with_mut(|li| {
        li.timestamp += LOCKUP - 1;
    });
    assert_eq!(
        t.queue.try_withdraw_bid(&t.payer, &25, &bid_id),
        Err(Ok(Error::LockupNotElapsed))
    );
}

#[test]
fn test_withdraw_after_lockup() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    pass_lockup(&t);

    t.queue.withdraw_bid(&t.payer, &25, &bid_id);

    let (contract, topics, data) = last_event(&t);
    assert_eq!(contract, t.queue_addr);
    assert_topic(&t, &topics, symbol_short!("bid_wdrw"));
    let data = <(i128, u64)>::try_from_val(&t.env, &data).unwrap();
    assert_eq!(data, (50, bid_id));

    let bid = t.queue.get_bid(&bid_id).unwrap();
    assert_eq!(bid.amount, 50);
    assert_eq!(bid.status, BidStatus::Active);
    assert_eq!(t.token.balance(&t.payer), 50);
    assert_eq!(t.token.balance(&t.queue_addr), 50);
}

#[test]
fn test_withdraw_zero_after_lockup() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    pass_lockup(&t);

    t.queue.withdraw_bid(&t.payer, &0, &bid_id);

    let (_, topics, data) = last_event(&t);
    assert_topic(&t, &topics, symbol_short!("bid_wdrw"));
    let data = <(i128, u64)>::try_from_val(&t.env, &data).unwrap();
    assert_eq!(data, (75, bid_id));

    assert_eq!(t.queue.get_bid(&bid_id).unwrap().amount, 75);
    assert_eq!(t.token.balance(&t.payer), 25);
    assert_eq!(t.token.balance(&t.queue_addr), 75);
}

#[test]
fn test_withdraw_negative_amount() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    pass_lockup(&t);

    assert_eq!(
        t.queue.try_withdraw_bid(&t.payer, &-1, &bid_id),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(t.queue.get_bid(&bid_id).unwrap().amount, 75);
}

#[test]
fn test_withdraw_more_than_escrowed() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    pass_lockup(&t);

    t.queue.withdraw_bid(&t.payer, &25, &bid_id);
    assert_eq!(
        t.queue.try_withdraw_bid(&t.payer, &51, &bid_id),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(t.queue.get_bid(&bid_id).unwrap().amount, 50);
}

#[test]
fn test_withdraw_everything_keeps_bid_active() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    pass_lockup(&t);

    t.queue.withdraw_bid(&t.payer, &75, &bid_id);

    let bid = t.queue.get_bid(&bid_id).unwrap();
    assert_eq!(bid.amount, 0);
    assert_eq!(bid.status, BidStatus::Active);
    assert_eq!(t.token.balance(&t.payer), 100);

    // A drained bid can still be topped up again.
    t.queue.increase_bid(&t.payer, &10, &bid_id);
    assert_eq!(t.queue.get_bid(&bid_id).unwrap().amount, 10);
}

#[test]
fn test_withdraw_ownership_checked_before_lockup() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    // Still inside the lock-up, but the ownership error wins.
    assert_eq!(
        t.queue.try_withdraw_bid(&t.other, &25, &bid_id),
        Err(Ok(Error::NotSubmitter))
    );
    assert_eq!(
        t.queue.try_withdraw_bid(&t.payer, &25, &9),
        Err(Ok(Error::InvalidBid))
    );
}

#[test]
fn test_withdraw_lockup_checked_before_amount() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    assert_eq!(
        t.queue.try_withdraw_bid(&t.payer, &1_000, &bid_id),
        Err(Ok(Error::LockupNotElapsed))
    );
}

// -- Cancel ---------------------------------------------------------------

#[test]
fn test_cancel_before_lockup_fails() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    assert_eq!(
        t.queue.try_cancel_bid(&t.payer, &bid_id),
        Err(Ok(Error::LockupNotElapsed))
    );
    assert_eq!(t.queue.get_bid(&bid_id).unwrap().status, BidStatus::Active);
}

#[test]
fn test_cancel_refunds_everything() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    pass_lockup(&t);
    t.queue.withdraw_bid(&t.payer, &25, &bid_id);

    t.queue.cancel_bid(&t.payer, &bid_id);

    let (contract, topics, data) = last_event(&t);
    assert_eq!(contract, t.queue_addr);
    assert_topic(&t, &topics, symbol_short!("bid_cncl"));
    let data = <(u64,)>::try_from_val(&t.env, &data).unwrap();
    assert_eq!(data, (bid_id,));

    let bid = t.queue.get_bid(&bid_id).unwrap();
    assert_eq!(bid.status, BidStatus::Canceled);
    assert_eq!(bid.amount, 0);
    assert_eq!(t.token.balance(&t.payer), 100);
    assert_eq!(t.token.balance(&t.queue_addr), 0);
}

#[test]
fn test_canceled_bid_is_inactive() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    pass_lockup(&t);
    t.queue.cancel_bid(&t.payer, &bid_id);

    assert_eq!(
        t.queue.try_withdraw_bid(&t.payer, &1, &bid_id),
        Err(Ok(Error::BidInactive))
    );
    assert_eq!(
        t.queue.try_increase_bid(&t.payer, &1, &bid_id),
        Err(Ok(Error::BidInactive))
    );
    assert_eq!(
        t.queue.try_cancel_bid(&t.payer, &bid_id),
        Err(Ok(Error::BidInactive))
    );
    assert_eq!(
        t.queue.try_accept_bid(&t.member, &bid_id),
        Err(Ok(Error::BidInactive))
    );
}

#[test]
fn test_cancel_not_submitter() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    pass_lockup(&t);

    assert_eq!(
        t.queue.try_cancel_bid(&t.other, &bid_id),
        Err(Ok(Error::NotSubmitter))
    );
}

#[test]
fn test_cancel_drained_bid() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    pass_lockup(&t);
    t.queue.withdraw_bid(&t.payer, &75, &bid_id);

    t.queue.cancel_bid(&t.payer, &bid_id);

    assert_eq!(t.queue.get_bid(&bid_id).unwrap().status, BidStatus::Canceled);
    assert_eq!(t.token.balance(&t.payer), 100);
}

// -- Accept ---------------------------------------------------------------

#[test]
fn test_accept_bid_settles_to_destination() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    // No lock-up wait for acceptance.
    t.queue.accept_bid(&t.member, &bid_id);

    let (contract, topics, data) = last_event(&t);
    assert_eq!(contract, t.queue_addr);
    assert_topic(&t, &topics, symbol_short!("bid_acpt"));
    let data = <(Address, u64)>::try_from_val(&t.env, &data).unwrap();
    assert_eq!(data, (t.member.clone(), bid_id));

    let bid = t.queue.get_bid(&bid_id).unwrap();
    assert_eq!(bid.status, BidStatus::Accepted);
    assert_eq!(bid.amount, 0);
    assert_eq!(t.token.balance(&t.destination), 75);
    assert_eq!(t.token.balance(&t.queue_addr), 0);
    assert_eq!(t.token.balance(&t.payer), 25);
}

#[test]
fn test_accept_below_threshold() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    let junior = Address::generate(&t.env);
    t.membership.set_shares(&junior, &(MIN_WEIGHT - 1));

    assert_eq!(
        t.queue.try_accept_bid(&junior, &bid_id),
        Err(Ok(Error::NotFullMember))
    );
    // Unknown accounts hold no shares.
    assert_eq!(
        t.queue.try_accept_bid(&t.other, &bid_id),
        Err(Ok(Error::NotFullMember))
    );
    assert_eq!(t.token.balance(&t.destination), 0);
    assert_eq!(t.queue.get_bid(&bid_id).unwrap().status, BidStatus::Active);
}

#[test]
fn test_accept_check_order() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    pass_lockup(&t);
    t.queue.cancel_bid(&t.payer, &bid_id);

    assert_eq!(
        t.queue.try_accept_bid(&t.other, &5),
        Err(Ok(Error::InvalidBid))
    );
    // Membership is checked before the bid's status.
    assert_eq!(
        t.queue.try_accept_bid(&t.other, &bid_id),
        Err(Ok(Error::NotFullMember))
    );
    assert_eq!(
        t.queue.try_accept_bid(&t.member, &bid_id),
        Err(Ok(Error::BidInactive))
    );
}

#[test]
fn test_accepted_bid_is_inactive() {
    let t = setup();
    let bid_id = submit_default_bid(&t);
    t.queue.accept_bid(&t.member, &bid_id);
    pass_lockup(&t);

    assert_eq!(
        t.queue.try_accept_bid(&t.member, &bid_id),
        Err(Ok(Error::BidInactive))
    );
    assert_eq!(
        t.queue.try_cancel_bid(&t.payer, &bid_id),
        Err(Ok(Error::BidInactive))
    );
    assert_eq!(
        t.queue.try_withdraw_bid(&t.payer, &1, &bid_id),
        Err(Ok(Error::BidInactive))
    );
    assert_eq!(
        t.queue.try_increase_bid(&t.payer, &1, &bid_id),
        Err(Ok(Error::BidInactive))
    );
}

#[test]
fn test_submitter_with_shares_can_accept() {
    let t = setup();
    t.membership.set_shares(&t.payer, &MIN_WEIGHT);
    let bid_id = submit_default_bid(&t);

    t.queue.accept_bid(&t.payer, &bid_id);
    assert_eq!(t.queue.get_bid(&bid_id).unwrap().status, BidStatus::Accepted);
}

// -- Queries --------------------------------------------------------------

#[test]
fn test_get_bid_out_of_range() {
    let t = setup();
    assert!(t.queue.get_bid(&0).is_none());
    submit_default_bid(&t);
    assert!(t.queue.get_bid(&0).is_some());
    assert!(t.queue.get_bid(&1).is_none());
}

#[test]
fn test_get_bids_pages() {
    let t = setup();
    for amount in 1..=5i128 {
        t.queue.submit_bid(&t.payer, &amount, &details(&t));
    }

    let page = t.queue.get_bids(&1, &2);
    assert_eq!(page.len(), 2);
    assert_eq!(page.get(0).unwrap().id, 1);
    assert_eq!(page.get(1).unwrap().amount, 3);

    let tail = t.queue.get_bids(&3, &10);
    assert_eq!(tail.len(), 2);
    assert_eq!(t.queue.get_bids(&5, &10).len(), 0);
    assert_eq!(t.queue.get_bids(&u64::MAX, &10).len(), 0);
}

#[test]
fn test_unlock_time() {
    let t = setup();
    let bid_id = submit_default_bid(&t);

    assert_eq!(t.queue.unlock_time(&bid_id), START_TS + LOCKUP);
    assert_eq!(t.queue.try_unlock_time(&3), Err(Ok(Error::InvalidBid)));
}

// -- Accounting -----------------------------------------------------------

#[test]
fn test_custody_matches_active_bids() {
    let t = setup();
    let a = t.queue.submit_bid(&t.payer, &40, &details(&t));
    let b = t.queue.submit_bid(&t.other, &30, &details(&t));
    let c = t.queue.submit_bid(&t.payer, &20, &details(&t));

    t.queue.increase_bid(&t.other, &15, &b);
    t.queue.accept_bid(&t.member, &a);
    pass_lockup(&t);
    t.queue.withdraw_bid(&t.payer, &5, &c);

    let active_total: i128 = t
        .queue
        .get_bids(&0, &MAX_PAGE_SIZE)
        .iter()
        .filter(|bid| bid.status == BidStatus::Active)
        .map(|bid| bid.amount)
        .sum();

    assert_eq!(active_total, 45 + 15);
    assert_eq!(t.token.balance(&t.queue_addr), active_total);
    assert_eq!(t.token.balance(&t.destination), 40);
    assert_eq!(t.token.balance(&t.payer), 100 - 40 - 20 + 5);
    assert_eq!(t.token.balance(&t.other), 100 - 45);

    t.queue.cancel_bid(&t.other, &b);
    assert_eq!(t.token.balance(&t.queue_addr), 15);
    assert_eq!(t.token.balance(&t.other), 100);
}
