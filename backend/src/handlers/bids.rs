use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::bids::{BidRecord, LedgerSnapshot, ListBidsQuery, ListBidsResponse, SharedLedger};
use crate::error::{ApiError, ApiResult};

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

pub async fn list_bids(
    State(ledger): State<SharedLedger>,
    Query(query): Query<ListBidsQuery>,
) -> ApiResult<Json<ListBidsResponse>> {
    let page = query.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::BadRequest("page starts at 1".to_string()));
    }

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_LIMIT
        )));
    }

    let ledger = ledger.read().await;

    Ok(Json(ListBidsResponse {
        bids: ledger.list(query.status, page, limit),
        total: ledger.count(query.status),
        page,
        limit,
    }))
}

pub async fn get_bid(
    State(ledger): State<SharedLedger>,
    Path(bid_id): Path<u64>,
) -> ApiResult<Json<BidRecord>> {
    let ledger = ledger.read().await;

    ledger
        .get(bid_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Bid {} not found", bid_id)))
}

pub async fn get_snapshot(State(ledger): State<SharedLedger>) -> Json<LedgerSnapshot> {
    Json(ledger.read().await.snapshot())
}
