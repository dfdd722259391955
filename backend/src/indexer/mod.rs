use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

mod handlers;
mod types;

pub use handlers::{decode_event, EventHandler};
pub use types::{GetEventsResponse, SorobanEvent};

use crate::bids::SharedLedger;
use crate::config::Config;

/// Maximum events requested per `getEvents` call
const PAGE_LIMIT: u32 = 100;
/// Extra wait after a failed batch
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub struct IndexerService {
    rpc_url: String,
    contract_id: String,
    start_ledger: u64,
    poll_interval: Duration,
    client: Client,
    ledger: SharedLedger,
    handler: EventHandler,
}

impl IndexerService {
    pub fn new(config: &Config, ledger: SharedLedger) -> Self {
        Self {
            rpc_url: config.soroban_rpc_url.clone(),
            contract_id: config.contract_id.clone(),
            start_ledger: config.start_ledger,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            handler: EventHandler::new(ledger.clone()),
            ledger,
        }
    }

    pub async fn start(self: Arc<Self>) {
        tracing::info!(
            "Indexer started for bid queue {} from ledger {}",
            self.contract_id,
            self.start_ledger
        );

        loop {
            if let Err(e) = self.process_batch().await {
                tracing::error!("Error indexing bid queue {}: {:#}", self.contract_id, e);
                sleep(ERROR_BACKOFF).await;
            }
            sleep(self.poll_interval).await;
        }
    }

    /// Fetch and apply one page of events. Returns the number of events applied.
    pub async fn process_batch(&self) -> Result<usize> {
        let (cursor, last_seen_ledger) = {
            let ledger = self.ledger.read().await;
            (ledger.cursor().to_string(), ledger.last_ledger())
        };

        let response = self.fetch_events(&cursor).await?;

        // The RPC node is behind what we already indexed: the network was reset.
        if last_seen_ledger > 0 && response.latest_ledger < last_seen_ledger {
            tracing::warn!(
                "Network reset detected: latest ledger {} < seen {}. Re-indexing.",
                response.latest_ledger,
                last_seen_ledger
            );
            self.ledger.write().await.reset();
            return Ok(0);
        }

        if response.events.is_empty() {
            if let Some(next) = response.cursor.as_deref().filter(|c| !c.is_empty()) {
                self.ledger.write().await.advance(next, response.latest_ledger);
            }
            return Ok(0);
        }

        tracing::debug!("Fetched {} bid queue events", response.events.len());

        let mut applied = 0;
        for event in &response.events {
            // A decode failure leaves the cursor on the previous event so the
            // next poll retries it.
            if self.handler.handle_event(event).await? {
                applied += 1;
            }
            self.ledger.write().await.advance(&event.id, event.ledger);
        }

        Ok(applied)
    }

    async fn fetch_events(&self, cursor: &str) -> Result<GetEventsResponse> {
        let payload = events_request(&self.contract_id, cursor, self.start_ledger);

        let resp = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        if let Some(err) = resp.get("error") {
            return Err(anyhow!("RPC Error: {:?}", err));
        }

        let result = resp
            .get("result")
            .ok_or_else(|| anyhow!("No result in RPC response"))?;
        let events_response: GetEventsResponse = serde_json::from_value(result.clone())?;

        Ok(events_response)
    }
}

/// JSON-RPC `getEvents` body. Paging resumes from `cursor` once one is known.
fn events_request(contract_id: &str, cursor: &str, start_ledger: u64) -> serde_json::Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": PAGE_LIMIT
        }
    });

    if cursor.is_empty() {
        params["startLedger"] = json!(start_ledger);
    } else {
        params["pagination"]["cursor"] = json!(cursor);
    }

    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": params
    })
}
