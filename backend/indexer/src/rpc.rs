//! Soroban RPC client — polls `getEvents` and decodes escrow events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or a
//!   rate-limit response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried
//!   silently; only malformed requests surface as hard failures.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EscrowEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// XDR-decoded topic list
    pub topic: Vec<String>,
    /// XDR-decoded event value / data
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Fetching
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive).
/// * `cursor`       — opaque pagination cursor from a previous response.
/// * `limit`        — maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        match request_page(client, rpc_url, contract_id, start_ledger, cursor, limit).await {
            Ok(result) => {
                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );
                return Ok((result.events, result.cursor, result.latest_ledger));
            }
            Err(Retry::Soft(reason)) => {
                warn!("RPC retry in {backoff}s: {reason}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
            }
            Err(Retry::Hard(err)) => return Err(err),
        }
    }
}

enum Retry {
    /// Transient: back off and try again.
    Soft(String),
    /// Permanent: propagate to the caller.
    Hard(IndexerError),
}

async fn request_page(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> std::result::Result<EventsResult, Retry> {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": { "limit": limit }
    });
    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    let response = client
        .post(rpc_url)
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getEvents",
            "params": params,
        }))
        .send()
        .await
        .map_err(|e| Retry::Soft(format!("request failed: {e}")))?;

    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(Retry::Soft("rate-limited by RPC".to_string()));
    }

    let body: RpcResponse = response
        .json()
        .await
        .map_err(|e| Retry::Hard(IndexerError::Http(e)))?;

    if let Some(err) = body.error {
        // -32600/-32601 mean the request itself is malformed; retrying
        // cannot help.
        if err.code == -32600 || err.code == -32601 {
            return Err(Retry::Hard(IndexerError::EventParse(format!(
                "RPC hard error {}: {}",
                err.code, err.message
            ))));
        }
        return Err(Retry::Soft(format!("RPC error {}: {}", err.code, err.message)));
    }

    body.result.ok_or_else(|| {
        Retry::Hard(IndexerError::EventParse(
            "Empty result from getEvents".to_string(),
        ))
    })
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`EscrowEvent`] structs.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<EscrowEvent> {
    raw.iter()
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<EscrowEvent> {
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let (actor, amount, detail) = decode_data(&raw.value, &kind);

    Some(EscrowEvent {
        event_type: kind.as_str().to_string(),
        actor,
        amount,
        detail,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Pull apart the JSON `value` blob that Soroban returns for event data.
/// The XDR is decoded by the RPC into a `{"field": …}` JSON object per the
/// contract's event structs.
fn decode_data(
    value: &Value,
    kind: &EventKind,
) -> (Option<String>, Option<String>, Option<String>) {
    match kind {
        EventKind::Configured => (
            string_field(value, "creator"),
            None,
            string_field(value, "submission_deadline"),
        ),
        EventKind::ReceiptInfoSet => (
            string_field(value, "issuer"),
            string_field(value, "price"),
            string_field(value, "limit"),
        ),
        EventKind::Contribution => (
            string_field(value, "backer"),
            string_field(value, "value"),
            string_field(value, "units"),
        ),
        EventKind::WorkDelivered => (
            string_field(value, "creator"),
            None,
            string_field(value, "submitted_at"),
        ),
        EventKind::Opposition => (
            string_field(value, "backer"),
            string_field(value, "weight"),
            string_field(value, "opposing_value"),
        ),
        EventKind::StateChange => {
            let from = string_field(value, "from");
            let to = string_field(value, "to");
            let detail = match (from, to) {
                (Some(f), Some(t)) => Some(format!("{f}→{t}")),
                _ => None,
            };
            (None, None, detail)
        }
        EventKind::RefundPaid => (
            string_field(value, "backer"),
            string_field(value, "amount"),
            None,
        ),
        EventKind::CreatorPaid => (None, string_field(value, "amount"), None),
        EventKind::Unknown => (None, None, None),
    }
}

/// Extract a field as a string, accepting string, number or enum-symbol
/// encodings from the RPC's XDR-to-JSON conversion.
fn string_field(value: &Value, key: &str) -> Option<String> {
    let v = value.get(key)?;
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // Unit enum variants decode as a one-element array of the name.
        Value::Array(items) => items.first().and_then(|i| i.as_str()).map(String::from),
        _ => v.get("value").and_then(|x| x.as_str()).map(String::from),
    }
}

/// Extract a Soroban Symbol from the XDR-decoded topic string.
/// The RPC may return `{"type":"symbol","value":"contrib"}` or the raw
/// string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    raw.to_string()
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
