//! Fund-conservation audit over the indexed event stream.
//!
//! The contract guarantees that its escrow balance always equals
//! `contributions − refunds − payouts`. This module recomputes those sums
//! independently from the emitted events, so an operator can cross-check
//! the on-chain state without trusting the contract's own bookkeeping.

use serde::Serialize;

use crate::events::EventRecord;

/// Replayed per-project totals derived from the event stream.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub contract_id: Option<String>,
    pub event_count: usize,
    pub contribution_count: usize,
    pub refund_count: usize,
    pub total_contributed: i64,
    pub refunds_paid: i64,
    pub creator_paid: i64,
    /// `total_contributed − refunds_paid − creator_paid`.
    pub implied_balance: i64,
    /// The last lifecycle state seen in a `state_change` event, if any.
    pub last_state: Option<String>,
    /// False when the replayed sums are inconsistent (negative balance or
    /// an unparsable amount) — a red flag, not a routine condition.
    pub conservation_ok: bool,
}

/// Replay `events` (in ledger order) into a [`Summary`].
pub fn summarize(events: &[EventRecord]) -> Summary {
    let mut summary = Summary {
        contract_id: events.first().map(|e| e.contract_id.clone()),
        event_count: events.len(),
        contribution_count: 0,
        refund_count: 0,
        total_contributed: 0,
        refunds_paid: 0,
        creator_paid: 0,
        implied_balance: 0,
        last_state: None,
        conservation_ok: true,
    };

    for event in events {
        match event.event_type.as_str() {
            "contribution" => {
                summary.contribution_count += 1;
                match parse_amount(event) {
                    Some(v) => summary.total_contributed += v,
                    None => summary.conservation_ok = false,
                }
            }
            "refund_paid" => {
                summary.refund_count += 1;
                match parse_amount(event) {
                    Some(v) => summary.refunds_paid += v,
                    None => summary.conservation_ok = false,
                }
            }
            "creator_paid" => match parse_amount(event) {
                Some(v) => summary.creator_paid += v,
                None => summary.conservation_ok = false,
            },
            "state_change" => {
                summary.last_state = event
                    .detail
                    .as_deref()
                    .and_then(|d| d.split('→').nth(1))
                    .map(String::from);
            }
            _ => {}
        }
    }

    summary.implied_balance =
        summary.total_contributed - summary.refunds_paid - summary.creator_paid;
    if summary.implied_balance < 0 {
        summary.conservation_ok = false;
    }
    summary
}

fn parse_amount(event: &EventRecord) -> Option<i64> {
    event.amount.as_deref()?.parse::<i64>().ok()
}
