//! Canonical event types emitted by the escrow contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdfund_escrow/src/events.rs`. The contract is a singleton
//! escrow — one deployed instance per project — so no project identifier
//! appears in the topics; the contract address is the project.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the escrow contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Project configured (`configured` topic).
    Configured,
    /// Receipt/claim token setup fixed (`nft_set` topic).
    ReceiptInfoSet,
    /// A backer bought receipt units (`contrib` topic).
    Contribution,
    /// The creator delivered work (`delivered` topic).
    WorkDelivered,
    /// A backer voted to oppose (`opposed` topic).
    Opposition,
    /// A lifecycle transition (`state` topic).
    StateChange,
    /// A backer's refund was paid (`refund` topic).
    RefundPaid,
    /// The creator's terminal payout was made (`payout` topic).
    CreatorPaid,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban.
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "configured" => Self::Configured,
            "nft_set" => Self::ReceiptInfoSet,
            "contrib" => Self::Contribution,
            "delivered" => Self::WorkDelivered,
            "opposed" => Self::Opposition,
            "state" => Self::StateChange,
            "refund" => Self::RefundPaid,
            "payout" => Self::CreatorPaid,
            _ => Self::Unknown,
        }
    }

    /// Short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configured => "configured",
            Self::ReceiptInfoSet => "receipt_info_set",
            Self::Contribution => "contribution",
            Self::WorkDelivered => "work_delivered",
            Self::Opposition => "opposition",
            Self::StateChange => "state_change",
            Self::RefundPaid => "refund_paid",
            Self::CreatorPaid => "creator_paid",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded escrow event, ready to be stored in the database.
///
/// `amount` carries the fund movement (contribution value, refund, payout)
/// where one exists; `detail` carries kind-specific context such as the
/// `from→to` pair of a state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowEvent {
    pub event_type: String,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
