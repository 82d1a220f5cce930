//! # Types
//!
//! Shared data structures used across all modules of the escrow contract.
//!
//! ## Design decisions
//!
//! ### Config / Status split
//!
//! The project is internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`] — written once by `configure`; never mutated.
//! - [`ProjectStatus`] — written on every contribution, vote and payout.
//!
//! The public API exposes the reconstructed [`ProjectDetails`] view for
//! convenience.
//!
//! ### Lifecycle as a Finite-State Machine
//!
//! [`ProjectState`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Funding ──► WorkSubmitted ──► InAppeal ──► RefundApproved ──► Completed
//!    │              │               └──────────────────────────►┘
//!    │              └──────────────────────────────────────────►┘
//!    └──► Expired ──────────────────────────────────────────────►┘
//! ```
//!
//! Backward transitions and transitions out of `Completed` are rejected by
//! the entry points; once a state is left it is never revisited.

use soroban_sdk::{contracttype, Address, String};

/// Lifecycle state of the project.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProjectState {
    /// Accepting contributions; work not yet submitted.
    Funding,
    /// Submission deadline passed without work; backers recover 100%.
    Expired,
    /// Work delivered on time; appeal window running, no dissent yet.
    WorkSubmitted,
    /// At least one backer opposed; votes accumulating.
    InAppeal,
    /// Opposition reached quorum; backers recover 50%, creator keeps 50%.
    RefundApproved,
    /// Terminal. All settlement performed; only reads succeed.
    Completed,
}

/// Immutable project configuration, written once by `configure`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    /// Address that proposed the project and receives released funds.
    pub creator: Address,
    pub name: String,
    pub description: String,
    /// Token contract the escrow is denominated in.
    pub funding_token: Address,
    /// Ledger timestamp; work must be submitted at or before this instant.
    pub submission_deadline: u64,
}

/// Receipt/claim token configuration, written once by `set_nft_info`
/// before the first contribution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceiptInfo {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    /// Funding-token value of one receipt unit.
    pub price: i128,
    /// Receipt supply cap, creator allotment included.
    pub limit: u32,
    /// Receipts minted to the creator at setup.
    pub creator_allotment: u32,
    /// External contract that mints receipts and claim tokens.
    pub issuer: Address,
}

/// Mutable aggregate state. Only the entry points in `lib.rs` write it.
///
/// `balance` must always equal
/// `total_contributed - refunds_paid - creator_paid`; the redundant running
/// sums exist so the equation can be re-checked after every mutation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectStatus {
    pub state: ProjectState,
    /// Escrowed funds not yet refunded or paid out.
    pub balance: i128,
    pub total_contributed: i128,
    pub refunds_paid: i128,
    pub creator_paid: i128,
    /// Receipts issued so far, creator allotment included.
    pub units_issued: u32,
    /// Set once by `submit_work`; anchors the appeal window.
    pub work_submitted_at: Option<u64>,
    /// Cumulative contributed value of backers who opposed.
    pub opposing_value: i128,
    /// Terminal creator payout performed (finalize is idempotent).
    pub creator_settled: bool,
    /// Claim tokens minted (success path, at most once).
    pub claims_minted: bool,
}

impl ProjectStatus {
    /// Fresh status for a newly configured project.
    pub fn new() -> Self {
        ProjectStatus {
            state: ProjectState::Funding,
            balance: 0,
            total_contributed: 0,
            refunds_paid: 0,
            creator_paid: 0,
            units_issued: 0,
            work_submitted_at: None,
            opposing_value: 0,
            creator_settled: false,
            claims_minted: false,
        }
    }
}

/// Deliverable metadata stored by `submit_work`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkSubmission {
    pub name: String,
    pub description: String,
    pub url: String,
}

/// Full public view of the project — returned by `get_details`.
///
/// Reconstructed from the split [`ProjectConfig`] + [`ProjectStatus`]
/// storage entries. The running sums are exposed so external auditors can
/// re-check fund conservation without reading raw storage.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectDetails {
    pub creator: Address,
    pub name: String,
    pub description: String,
    pub funding_token: Address,
    pub submission_deadline: u64,
    pub state: ProjectState,
    pub balance: i128,
    pub total_contributed: i128,
    pub refunds_paid: i128,
    pub creator_paid: i128,
    pub units_issued: u32,
    pub opposing_value: i128,
    pub work_submitted_at: Option<u64>,
}
