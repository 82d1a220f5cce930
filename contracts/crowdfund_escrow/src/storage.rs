//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type            | Description                          |
//! |----------------|-----------------|--------------------------------------|
//! | `Config`       | `ProjectConfig` | Immutable project configuration      |
//! | `Receipt`      | `ReceiptInfo`   | Immutable receipt/claim token setup  |
//! | `Status`       | `ProjectStatus` | Mutable aggregate state              |
//! | `Work`         | `WorkSubmission`| Deliverable metadata                 |
//! | `Contributors` | `Vec<Address>`  | Distinct backers, insertion order    |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day
//! remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                     | Type   | Description                        |
//! |-------------------------|--------|------------------------------------|
//! | `Contribution(backer)`  | `i128` | Cumulative contributed value       |
//! | `Opposed(backer)`       | `()`   | Backer has voted to oppose         |
//! | `Refunded(backer)`      | `()`   | Backer's refund was already paid   |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining.
//!
//! The contract is a singleton escrow — one deployed instance per project —
//! so the singletons live on the instance tier and only per-backer entries
//! need persistent keys. The `Contributors` list is bounded by the receipt
//! supply cap, which keeps it small enough for the instance entry.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{ProjectConfig, ProjectStatus, ReceiptInfo, WorkSubmission};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable project configuration (Instance).
    Config,
    /// Immutable receipt/claim token configuration (Instance).
    Receipt,
    /// Mutable aggregate state (Instance).
    Status,
    /// Deliverable metadata from `submit_work` (Instance).
    Work,
    /// Distinct contributing backers in insertion order (Instance).
    Contributors,
    /// Cumulative contributed value keyed by backer (Persistent).
    Contribution(Address),
    /// Opposition vote marker keyed by backer (Persistent).
    Opposed(Address),
    /// Refund-paid marker keyed by backer (Persistent).
    Refunded(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn save_config(env: &Env, config: &ProjectConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Option<ProjectConfig> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Config)
}

pub fn save_receipt_info(env: &Env, info: &ReceiptInfo) {
    env.storage().instance().set(&DataKey::Receipt, info);
    bump_instance(env);
}

pub fn load_receipt_info(env: &Env) -> Option<ReceiptInfo> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Receipt)
}

pub fn save_status(env: &Env, status: &ProjectStatus) {
    env.storage().instance().set(&DataKey::Status, status);
    bump_instance(env);
}

pub fn load_status(env: &Env) -> Option<ProjectStatus> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Status)
}

pub fn save_work(env: &Env, work: &WorkSubmission) {
    env.storage().instance().set(&DataKey::Work, work);
    bump_instance(env);
}

pub fn load_work(env: &Env) -> Option<WorkSubmission> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Work)
}

/// Distinct backers in insertion order. Bounded by the receipt supply cap.
pub fn contributors(env: &Env) -> Vec<Address> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Contributors)
        .unwrap_or_else(|| Vec::new(env))
}

/// Append `backer` to the contributor list if not already present.
pub fn push_contributor(env: &Env, backer: &Address) {
    let mut list = contributors(env);
    if !list.contains(backer) {
        list.push_back(backer.clone());
        env.storage().instance().set(&DataKey::Contributors, &list);
    }
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Cumulative contributed value of `backer`; zero if they never contributed.
pub fn contribution(env: &Env, backer: &Address) -> i128 {
    let key = DataKey::Contribution(backer.clone());
    match env.storage().persistent().get(&key) {
        Some(value) => {
            bump_persistent(env, &key);
            value
        }
        None => 0,
    }
}

pub fn set_contribution(env: &Env, backer: &Address, value: i128) {
    let key = DataKey::Contribution(backer.clone());
    env.storage().persistent().set(&key, &value);
    bump_persistent(env, &key);
}

pub fn has_opposed(env: &Env, backer: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Opposed(backer.clone()))
}

pub fn set_opposed(env: &Env, backer: &Address) {
    let key = DataKey::Opposed(backer.clone());
    env.storage().persistent().set(&key, &());
    bump_persistent(env, &key);
}

pub fn is_refunded(env: &Env, backer: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Refunded(backer.clone()))
}

pub fn set_refunded(env: &Env, backer: &Address) {
    let key = DataKey::Refunded(backer.clone());
    env.storage().persistent().set(&key, &());
    bump_persistent(env, &key);
}
