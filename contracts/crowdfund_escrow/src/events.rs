//! Contract events — the audit trail.
//!
//! Every state transition and every fund movement is published so the
//! lifecycle can be replayed and the conservation equation re-checked
//! off-chain (see the indexer's summary endpoint). Topics are short
//! symbols; data is a typed struct.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::types::ProjectState;

/// Emitted once when the project is configured.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfigured {
    pub creator: Address,
    pub submission_deadline: u64,
}

/// Emitted once when the receipt/claim setup is fixed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReceiptInfoSet {
    pub issuer: Address,
    pub price: i128,
    pub limit: u32,
    pub creator_allotment: u32,
}

/// Emitted on every accepted contribution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionReceived {
    pub backer: Address,
    pub units: u32,
    pub value: i128,
}

/// Emitted when the creator delivers work on time.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkDelivered {
    pub creator: Address,
    pub submitted_at: u64,
}

/// Emitted on every counted opposition vote.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OppositionRecorded {
    pub backer: Address,
    pub weight: i128,
    pub opposing_value: i128,
}

/// Emitted on every lifecycle transition.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateChanged {
    pub from: ProjectState,
    pub to: ProjectState,
}

/// Emitted when a backer's refund is paid out.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundPaid {
    pub backer: Address,
    pub amount: i128,
}

/// Emitted when the creator's terminal payout is made.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreatorPaid {
    pub amount: i128,
}

pub fn emit_configured(env: &Env, creator: &Address, submission_deadline: u64) {
    env.events().publish(
        (Symbol::new(env, "configured"),),
        ProjectConfigured {
            creator: creator.clone(),
            submission_deadline,
        },
    );
}

pub fn emit_receipt_info_set(env: &Env, issuer: &Address, price: i128, limit: u32, creator_allotment: u32) {
    env.events().publish(
        (symbol_short!("nft_set"),),
        ReceiptInfoSet {
            issuer: issuer.clone(),
            price,
            limit,
            creator_allotment,
        },
    );
}

pub fn emit_contribution(env: &Env, backer: &Address, units: u32, value: i128) {
    env.events().publish(
        (symbol_short!("contrib"),),
        ContributionReceived {
            backer: backer.clone(),
            units,
            value,
        },
    );
}

pub fn emit_work_delivered(env: &Env, creator: &Address, submitted_at: u64) {
    env.events().publish(
        (symbol_short!("delivered"),),
        WorkDelivered {
            creator: creator.clone(),
            submitted_at,
        },
    );
}

pub fn emit_opposition(env: &Env, backer: &Address, weight: i128, opposing_value: i128) {
    env.events().publish(
        (symbol_short!("opposed"),),
        OppositionRecorded {
            backer: backer.clone(),
            weight,
            opposing_value,
        },
    );
}

pub fn emit_state_change(env: &Env, from: ProjectState, to: ProjectState) {
    env.events()
        .publish((symbol_short!("state"),), StateChanged { from, to });
}

pub fn emit_refund(env: &Env, backer: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("refund"),),
        RefundPaid {
            backer: backer.clone(),
            amount,
        },
    );
}

pub fn emit_payout(env: &Env, amount: i128) {
    env.events()
        .publish((symbol_short!("payout"),), CreatorPaid { amount });
}
