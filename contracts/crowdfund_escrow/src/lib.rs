//! # Crowdfund Escrow Contract
//!
//! A creator proposes a project with a work-submission deadline; backers
//! buy receipt units and their funds sit in escrow. Funds are released to
//! the creator only if the work is delivered on time and not opposed by a
//! 67% supermajority of contributed value within a seven-day appeal
//! window; otherwise backers recover partial or full refunds.
//!
//! | Phase        | Entry Point(s)                                   |
//! |--------------|--------------------------------------------------|
//! | Setup        | [`ProjectEscrow::configure`], [`ProjectEscrow::set_nft_info`] |
//! | Funding      | [`ProjectEscrow::contribute`]                    |
//! | Delivery     | [`ProjectEscrow::submit_work`]                   |
//! | Appeal       | [`ProjectEscrow::oppose_work`]                   |
//! | Settlement   | [`ProjectEscrow::get_refund`], [`ProjectEscrow::check_if_funding_complete_or_expired`] |
//! | Queries      | `get_details`, `state`, `current_balance`, `get_nft_address`, `get_user_claim_balance`, `get_contribution`, `get_work` |
//!
//! ## Architecture
//!
//! This file contains only the entry points: guard checks, orchestration
//! and event emission. Bookkeeping lives in [`ledger`], time policy in
//! [`deadline`], split arithmetic in [`settlement`], persistence in
//! [`storage`] and the external token boundary in [`issuer`]. Each
//! invocation commits atomically or aborts with no partial writes, and
//! deadline-gated transitions are evaluated lazily at the head of the next
//! action — never by a background timer.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Env, String,
};

mod deadline;
mod events;
mod issuer;
mod ledger;
mod settlement;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use issuer::{IssuerClient, ReceiptIssuer};
pub use types::{
    ProjectConfig, ProjectDetails, ProjectState, ProjectStatus, ReceiptInfo, WorkSubmission,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// `configure` was already called.
    AlreadyConfigured = 1,
    /// No project has been configured on this instance.
    NotConfigured = 2,
    /// `set_nft_info` was already called.
    ReceiptInfoAlreadySet = 3,
    /// Receipt setup must precede contributions.
    ReceiptInfoNotSet = 4,
    /// Action not allowed in the current lifecycle state.
    InvalidState = 5,
    /// Wrong caller role for this action.
    Unauthorized = 6,
    /// Zero or negative amount.
    InvalidAmount = 7,
    /// Receipt supply cap would be exceeded.
    SupplyLimitExceeded = 8,
    /// Caller has no recorded contribution.
    NotABacker = 9,
    /// Each backer may oppose at most once.
    AlreadyOpposed = 10,
    /// Refund was already paid ("can not refund" twice).
    AlreadyClaimed = 11,
    /// No refund is available in the current state ("can not refund").
    RefundNotAvailable = 12,
    /// Terminal conditions not met yet ("project is not complete").
    DeadlineNotReached = 13,
    /// The relevant deadline or window has already passed.
    DeadlinePassed = 14,
    /// Appeal voting still open ("need to wait until appeal ends").
    AppealWindowOpen = 15,
    /// Conservation invariant violated — a defect, never a caller error.
    InternalConsistency = 16,
    /// Arithmetic overflow.
    Overflow = 17,
}

#[contract]
pub struct ProjectEscrow;

#[contractimpl]
impl ProjectEscrow {
    // ─────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────

    /// Configure the project. One-time; `creator` must authorize.
    ///
    /// `submission_deadline` is the ledger timestamp at or before which the
    /// creator must submit work to avoid automatic refund eligibility.
    pub fn configure(
        env: Env,
        creator: Address,
        name: String,
        description: String,
        funding_token: Address,
        submission_deadline: u64,
    ) {
        creator.require_auth();

        if storage::load_config(&env).is_some() {
            panic_with_error!(&env, Error::AlreadyConfigured);
        }
        if submission_deadline <= env.ledger().timestamp() {
            panic_with_error!(&env, Error::DeadlinePassed);
        }

        let config = ProjectConfig {
            creator: creator.clone(),
            name,
            description,
            funding_token,
            submission_deadline,
        };
        storage::save_config(&env, &config);
        storage::save_status(&env, &ProjectStatus::new());

        events::emit_configured(&env, &creator, submission_deadline);
    }

    /// Fix the receipt/claim token setup. One-time, before the first
    /// contribution; creator-only. Mints the creator's receipt allotment.
    pub fn set_nft_info(
        env: Env,
        name: String,
        symbol: String,
        uri: String,
        price: i128,
        limit: u32,
        creator_allotment: u32,
        issuer: Address,
    ) {
        let config = load_config_or_panic(&env);
        config.creator.require_auth();

        if storage::load_receipt_info(&env).is_some() {
            panic_with_error!(&env, Error::ReceiptInfoAlreadySet);
        }
        let mut status = load_status_or_panic(&env);
        if status.state != ProjectState::Funding {
            panic_with_error!(&env, Error::InvalidState);
        }
        if price <= 0 || limit == 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        if creator_allotment > limit {
            panic_with_error!(&env, Error::SupplyLimitExceeded);
        }

        let info = ReceiptInfo {
            name,
            symbol,
            uri,
            price,
            limit,
            creator_allotment,
            issuer: issuer.clone(),
        };
        storage::save_receipt_info(&env, &info);
        status.units_issued = creator_allotment;
        storage::save_status(&env, &status);

        // External mint only after local state is written.
        if creator_allotment > 0 {
            IssuerClient::new(&env, &issuer).mint_receipts(&config.creator, &creator_allotment);
        }

        events::emit_receipt_info_set(&env, &issuer, price, limit, creator_allotment);
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Buy `units` receipt units. Transfers `units × price` of the funding
    /// token into escrow and mints the receipts through the issuer.
    pub fn contribute(env: Env, backer: Address, units: u32) {
        backer.require_auth();

        let config = load_config_or_panic(&env);
        let info = match storage::load_receipt_info(&env) {
            Some(info) => info,
            None => panic_with_error!(&env, Error::ReceiptInfoNotSet),
        };
        let mut status = load_status_or_panic(&env);

        if status.state != ProjectState::Funding {
            panic_with_error!(&env, Error::InvalidState);
        }
        // Lazy deadline check: funding past the deadline is already Expired
        // in spirit; the transition itself commits with the next finalize
        // or refund.
        if deadline::is_past_submission_deadline(
            env.ledger().timestamp(),
            config.submission_deadline,
        ) {
            panic_with_error!(&env, Error::DeadlinePassed);
        }
        if units == 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        let issued = match status.units_issued.checked_add(units) {
            Some(total) => total,
            None => panic_with_error!(&env, Error::SupplyLimitExceeded),
        };
        if issued > info.limit {
            panic_with_error!(&env, Error::SupplyLimitExceeded);
        }

        let value = match (units as i128).checked_mul(info.price) {
            Some(v) => v,
            None => panic_with_error!(&env, Error::Overflow),
        };

        status.units_issued = issued;
        ledger::record_contribution(&env, &mut status, &backer, value)
            .unwrap_or_else(|e| panic_with_error!(&env, e));
        storage::save_status(&env, &status);

        // External calls only after the bookkeeping above is written.
        token::Client::new(&env, &config.funding_token).transfer(
            &backer,
            &env.current_contract_address(),
            &value,
        );
        IssuerClient::new(&env, &info.issuer).mint_receipts(&backer, &units);

        events::emit_contribution(&env, &backer, units, value);
    }

    // ─────────────────────────────────────────────────────────
    // Delivery and appeal
    // ─────────────────────────────────────────────────────────

    /// Submit the deliverable. Creator-only, in `Funding`, at or before the
    /// submission deadline. Starts the appeal window.
    pub fn submit_work(env: Env, caller: Address, work: WorkSubmission) {
        caller.require_auth();

        let config = load_config_or_panic(&env);
        if caller != config.creator {
            panic_with_error!(&env, Error::Unauthorized);
        }
        let mut status = load_status_or_panic(&env);
        if status.state != ProjectState::Funding {
            panic_with_error!(&env, Error::InvalidState);
        }
        let now = env.ledger().timestamp();
        if deadline::is_past_submission_deadline(now, config.submission_deadline) {
            panic_with_error!(&env, Error::DeadlinePassed);
        }

        status.work_submitted_at = Some(now);
        transition(&env, &mut status, ProjectState::WorkSubmitted);
        storage::save_status(&env, &status);
        storage::save_work(&env, &work);

        events::emit_work_delivered(&env, &caller, now);
    }

    /// Oppose the submitted work. Backer-only, once per backer, while the
    /// appeal window is open. Vote weight is the backer's contributed
    /// value; the first dissent opens the appeal, and reaching 67% of the
    /// total contributed value approves refunds.
    pub fn oppose_work(env: Env, backer: Address) {
        backer.require_auth();

        load_config_or_panic(&env);
        let mut status = load_status_or_panic(&env);

        let weight = storage::contribution(&env, &backer);
        if weight == 0 {
            panic_with_error!(&env, Error::NotABacker);
        }
        match status.state {
            ProjectState::WorkSubmitted | ProjectState::InAppeal => {}
            _ => panic_with_error!(&env, Error::InvalidState),
        }
        let submitted_at = match status.work_submitted_at {
            Some(t) => t,
            None => panic_with_error!(&env, Error::InternalConsistency),
        };
        if deadline::is_past_appeal(env.ledger().timestamp(), submitted_at) {
            panic_with_error!(&env, Error::DeadlinePassed);
        }
        if storage::has_opposed(&env, &backer) {
            panic_with_error!(&env, Error::AlreadyOpposed);
        }

        storage::set_opposed(&env, &backer);
        status.opposing_value = match status.opposing_value.checked_add(weight) {
            Some(v) => v,
            None => panic_with_error!(&env, Error::Overflow),
        };

        if status.state == ProjectState::WorkSubmitted {
            transition(&env, &mut status, ProjectState::InAppeal);
        }
        if settlement::quorum_reached(status.opposing_value, status.total_contributed) {
            transition(&env, &mut status, ProjectState::RefundApproved);
        }
        storage::save_status(&env, &status);

        events::emit_opposition(&env, &backer, weight, status.opposing_value);
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Claim a refund. Pays the calculator's split for the current state:
    /// the full contribution once the project is `Expired`, half of it once
    /// refunds are approved. At most one payout per backer.
    pub fn get_refund(env: Env, backer: Address) {
        backer.require_auth();

        let config = load_config_or_panic(&env);
        let mut status = load_status_or_panic(&env);

        let contribution = storage::contribution(&env, &backer);
        if contribution == 0 {
            panic_with_error!(&env, Error::NotABacker);
        }

        // Lazy transition: a funding project past its deadline is Expired.
        if status.state == ProjectState::Funding
            && deadline::is_past_submission_deadline(
                env.ledger().timestamp(),
                config.submission_deadline,
            )
        {
            transition(&env, &mut status, ProjectState::Expired);
        }

        match status.state {
            ProjectState::Expired | ProjectState::RefundApproved => {}
            _ => panic_with_error!(&env, Error::RefundNotAvailable),
        }

        let split = settlement::compute(status.state, status.total_contributed);
        let amount =
            settlement::backer_refund(contribution, split.refund_pool, status.total_contributed);

        // Marks the backer refunded and re-checks conservation before the
        // outbound transfer below.
        ledger::record_refund(&env, &mut status, &backer, amount)
            .unwrap_or_else(|e| panic_with_error!(&env, e));
        maybe_complete(&env, &mut status);
        storage::save_status(&env, &status);

        token::Client::new(&env, &config.funding_token).transfer(
            &env.current_contract_address(),
            &backer,
            &amount,
        );

        events::emit_refund(&env, &backer, amount);
    }

    /// Finalize. Anyone may call; lazily advances deadline-gated
    /// transitions and performs the terminal settlement exactly once.
    /// Subsequent calls are no-ops that report the current state.
    pub fn check_if_funding_complete_or_expired(env: Env) -> ProjectState {
        let config = load_config_or_panic(&env);
        let mut status = load_status_or_panic(&env);
        let now = env.ledger().timestamp();

        match status.state {
            ProjectState::Completed => status.state,

            ProjectState::Funding => {
                if !deadline::is_past_submission_deadline(now, config.submission_deadline) {
                    panic_with_error!(&env, Error::DeadlineNotReached);
                }
                transition(&env, &mut status, ProjectState::Expired);
                maybe_complete(&env, &mut status);
                storage::save_status(&env, &status);
                status.state
            }

            ProjectState::WorkSubmitted => {
                let submitted_at = match status.work_submitted_at {
                    Some(t) => t,
                    None => panic_with_error!(&env, Error::InternalConsistency),
                };
                if !deadline::is_past_appeal(now, submitted_at) {
                    panic_with_error!(&env, Error::DeadlineNotReached);
                }
                settle_success(&env, &config, &mut status)
            }

            ProjectState::InAppeal => {
                let submitted_at = match status.work_submitted_at {
                    Some(t) => t,
                    None => panic_with_error!(&env, Error::InternalConsistency),
                };
                if !deadline::is_past_appeal(now, submitted_at) {
                    panic_with_error!(&env, Error::AppealWindowOpen);
                }
                // Quorum would already have moved the state to
                // RefundApproved, so the opposition fell short.
                settle_success(&env, &config, &mut status)
            }

            ProjectState::RefundApproved => {
                if status.creator_settled {
                    return status.state;
                }
                let split = settlement::compute(status.state, status.total_contributed);
                let liability = ledger::outstanding_refund_liability(
                    &env,
                    split.refund_pool,
                    status.total_contributed,
                );
                // The creator's half plus whatever pro-rata truncation left
                // in the pool; unclaimed refunds stay behind.
                let payout = status.balance - liability;
                ledger::record_payout(&mut status, payout)
                    .unwrap_or_else(|e| panic_with_error!(&env, e));
                status.creator_settled = true;
                maybe_complete(&env, &mut status);
                storage::save_status(&env, &status);

                token::Client::new(&env, &config.funding_token).transfer(
                    &env.current_contract_address(),
                    &config.creator,
                    &payout,
                );
                events::emit_payout(&env, payout);
                status.state
            }

            ProjectState::Expired => {
                maybe_complete(&env, &mut status);
                storage::save_status(&env, &status);
                status.state
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Full public view: configuration plus the running sums that let an
    /// external auditor re-check fund conservation.
    pub fn get_details(env: Env) -> ProjectDetails {
        let config = load_config_or_panic(&env);
        let status = load_status_or_panic(&env);
        ProjectDetails {
            creator: config.creator,
            name: config.name,
            description: config.description,
            funding_token: config.funding_token,
            submission_deadline: config.submission_deadline,
            state: status.state,
            balance: status.balance,
            total_contributed: status.total_contributed,
            refunds_paid: status.refunds_paid,
            creator_paid: status.creator_paid,
            units_issued: status.units_issued,
            opposing_value: status.opposing_value,
            work_submitted_at: status.work_submitted_at,
        }
    }

    pub fn state(env: Env) -> ProjectState {
        load_status_or_panic(&env).state
    }

    pub fn current_balance(env: Env) -> i128 {
        load_status_or_panic(&env).balance
    }

    /// Handle of the external receipt/claim issuer contract.
    pub fn get_nft_address(env: Env) -> Address {
        match storage::load_receipt_info(&env) {
            Some(info) => info.issuer,
            None => panic_with_error!(&env, Error::ReceiptInfoNotSet),
        }
    }

    /// Claim tokens minted to `address`, or zero before the success
    /// settlement. Backers earn claims equal to their contributed value;
    /// the creator's allotment counts at `allotment × price`.
    pub fn get_user_claim_balance(env: Env, address: Address) -> i128 {
        let config = load_config_or_panic(&env);
        let status = load_status_or_panic(&env);
        if !status.claims_minted {
            return 0;
        }
        let mut claims = storage::contribution(&env, &address);
        if address == config.creator {
            if let Some(info) = storage::load_receipt_info(&env) {
                claims += info.creator_allotment as i128 * info.price;
            }
        }
        claims
    }

    pub fn get_contribution(env: Env, address: Address) -> i128 {
        storage::contribution(&env, &address)
    }

    /// The stored deliverable metadata, if work was submitted.
    pub fn get_work(env: Env) -> Option<WorkSubmission> {
        storage::load_work(&env)
    }
}

// ─────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────

fn load_config_or_panic(env: &Env) -> ProjectConfig {
    match storage::load_config(env) {
        Some(config) => config,
        None => panic_with_error!(env, Error::NotConfigured),
    }
}

fn load_status_or_panic(env: &Env) -> ProjectStatus {
    match storage::load_status(env) {
        Some(status) => status,
        None => panic_with_error!(env, Error::NotConfigured),
    }
}

/// Move to `to`, emitting the transition. States are never revisited; the
/// guards in the entry points only reach this along the lifecycle graph.
fn transition(env: &Env, status: &mut ProjectStatus, to: ProjectState) {
    let from = status.state;
    status.state = to;
    events::emit_state_change(env, from, to);
}

/// A drained escrow is terminal.
fn maybe_complete(env: &Env, status: &mut ProjectStatus) {
    if status.balance == 0 && status.state != ProjectState::Completed {
        transition(env, status, ProjectState::Completed);
    }
}

/// Terminal settlement for the success paths: the creator is paid 100% and
/// claim tokens are minted pro-rata to contributed value.
fn settle_success(env: &Env, config: &ProjectConfig, status: &mut ProjectStatus) -> ProjectState {
    // No refunds can have happened on a success path, so the calculator's
    // creator share is the whole balance.
    let split = settlement::compute(status.state, status.total_contributed);
    let payout = split.creator_value;
    ledger::record_payout(status, payout).unwrap_or_else(|e| panic_with_error!(env, e));
    status.creator_settled = true;
    status.claims_minted = true;
    transition(env, status, ProjectState::Completed);
    storage::save_status(env, status);

    // External calls only after the terminal state is written locally.
    if payout > 0 {
        token::Client::new(env, &config.funding_token).transfer(
            &env.current_contract_address(),
            &config.creator,
            &payout,
        );
    }
    if let Some(info) = storage::load_receipt_info(env) {
        let issuer = IssuerClient::new(env, &info.issuer);
        for backer in storage::contributors(env).iter() {
            let contribution = storage::contribution(env, &backer);
            issuer.mint_claims(&backer, &contribution);
        }
        let allotment_claims = info.creator_allotment as i128 * info.price;
        if allotment_claims > 0 {
            issuer.mint_claims(&config.creator, &allotment_claims);
        }
    }

    events::emit_payout(env, payout);
    status.state
}
