//! Ledger — contribution, refund and payout bookkeeping.
//!
//! Pure accounting over [`ProjectStatus`] and the per-backer storage
//! entries; no control flow or state-machine decisions live here. Every
//! mutation re-checks the conservation equation
//! `balance == total_contributed - refunds_paid - creator_paid` and
//! non-negativity. A violation means a defect in this contract, not a
//! caller error: the invocation aborts with `InternalConsistency` before
//! anything is persisted, so only consistent states ever commit.

use soroban_sdk::{Address, Env};

use crate::settlement;
use crate::storage;
use crate::types::ProjectStatus;
use crate::Error;

/// Record `value` contributed by `backer`.
///
/// Contributions per backer are cumulative and monotonically
/// non-decreasing.
pub fn record_contribution(
    env: &Env,
    status: &mut ProjectStatus,
    backer: &Address,
    value: i128,
) -> Result<(), Error> {
    if value <= 0 {
        return Err(Error::InvalidAmount);
    }
    let current = storage::contribution(env, backer);
    let updated = current.checked_add(value).ok_or(Error::Overflow)?;
    storage::set_contribution(env, backer, updated);
    storage::push_contributor(env, backer);

    status.total_contributed = status
        .total_contributed
        .checked_add(value)
        .ok_or(Error::Overflow)?;
    status.balance = status.balance.checked_add(value).ok_or(Error::Overflow)?;
    check_conservation(status)
}

/// Record a refund of `amount` paid to `backer`.
///
/// Marks the backer refunded first so a second claim fails with
/// `AlreadyClaimed` and so the marker is in place before any outbound
/// transfer the caller performs.
pub fn record_refund(
    env: &Env,
    status: &mut ProjectStatus,
    backer: &Address,
    amount: i128,
) -> Result<(), Error> {
    if storage::is_refunded(env, backer) {
        return Err(Error::AlreadyClaimed);
    }
    storage::set_refunded(env, backer);

    status.refunds_paid = status
        .refunds_paid
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    status.balance = status.balance.checked_sub(amount).ok_or(Error::Overflow)?;
    check_conservation(status)
}

/// Record `amount` paid out to the creator.
pub fn record_payout(status: &mut ProjectStatus, amount: i128) -> Result<(), Error> {
    status.creator_paid = status
        .creator_paid
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    status.balance = status.balance.checked_sub(amount).ok_or(Error::Overflow)?;
    check_conservation(status)
}

/// The conservation invariant. Checked after every mutation above.
pub fn check_conservation(status: &ProjectStatus) -> Result<(), Error> {
    let expected = status.total_contributed - status.refunds_paid - status.creator_paid;
    if status.balance < 0 || status.balance != expected {
        return Err(Error::InternalConsistency);
    }
    Ok(())
}

/// Refunds still claimable from a pool of `refund_pool` over `total`
/// contributed value, summed over backers who have not yet been paid.
///
/// Bounded by the contributor list, which is capped by the receipt supply
/// limit.
pub fn outstanding_refund_liability(env: &Env, refund_pool: i128, total: i128) -> i128 {
    let mut liability: i128 = 0;
    for backer in storage::contributors(env).iter() {
        if storage::is_refunded(env, &backer) {
            continue;
        }
        let contribution = storage::contribution(env, &backer);
        liability += settlement::backer_refund(contribution, refund_pool, total);
    }
    liability
}
