#![allow(dead_code)]

extern crate std;

use crate::types::{ProjectDetails, ProjectState};

/// INV-1: Fund conservation. The escrow balance equals everything
/// contributed minus everything refunded minus everything paid out, and
/// never goes negative.
pub fn assert_conservation(details: &ProjectDetails) {
    let expected = details.total_contributed - details.refunds_paid - details.creator_paid;
    assert!(
        details.balance >= 0,
        "INV-1 violated: balance {} is negative",
        details.balance
    );
    assert_eq!(
        details.balance, expected,
        "INV-1 violated: balance {} != {} - {} - {}",
        details.balance, details.total_contributed, details.refunds_paid, details.creator_paid
    );
}

/// INV-2: Lifecycle transition validity. Only forward transitions along
/// the graph are allowed:
///   Funding       -> WorkSubmitted | Expired
///   WorkSubmitted -> InAppeal | Completed
///   InAppeal      -> RefundApproved | Completed
///   RefundApproved-> Completed
///   Expired       -> Completed
///   Completed     -> (none)
pub fn assert_valid_transition(from: &ProjectState, to: &ProjectState) {
    use ProjectState::*;
    let valid = matches!(
        (from, to),
        (Funding, WorkSubmitted)
            | (Funding, Expired)
            | (WorkSubmitted, InAppeal)
            | (WorkSubmitted, Completed)
            | (InAppeal, RefundApproved)
            | (InAppeal, Completed)
            | (RefundApproved, Completed)
            | (Expired, Completed)
    );
    assert!(
        valid,
        "INV-2 violated: invalid transition from {:?} to {:?}",
        from, to
    );
}

/// INV-3: Receipt issuance never exceeds the configured supply cap.
pub fn assert_units_capped(details: &ProjectDetails, limit: u32) {
    assert!(
        details.units_issued <= limit,
        "INV-3 violated: {} receipts issued over cap {}",
        details.units_issued,
        limit
    );
}

/// INV-4: A completed project holds no funds — every terminal path drains
/// the escrow to zero.
pub fn assert_completed_is_drained(details: &ProjectDetails) {
    if details.state == ProjectState::Completed {
        assert_eq!(
            details.balance, 0,
            "INV-4 violated: completed project still holds {}",
            details.balance
        );
    }
}

/// INV-5: Opposition weight never exceeds the total contributed value.
pub fn assert_opposition_bounded(details: &ProjectDetails) {
    assert!(
        details.opposing_value <= details.total_contributed,
        "INV-5 violated: opposing {} > contributed {}",
        details.opposing_value,
        details.total_contributed
    );
}

/// Run all stateless project invariants against a details snapshot.
pub fn assert_all(details: &ProjectDetails) {
    assert_conservation(details);
    assert_completed_is_drained(details);
    assert_opposition_bounded(details);
}
