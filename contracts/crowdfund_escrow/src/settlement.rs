//! Settlement calculator — pure split and quorum arithmetic.
//!
//! Given the terminal state, the total contributed value and the vote
//! tally, computes how escrowed funds divide between the creator and the
//! refund pool. All division is integer floor division; the truncation
//! remainder of the pro-rata refunds stays in the pool and is swept into
//! the creator's terminal payout by `check_if_funding_complete_or_expired`,
//! never silently dropped.

use crate::types::ProjectState;

/// Opposing value must reach this share of total contributed value,
/// inclusive at the boundary, to approve refunds.
pub const QUORUM_PERCENT: i128 = 67;

/// Share of the total returned to backers when opposition wins.
pub const REFUND_PERCENT: i128 = 50;

/// Split of the escrowed total between the creator and the refund pool.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub creator_value: i128,
    pub refund_pool: i128,
}

/// True once `opposing × 100 ≥ total × QUORUM_PERCENT`.
///
/// Weight is contributed value: receipts are value-pegged through the fixed
/// unit price, so value is the primitive the ledger already conserves.
pub fn quorum_reached(opposing_value: i128, total_value: i128) -> bool {
    if total_value <= 0 {
        return false;
    }
    opposing_value * 100 >= total_value * QUORUM_PERCENT
}

/// Terminal split for `total` contributed value in `state`.
pub fn compute(state: ProjectState, total: i128) -> Settlement {
    match state {
        // Work never delivered: everything goes back to the backers.
        ProjectState::Expired => Settlement {
            creator_value: 0,
            refund_pool: total,
        },
        // Supermajority opposition: half back to backers, half to creator.
        ProjectState::RefundApproved => {
            let refund_pool = total * REFUND_PERCENT / 100;
            Settlement {
                creator_value: total - refund_pool,
                refund_pool,
            }
        }
        // Delivered and not successfully opposed: creator takes all.
        _ => Settlement {
            creator_value: total,
            refund_pool: 0,
        },
    }
}

/// One backer's pro-rata share of the refund pool, floored.
///
/// When the pool equals the total (the `Expired` path) this is exactly the
/// backer's contribution, so no remainder exists on that path.
pub fn backer_refund(contribution: i128, refund_pool: i128, total: i128) -> i128 {
    if total <= 0 {
        return 0;
    }
    contribution * refund_pool / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectState;

    #[test]
    fn quorum_boundary_is_inclusive() {
        assert!(quorum_reached(67, 100));
        assert!(!quorum_reached(66, 100));
        assert!(quorum_reached(100, 100));
        assert!(!quorum_reached(0, 100));
    }

    #[test]
    fn quorum_with_uneven_weights() {
        // 2/3 of 300 is exactly 200, which is below the 67% line (201).
        assert!(!quorum_reached(200, 300));
        assert!(quorum_reached(201, 300));
    }

    #[test]
    fn quorum_of_empty_project_never_reached() {
        assert!(!quorum_reached(0, 0));
    }

    #[test]
    fn expired_refunds_everything() {
        let s = compute(ProjectState::Expired, 200);
        assert_eq!(s.creator_value, 0);
        assert_eq!(s.refund_pool, 200);
    }

    #[test]
    fn refund_approved_splits_half() {
        let s = compute(ProjectState::RefundApproved, 200);
        assert_eq!(s.creator_value, 100);
        assert_eq!(s.refund_pool, 100);
    }

    #[test]
    fn refund_approved_odd_total_rounds_pool_down() {
        // The creator side absorbs the odd unit.
        let s = compute(ProjectState::RefundApproved, 201);
        assert_eq!(s.refund_pool, 100);
        assert_eq!(s.creator_value, 101);
        assert_eq!(s.creator_value + s.refund_pool, 201);
    }

    #[test]
    fn completed_pays_creator_everything() {
        let s = compute(ProjectState::Completed, 200);
        assert_eq!(s.creator_value, 200);
        assert_eq!(s.refund_pool, 0);
    }

    #[test]
    fn backer_refund_is_pro_rata() {
        // 50% pool: each backer recovers half their stake.
        assert_eq!(backer_refund(100, 100, 200), 50);
        // Full pool: exact contribution.
        assert_eq!(backer_refund(100, 200, 200), 100);
    }

    #[test]
    fn backer_refund_truncates_toward_zero() {
        // Pool 101 over total 202: floor(75 * 101 / 202) = 37, not 37.5.
        assert_eq!(backer_refund(75, 101, 202), 37);
    }

    #[test]
    fn refund_truncation_never_exceeds_pool() {
        let total = 203;
        let pool = compute(ProjectState::RefundApproved, total).refund_pool;
        let contributions = [100, 52, 51];
        let mut paid = 0;
        for c in contributions {
            paid += backer_refund(c, pool, total);
        }
        assert!(paid <= pool);
    }
}
