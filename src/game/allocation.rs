//! Neutral allocation: simultaneous expansion bids against a shared pool.
//!
//! Cells that both sides bid for (up to the pool size) are contested and
//! stay neutral, even though both sides paid for them. What is left of the
//! pool then goes to the uncontested remainder of each bid, Player 1 first.
//!
//! While cells remain after the contested share, at most one side has an
//! uncontested remainder, so the fixed order never starves Player 2 of a
//! cell it could otherwise have had.

use crate::game::AgentState;

/// Outcome of one allocation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Allocation {
    /// Cells both sides claimed; they stay in the pool.
    pub contested: u32,
    /// Cells granted to Player 1.
    pub granted_p1: u32,
    /// Cells granted to Player 2.
    pub granted_p2: u32,
    /// Pool size after the round.
    pub neutral_after: u32,
}

/// Split `pool` between bids `bid_p1` and `bid_p2`.
#[must_use]
pub fn split_neutral(bid_p1: u32, bid_p2: u32, pool: u32) -> Allocation {
    let contested = bid_p1.min(bid_p2).min(pool);
    let mut remaining = pool - contested;

    let unique_p1 = bid_p1 - contested;
    let unique_p2 = bid_p2 - contested;

    let granted_p1 = unique_p1.min(remaining);
    remaining -= granted_p1;
    let granted_p2 = unique_p2.min(remaining);
    remaining -= granted_p2;

    Allocation {
        contested,
        granted_p1,
        granted_p2,
        neutral_after: remaining + contested,
    }
}

/// Resolve both bids and hand out the granted cells.
///
/// Bids are consumed by value; nothing carries over to the next turn.
pub fn allocate_neutral(
    p1: &mut AgentState,
    p2: &mut AgentState,
    bids: [u32; 2],
    neutral: &mut u32,
) -> Allocation {
    let allocation = split_neutral(bids[0], bids[1], *neutral);

    p1.territory += allocation.granted_p1;
    p1.expanded_total += allocation.granted_p1;
    p2.territory += allocation.granted_p2;
    p2.expanded_total += allocation.granted_p2;
    *neutral = allocation.neutral_after;

    allocation
}

/// Kani formal verification proofs.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Allocation never creates or destroys cells.
    #[kani::proof]
    fn prove_split_conserves_cells() {
        let a: u32 = kani::any();
        let b: u32 = kani::any();
        let pool: u32 = kani::any();

        let r = split_neutral(a, b, pool);

        assert_eq!(
            u64::from(r.granted_p1) + u64::from(r.granted_p2) + u64::from(r.neutral_after),
            u64::from(pool)
        );
    }

    /// Grants never exceed the bids.
    #[kani::proof]
    fn prove_grants_bounded_by_bids() {
        let a: u32 = kani::any();
        let b: u32 = kani::any();
        let pool: u32 = kani::any();

        let r = split_neutral(a, b, pool);

        assert!(r.granted_p1 <= a);
        assert!(r.granted_p2 <= b);
        assert!(r.contested <= pool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_contested() {
        let r = split_neutral(3, 3, 5);
        assert_eq!(
            r,
            Allocation {
                contested: 3,
                granted_p1: 0,
                granted_p2: 0,
                neutral_after: 5,
            }
        );
    }

    #[test]
    fn test_uncontested_bid() {
        let r = split_neutral(3, 0, 4);
        assert_eq!(r.contested, 0);
        assert_eq!(r.granted_p1, 3);
        assert_eq!(r.granted_p2, 0);
        assert_eq!(r.neutral_after, 1);
    }

    #[test]
    fn test_partial_overlap() {
        // contested 5, remaining 5: only P2 has an uncontested remainder.
        let r = split_neutral(5, 7, 10);
        assert_eq!(r.contested, 5);
        assert_eq!(r.granted_p1, 0);
        assert_eq!(r.granted_p2, 2);
        assert_eq!(r.neutral_after, 8);
    }

    #[test]
    fn test_remainder_capped_by_pool() {
        // contested 2, remaining 4: P1 takes 4 of its 6, P2 gets nothing.
        let r = split_neutral(8, 2, 6);
        assert_eq!(r.contested, 2);
        assert_eq!(r.granted_p1, 4);
        assert_eq!(r.granted_p2, 0);
        assert_eq!(r.neutral_after, 2);

        // Mirrored bids: P1 has no remainder, so P2 is not starved.
        let r = split_neutral(2, 8, 6);
        assert_eq!(r.granted_p1, 0);
        assert_eq!(r.granted_p2, 4);
    }

    #[test]
    fn test_bids_larger_than_pool() {
        let r = split_neutral(10, 10, 4);
        assert_eq!(r.contested, 4);
        assert_eq!(r.granted_p1, 0);
        assert_eq!(r.granted_p2, 0);
        assert_eq!(r.neutral_after, 4);
    }

    #[test]
    fn test_empty_pool() {
        assert_eq!(split_neutral(3, 1, 0), Allocation::default());
    }

    #[test]
    fn test_allocate_updates_agents() {
        let mut p1 = AgentState {
            territory: 30,
            ..AgentState::default()
        };
        let mut p2 = p1;
        let mut neutral = 4;

        let r = allocate_neutral(&mut p1, &mut p2, [3, 0], &mut neutral);

        assert_eq!(r.granted_p1, 3);
        assert_eq!(p1.territory, 33);
        assert_eq!(p1.expanded_total, 3);
        assert_eq!(p2.territory, 30);
        assert_eq!(p2.expanded_total, 0);
        assert_eq!(neutral, 1);
    }
}
