//! Match invariants - sanity checks that detect bugs.
//!
//! Allocation and combat only move cells between the two sides and the
//! neutral pool, so the total number of cells is fixed for the whole match.
//! Lifetime expansion counts grow by at most the cells in play per turn. None of these should ever
//! trigger; if one does, it indicates a bug.

use crate::game::{MatchState, Side};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all match invariants against the cell total fixed at reset.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &MatchState, expected_total_cells: u64) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let total = state.total_cells();
    if total != expected_total_cells {
        violations.push(InvariantViolation {
            message: format!(
                "cell total {total} (P1 {} + P2 {} + neutral {}) differs from {expected_total_cells}",
                state.agent(Side::Player1).territory,
                state.agent(Side::Player2).territory,
                state.neutral
            ),
        });
    }

    for side in Side::BOTH {
        let agent = state.agent(side);
        // Each turn grants at most every cell in play.
        let bound = expected_total_cells.saturating_mul(u64::from(state.turn));
        if u64::from(agent.expanded_total) > bound {
            violations.push(InvariantViolation {
                message: format!(
                    "{side} lifetime expansion {} exceeds bound {bound}",
                    agent.expanded_total
                ),
            });
        }
    }

    if state.history().len() != state.turn as usize + 1 {
        violations.push(InvariantViolation {
            message: format!(
                "history holds {} snapshots after {} turns",
                state.history().len(),
                state.turn
            ),
        });
    }

    violations
}

/// Assert all match invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &MatchState, expected_total_cells: u64) {
    let violations = check_invariants(state, expected_total_cells);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Match invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &MatchState, _expected_total_cells: u64) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;

    #[test]
    fn test_fresh_match_passes() {
        let state = MatchState::new(&GameSettings::default());
        assert!(check_invariants(&state, 100).is_empty());
    }

    #[test]
    fn test_created_cell_detected() {
        let mut state = MatchState::new(&GameSettings::default());
        state.neutral += 1;
        let violations = check_invariants(&state, 100);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("cell total 101"));
    }

    #[test]
    fn test_missing_snapshot_detected() {
        let mut state = MatchState::new(&GameSettings::default());
        state.advance_turn();
        let violations = check_invariants(&state, 100);
        assert!(violations.iter().any(|v| v.message.contains("snapshots")));
    }

    #[test]
    #[should_panic(expected = "Match invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_panics_on_violation() {
        let mut state = MatchState::new(&GameSettings::default());
        state.agent_mut(Side::Player1).territory += 5;
        assert_invariants(&state, 100);
    }
}
