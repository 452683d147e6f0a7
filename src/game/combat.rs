//! Combat resolution.
//!
//! Both sides strike at once. Each side's damage is its attack minus the
//! opponent's defense, computed from the pre-combat figures. Damage removes
//! land from the target, and the lost cells fall back into the neutral pool
//! rather than passing to the attacker.

use crate::game::AgentState;

/// Outcome of one combat round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CombatResult {
    /// Damage dealt by Player 1.
    pub damage_by_p1: u32,
    /// Damage dealt by Player 2.
    pub damage_by_p2: u32,
    /// Cells Player 1 lost.
    pub lost_p1: u32,
    /// Cells Player 2 lost.
    pub lost_p2: u32,
}

/// Damage one side deals to the other.
#[must_use]
pub const fn damage(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense)
}

/// Resolve a simultaneous exchange and move lost cells to `neutral`.
pub fn resolve_combat(p1: &mut AgentState, p2: &mut AgentState, neutral: &mut u32) -> CombatResult {
    let damage_by_p1 = damage(p1.attack, p2.defense);
    let damage_by_p2 = damage(p2.attack, p1.defense);

    let lost_p1 = damage_by_p2.min(p1.territory);
    let lost_p2 = damage_by_p1.min(p2.territory);

    p1.territory -= lost_p1;
    p2.territory -= lost_p2;
    *neutral += lost_p1 + lost_p2;

    CombatResult {
        damage_by_p1,
        damage_by_p2,
        lost_p1,
        lost_p2,
    }
}

/// Kani formal verification proofs.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Losses never exceed the land held.
    #[kani::proof]
    fn prove_losses_bounded_by_territory() {
        let mut p1 = AgentState {
            territory: kani::any::<u16>().into(),
            attack: kani::any(),
            defense: kani::any(),
            ..AgentState::default()
        };
        let mut p2 = AgentState {
            territory: kani::any::<u16>().into(),
            attack: kani::any(),
            defense: kani::any(),
            ..AgentState::default()
        };
        let before = (p1.territory, p2.territory);
        let mut neutral: u32 = kani::any::<u16>().into();

        let r = resolve_combat(&mut p1, &mut p2, &mut neutral);

        assert!(r.lost_p1 <= before.0);
        assert!(r.lost_p2 <= before.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(territory: u32, attack: u32, defense: u32) -> AgentState {
        AgentState {
            territory,
            attack,
            defense,
            ..AgentState::default()
        }
    }

    #[test]
    fn test_one_sided_breach() {
        let mut p1 = side(30, 12, 5);
        let mut p2 = side(30, 5, 10);
        let mut neutral = 0;

        let r = resolve_combat(&mut p1, &mut p2, &mut neutral);

        assert_eq!(p1.territory, 30);
        assert_eq!(p2.territory, 28);
        assert_eq!(neutral, 2);
        assert_eq!(r.damage_by_p1, 2);
        assert_eq!(r.damage_by_p2, 0);
    }

    #[test]
    fn test_mutual_damage_uses_pre_combat_values() {
        let mut p1 = side(10, 8, 1);
        let mut p2 = side(10, 4, 3);
        let mut neutral = 5;

        let r = resolve_combat(&mut p1, &mut p2, &mut neutral);

        assert_eq!(r.lost_p1, 3);
        assert_eq!(r.lost_p2, 5);
        assert_eq!(p1.territory, 7);
        assert_eq!(p2.territory, 5);
        assert_eq!(neutral, 13);
    }

    #[test]
    fn test_loss_capped_at_territory() {
        let mut p1 = side(10, 50, 0);
        let mut p2 = side(3, 0, 0);
        let mut neutral = 0;

        let r = resolve_combat(&mut p1, &mut p2, &mut neutral);

        assert_eq!(r.damage_by_p1, 50);
        assert_eq!(r.lost_p2, 3);
        assert_eq!(p2.territory, 0);
        assert_eq!(neutral, 3);
    }

    #[test]
    fn test_defense_absorbs_everything() {
        let mut p1 = side(10, 5, 9);
        let mut p2 = side(10, 9, 5);
        let mut neutral = 0;

        resolve_combat(&mut p1, &mut p2, &mut neutral);

        assert_eq!((p1.territory, p2.territory, neutral), (10, 10, 0));
    }
}
