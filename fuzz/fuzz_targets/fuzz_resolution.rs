#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use territory_duel::game::{allocate_neutral, resolve_combat};
use territory_duel::AgentState;

/// Structured input for allocation followed by combat.
#[derive(Arbitrary, Debug)]
struct ResolutionInput {
    territory: [u32; 2],
    attack: [u32; 2],
    defense: [u32; 2],
    bids: [u32; 2],
    neutral: u32,
}

fuzz_target!(|input: ResolutionInput| {
    // Keep the cell total within u32 so conservation can be checked exactly.
    let cap = u32::MAX / 4;
    let agent = |i: usize| AgentState {
        territory: input.territory[i] % cap,
        attack: input.attack[i],
        defense: input.defense[i],
        ..AgentState::default()
    };
    let mut p1 = agent(0);
    let mut p2 = agent(1);
    let mut neutral = input.neutral % cap;
    let total = u64::from(p1.territory) + u64::from(p2.territory) + u64::from(neutral);

    let allocation = allocate_neutral(&mut p1, &mut p2, input.bids, &mut neutral);
    assert!(allocation.granted_p1 <= input.bids[0]);
    assert!(allocation.granted_p2 <= input.bids[1]);
    assert!(allocation.granted_p1 == 0 || allocation.granted_p2 == 0);
    assert!(neutral >= allocation.contested);
    assert_eq!(
        u64::from(p1.territory) + u64::from(p2.territory) + u64::from(neutral),
        total,
        "allocation changed the cell total"
    );

    let before = (p1, p2);
    let combat = resolve_combat(&mut p1, &mut p2, &mut neutral);
    assert!(combat.lost_p1 <= before.0.territory);
    assert!(combat.lost_p2 <= before.1.territory);
    assert_eq!(combat.damage_by_p1, before.0.attack.saturating_sub(before.1.defense));
    assert_eq!(combat.damage_by_p2, before.1.attack.saturating_sub(before.0.defense));
    assert_eq!(
        u64::from(p1.territory) + u64::from(p2.territory) + u64::from(neutral),
        total,
        "combat changed the cell total"
    );
});
