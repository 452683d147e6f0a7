#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use territory_duel::game::economy::{apply_upkeep, expand_price, income, upkeep_cost};
use territory_duel::game::{apply_command, Command};
use territory_duel::{AgentState, GameSettings};

/// Structured input for economy fuzzing.
#[derive(Arbitrary, Debug)]
struct EconomyInput {
    gold: u64,
    territory: u16,
    attack: u16,
    defense: u16,
    expanded_total: u16,
    /// Pricing parameters; bases are forced positive below.
    expand_base: u8,
    expand_step: u8,
    attack_base: u8,
    attack_slope: u8,
    defense_base: u8,
    defense_slope: u8,
    maint_attack: u8,
    maint_defense: u8,
    scout_cost: u8,
    /// Command fields (capped to keep purchase loops short).
    expand: u16,
    spend_attack: u32,
    spend_defense: u32,
    sell_attack: u16,
    sell_defense: u16,
    scout: bool,
}

fuzz_target!(|input: EconomyInput| {
    let settings = GameSettings {
        expand_base: u64::from(input.expand_base.max(1)),
        expand_step: u64::from(input.expand_step),
        attack_base: u64::from(input.attack_base.max(1)),
        attack_slope: u64::from(input.attack_slope),
        defense_base: u64::from(input.defense_base.max(1)),
        defense_slope: u64::from(input.defense_slope),
        maint_attack: u64::from(input.maint_attack),
        maint_defense: u64::from(input.maint_defense),
        scout_cost: u64::from(input.scout_cost),
        ..GameSettings::default()
    };
    assert!(settings.validate().is_ok());

    let mut agent = AgentState {
        gold: input.gold,
        territory: u32::from(input.territory),
        attack: u32::from(input.attack),
        defense: u32::from(input.defense),
        expanded_total: u32::from(input.expanded_total),
        has_enemy_intel: false,
    };

    // Income then upkeep, as the engine does.
    agent.gold = agent.gold.saturating_add(income(&agent, &settings));
    let before = agent;
    let upkeep = apply_upkeep(&mut agent, &settings);

    assert_eq!(upkeep.cost, upkeep_cost(&before, &settings));
    assert_eq!(agent.territory, before.territory);
    if upkeep.defense_disbanded > 0 {
        assert_eq!(agent.attack, 0, "defense liquidated before attack");
    }
    if upkeep.cost <= before.gold {
        assert_eq!(agent.gold, before.gold - upkeep.cost);
    }

    let command = Command {
        expand: u32::from(input.expand),
        spend_attack: u64::from(input.spend_attack % 100_000),
        spend_defense: u64::from(input.spend_defense % 100_000),
        sell_attack: u32::from(input.sell_attack),
        sell_defense: u32::from(input.sell_defense),
        scout: input.scout,
    };
    let before = agent;
    let outcome = apply_command(&mut agent, &command, &settings);

    let credited = before
        .gold
        .saturating_add(outcome.attack_sold.refund)
        .saturating_add(outcome.defense_sold.refund);
    assert!(agent.gold <= credited);
    assert!(outcome.bid <= command.expand);
    assert!(outcome.attack_bought.spent <= command.spend_attack);
    assert!(outcome.defense_bought.spent <= command.spend_defense);
    assert_eq!(agent.territory, before.territory);
    assert_eq!(agent.expanded_total, before.expanded_total);

    // The next cell always costs more than the last one paid for.
    if outcome.bid > 0 && settings.expand_step > 0 {
        assert!(
            expand_price(&before, &settings, outcome.bid)
                > expand_price(&before, &settings, outcome.bid - 1)
        );
    }
});
