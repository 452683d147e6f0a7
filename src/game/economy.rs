//! Economy: income, upkeep, forced demobilisation and pricing curves.
//!
//! # Upkeep
//!
//! Each turn a side earns `territory × gold_per_land` and then pays
//! `attack × maint_attack + defense × maint_defense`. When the treasury
//! cannot cover upkeep, units are disbanded one at a time and each disbanded
//! unit cancels its own upkeep. Attack units always go first; defense units
//! are only touched once no attack unit is left. A deficit that survives
//! both is written off and the treasury ends at zero.
//!
//! # Prices
//!
//! All purchase prices rise with quantity:
//!
//! - expansion: `expand_base + expand_step × (lifetime cells + cells already paid this batch)`
//! - attack unit: `attack_base + attack_slope × attack units held`
//! - defense unit: `defense_base + defense_slope × defense units held`
//!
//! Selling a unit refunds half of its base price, rounded down.

use crate::config::GameSettings;
use crate::game::AgentState;

/// Gold earned this turn.
#[must_use]
pub fn income(agent: &AgentState, settings: &GameSettings) -> u64 {
    u64::from(agent.territory).saturating_mul(settings.gold_per_land)
}

/// Gold owed this turn for the units currently held.
#[must_use]
pub fn upkeep_cost(agent: &AgentState, settings: &GameSettings) -> u64 {
    u64::from(agent.attack)
        .saturating_mul(settings.maint_attack)
        .saturating_add(u64::from(agent.defense).saturating_mul(settings.maint_defense))
}

/// What [`apply_upkeep`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpkeepResult {
    /// Upkeep owed before any demobilisation.
    pub cost: u64,
    /// Attack units disbanded to cover a deficit.
    pub attack_disbanded: u32,
    /// Defense units disbanded to cover a deficit.
    pub defense_disbanded: u32,
    /// Deficit left after every unit was gone; written off.
    pub written_off: u64,
}

/// Charge upkeep, disbanding units when the treasury runs dry.
pub fn apply_upkeep(agent: &mut AgentState, settings: &GameSettings) -> UpkeepResult {
    let cost = upkeep_cost(agent, settings);
    let mut result = UpkeepResult {
        cost,
        ..UpkeepResult::default()
    };

    if agent.gold >= cost {
        agent.gold -= cost;
        return result;
    }

    let mut deficit = cost - agent.gold;
    let mut surplus = 0u64;

    while deficit > 0 && agent.attack > 0 {
        agent.attack -= 1;
        result.attack_disbanded += 1;
        absorb_refund(&mut deficit, &mut surplus, settings.maint_attack);
    }
    while deficit > 0 && agent.defense > 0 {
        agent.defense -= 1;
        result.defense_disbanded += 1;
        absorb_refund(&mut deficit, &mut surplus, settings.maint_defense);
    }

    result.written_off = deficit;
    agent.gold = surplus;
    result
}

/// Apply one disbanded unit's upkeep against the deficit; overshoot is kept.
fn absorb_refund(deficit: &mut u64, surplus: &mut u64, refund: u64) {
    if refund >= *deficit {
        *surplus = refund - *deficit;
        *deficit = 0;
    } else {
        *deficit -= refund;
    }
}

/// Price of the next expansion cell after `already_paid` cells this batch.
#[must_use]
pub fn expand_price(agent: &AgentState, settings: &GameSettings, already_paid: u32) -> u64 {
    let n = u64::from(agent.expanded_total) + u64::from(already_paid);
    settings
        .expand_base
        .saturating_add(settings.expand_step.saturating_mul(n))
}

/// Price of the next attack unit.
#[must_use]
pub fn attack_price(agent: &AgentState, settings: &GameSettings) -> u64 {
    settings
        .attack_base
        .saturating_add(settings.attack_slope.saturating_mul(u64::from(agent.attack)))
}

/// Price of the next defense unit.
#[must_use]
pub fn defense_price(agent: &AgentState, settings: &GameSettings) -> u64 {
    settings
        .defense_base
        .saturating_add(settings.defense_slope.saturating_mul(u64::from(agent.defense)))
}

/// Refund for selling one attack unit.
#[must_use]
pub const fn attack_refund(settings: &GameSettings) -> u64 {
    settings.attack_base / 2
}

/// Refund for selling one defense unit.
#[must_use]
pub const fn defense_refund(settings: &GameSettings) -> u64 {
    settings.defense_base / 2
}

/// Pay for up to `wanted` expansion cells at the rising price.
///
/// Gold is charged per cell immediately, whether or not the cell is later
/// granted. Returns how many cells were paid for.
///
/// A zero price stops the batch: such settings fail
/// [`GameSettings::validate`], and the loop must stay bounded regardless.
pub fn pay_for_expansion(agent: &mut AgentState, settings: &GameSettings, wanted: u32) -> u32 {
    let mut paid = 0;
    while paid < wanted {
        let price = expand_price(agent, settings, paid);
        if price == 0 || agent.gold < price {
            break;
        }
        agent.gold -= price;
        paid += 1;
    }
    paid
}

/// A purchase of military units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Purchase {
    /// Units bought.
    pub units: u32,
    /// Gold spent.
    pub spent: u64,
}

/// Buy attack units one at a time while the next unit fits in `budget`.
///
/// `budget` must not exceed the treasury. A zero price buys nothing; see
/// [`GameSettings::validate`].
pub fn buy_attack(agent: &mut AgentState, settings: &GameSettings, budget: u64) -> Purchase {
    let mut purchase = Purchase::default();
    loop {
        let price = attack_price(agent, settings);
        if price == 0 || budget - purchase.spent < price || agent.attack == u32::MAX {
            break;
        }
        agent.attack += 1;
        purchase.units += 1;
        purchase.spent += price;
    }
    agent.gold -= purchase.spent;
    purchase
}

/// Buy defense units one at a time while the next unit fits in `budget`.
///
/// `budget` must not exceed the treasury. A zero price buys nothing; see
/// [`GameSettings::validate`].
pub fn buy_defense(agent: &mut AgentState, settings: &GameSettings, budget: u64) -> Purchase {
    let mut purchase = Purchase::default();
    loop {
        let price = defense_price(agent, settings);
        if price == 0 || budget - purchase.spent < price || agent.defense == u32::MAX {
            break;
        }
        agent.defense += 1;
        purchase.units += 1;
        purchase.spent += price;
    }
    agent.gold -= purchase.spent;
    purchase
}

/// A liquidation of military units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sale {
    /// Units actually sold (capped at units held).
    pub units: u32,
    /// Gold credited.
    pub refund: u64,
}

/// Sell up to `units` attack units at the flat refund.
pub fn sell_attack(agent: &mut AgentState, settings: &GameSettings, units: u32) -> Sale {
    let units = units.min(agent.attack);
    let refund = u64::from(units).saturating_mul(attack_refund(settings));
    agent.attack -= units;
    agent.gold = agent.gold.saturating_add(refund);
    Sale { units, refund }
}

/// Sell up to `units` defense units at the flat refund.
pub fn sell_defense(agent: &mut AgentState, settings: &GameSettings, units: u32) -> Sale {
    let units = units.min(agent.defense);
    let refund = u64::from(units).saturating_mul(defense_refund(settings));
    agent.defense -= units;
    agent.gold = agent.gold.saturating_add(refund);
    Sale { units, refund }
}

/// Kani formal verification proofs.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Deficit absorption never leaves both a deficit and a surplus.
    #[kani::proof]
    fn prove_absorb_refund_exclusive() {
        let mut deficit: u64 = kani::any();
        let mut surplus: u64 = 0;
        let refund: u64 = kani::any();

        absorb_refund(&mut deficit, &mut surplus, refund);

        assert!(deficit == 0 || surplus == 0);
    }

    /// Upkeep never underflows the treasury.
    #[kani::proof]
    #[kani::unwind(6)]
    fn prove_upkeep_bounded() {
        let settings = GameSettings::default();
        let mut agent = AgentState {
            gold: kani::any(),
            attack: kani::any::<u8>().min(4).into(),
            defense: kani::any::<u8>().min(4).into(),
            ..AgentState::default()
        };
        let before_attack = agent.attack;
        let result = apply_upkeep(&mut agent, &settings);
        assert!(result.attack_disbanded <= before_attack);
    }
}
