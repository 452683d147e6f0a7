//! What a strategy sees at the start of a turn.

use serde::Serialize;

use crate::config::GameSettings;
use crate::game::economy::{attack_price, attack_refund, defense_price, defense_refund, expand_price};
use crate::game::{AgentSnapshot, AgentState};

/// The opponent as seen from one side.
///
/// Territory is public. Gold and military are only filled in when the
/// observer bought a scouting report on the previous turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnemyView {
    /// Opponent's cells.
    pub territory: u32,
    /// Opponent's treasury, with intel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold: Option<u64>,
    /// Opponent's attack units, with intel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack: Option<u32>,
    /// Opponent's defense units, with intel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense: Option<u32>,
}

impl EnemyView {
    /// Whether private figures are visible.
    #[must_use]
    pub const fn has_intel(&self) -> bool {
        self.gold.is_some()
    }
}

/// Current prices for the observing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceSchedule {
    /// Price of the next expansion cell.
    pub expand_next: u64,
    /// Price of the next attack unit.
    pub buy_attack: u64,
    /// Price of the next defense unit.
    pub buy_defense: u64,
    /// Price of a scouting report.
    pub scout: u64,
    /// Refund per attack unit sold.
    pub sell_attack: u64,
    /// Refund per defense unit sold.
    pub sell_defense: u64,
}

impl PriceSchedule {
    /// Prices for `agent` under `settings`.
    #[must_use]
    pub fn for_agent(agent: &AgentState, settings: &GameSettings) -> Self {
        Self {
            expand_next: expand_price(agent, settings, 0),
            buy_attack: attack_price(agent, settings),
            buy_defense: defense_price(agent, settings),
            scout: settings.scout_cost,
            sell_attack: attack_refund(settings),
            sell_defense: defense_refund(settings),
        }
    }
}

/// Spending limits for the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limits {
    /// Gold available to spend.
    pub gold: u64,
}

/// A read-only snapshot built fresh for one side each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Turn being played (0 for the pre-match observation).
    pub turn: u32,
    /// The observer's own figures.
    pub my: AgentSnapshot,
    /// The opponent, intel-gated.
    pub enemy: EnemyView,
    /// Size of the shared neutral pool.
    pub neutral_territory: u32,
    /// Current prices.
    pub prices: PriceSchedule,
    /// Spending limits.
    pub limits: Limits,
}

impl Observation {
    /// Build `me`'s view of the match.
    #[must_use]
    pub fn build(
        me: &AgentState,
        enemy: &AgentState,
        neutral_territory: u32,
        turn: u32,
        settings: &GameSettings,
    ) -> Self {
        let intel = me.has_enemy_intel;
        Self {
            turn,
            my: me.snapshot(),
            enemy: EnemyView {
                territory: enemy.territory,
                gold: intel.then_some(enemy.gold),
                attack: intel.then_some(enemy.attack),
                defense: intel.then_some(enemy.defense),
            },
            neutral_territory,
            prices: PriceSchedule::for_agent(me, settings),
            limits: Limits { gold: me.gold },
        }
    }
}
