//! Expansion-first economies.

use serde_json::Value;

use super::{count_at, every, respond, share, to_cells, whole_points, AttackEstimate};
use crate::error::PolicyError;
use crate::game::{Command, Observation};
use crate::policy::Policy;

/// Tuning for [`EconomicBoom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EconomicBoomParams {
    /// Expansion continues while the pool holds more than this.
    pub neutral_threshold: u32,
    /// Percentage of gold spent on expansion during the boom.
    pub expand_percent: u64,
    /// Defense points wanted during the boom.
    pub min_defense: u32,
    /// Percentage of the remaining gold put into attack; the rest buys defense.
    pub attack_percent: u64,
    /// Scout every turn from this turn on.
    pub scout_after_turn: u32,
}

impl Default for EconomicBoomParams {
    fn default() -> Self {
        Self {
            neutral_threshold: 2,
            expand_percent: 60,
            min_defense: 10,
            attack_percent: 30,
            scout_after_turn: 25,
        }
    }
}

/// Expands while neutral land lasts, then splits income between attack and
/// defense.
#[derive(Debug, Clone, Copy, Default)]
pub struct EconomicBoom {
    params: EconomicBoomParams,
    turn: u32,
}

impl EconomicBoom {
    /// Boom with custom tuning.
    #[must_use]
    pub const fn new(params: EconomicBoomParams) -> Self {
        Self { params, turn: 0 }
    }
}

impl Policy for EconomicBoom {
    fn name(&self) -> &str {
        "economic_boom"
    }

    fn reset(&mut self, _initial: &Observation) {
        self.turn = 0;
    }

    fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
        self.turn += 1;
        let p = self.params;
        let prices = &observation.prices;
        let mut gold = observation.my.gold;
        let mut command = Command::empty();

        if self.turn >= p.scout_after_turn && gold >= prices.scout {
            command.scout = true;
            gold -= prices.scout;
        }

        if observation.neutral_territory > p.neutral_threshold {
            let cells = count_at(share(gold, p.expand_percent), prices.expand_next);
            if cells > 0 {
                command.expand = to_cells(cells);
                gold = gold.saturating_sub(cells.saturating_mul(prices.expand_next));
            }

            if observation.my.defense < p.min_defense && gold >= prices.buy_defense {
                command.spend_defense = gold;
                return respond(command);
            }
        }

        command.spend_attack = share(gold, p.attack_percent);
        command.spend_defense = gold - command.spend_attack;
        respond(command)
    }
}

/// Tuning for [`EconomicBoomV2`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomicBoomV2Params {
    /// Defense kept above the estimated enemy attack.
    pub def_margin: u32,
    /// Scout every this many turns (0 never).
    pub scout_every: u32,
    /// Percentage of gold spent on expansion while neutral land lasts.
    pub expand_percent: u64,
    /// Percentage of gold put into attack once the pool is empty.
    pub post_expand_attack_percent: u64,
    /// Attack surplus over enemy defense tolerated before selling.
    pub sell_attack_threshold: u32,
    /// Smoothing of the damage-based attack estimate.
    pub ema_alpha: f64,
}

impl Default for EconomicBoomV2Params {
    fn default() -> Self {
        Self {
            def_margin: 1,
            scout_every: 5,
            expand_percent: 75,
            post_expand_attack_percent: 60,
            sell_attack_threshold: 8,
            ema_alpha: 0.4,
        }
    }
}

/// Fast expansion that keeps defense just above the estimated enemy attack
/// and sheds attack units the enemy's defense makes useless.
#[derive(Debug, Clone, Copy, Default)]
pub struct EconomicBoomV2 {
    params: EconomicBoomV2Params,
    turn: u32,
    estimate: AttackEstimate,
}

impl EconomicBoomV2 {
    /// Boom with custom tuning.
    #[must_use]
    pub fn new(params: EconomicBoomV2Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }
}

impl Policy for EconomicBoomV2 {
    fn name(&self) -> &str {
        "economic_boom_v2"
    }

    fn reset(&mut self, _initial: &Observation) {
        self.turn = 0;
        self.estimate = AttackEstimate::default();
    }

    fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
        self.turn += 1;
        let p = self.params;
        let prices = &observation.prices;
        let my = observation.my;
        let enemy_defense = observation.enemy.defense.unwrap_or(0);
        let mut gold = my.gold;
        let mut command = Command::empty();

        let inferred = self
            .estimate
            .update(my.defense, my.territory, p.ema_alpha, (1.0, 1.0));
        let seen = f64::from(observation.enemy.attack.unwrap_or(0));
        let target = whole_points(seen.max(inferred)).saturating_add(p.def_margin);

        if every(p.scout_every, self.turn) && gold >= prices.scout {
            command.scout = true;
            gold -= prices.scout;
        }

        if my.defense < target && gold >= prices.buy_defense {
            let need = u64::from(target - my.defense).min(gold);
            command.spend_defense = need;
            gold -= need;
        }

        if observation.neutral_territory > 0 {
            let cells = count_at(share(gold, p.expand_percent), prices.expand_next);
            if cells > 0 {
                command.expand = to_cells(cells);
                gold = gold.saturating_sub(cells.saturating_mul(prices.expand_next));
            }

            if enemy_defense > 0 && enemy_defense < my.attack {
                let budget = share(gold, 25);
                if budget >= prices.buy_attack {
                    command.spend_attack = budget;
                }
            }
        } else {
            let attack = share(gold, p.post_expand_attack_percent);
            command.spend_attack = attack;
            command.spend_defense += gold - attack;
        }

        if enemy_defense > 0 {
            let surplus = my.attack.saturating_sub(enemy_defense);
            if surplus > p.sell_attack_threshold {
                command.sell_attack = (surplus - p.sell_attack_threshold) / 2;
            }
        }

        respond(command)
    }
}
