//! Turtles: defense first.

use serde_json::Value;

use super::{count_at, every, respond, share, to_cells, whole_points, AttackEstimate};
use crate::error::PolicyError;
use crate::game::{Command, Observation};
use crate::policy::Policy;

/// Tuning for [`UltraDefensive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UltraDefensiveParams {
    /// Defense points to reach before easing off.
    pub defense_floor: u32,
    /// Opening turns spent almost entirely on defense.
    pub defense_focus_turns: u32,
    /// Gold kept back after spending.
    pub save_for_upkeep: u64,
    /// Percentage of the remaining gold allowed on expansion.
    pub expand_budget_percent: u64,
}

impl Default for UltraDefensiveParams {
    fn default() -> Self {
        Self {
            defense_floor: 20,
            defense_focus_turns: 15,
            save_for_upkeep: 5,
            expand_budget_percent: 40,
        }
    }
}

/// Builds defense up to a floor, expands with part of what is left and puts
/// any further surplus into defense too.
#[derive(Debug, Clone, Copy, Default)]
pub struct UltraDefensive {
    params: UltraDefensiveParams,
    turn: u32,
}

impl UltraDefensive {
    /// Turtle with custom tuning.
    #[must_use]
    pub const fn new(params: UltraDefensiveParams) -> Self {
        Self { params, turn: 0 }
    }
}

impl Policy for UltraDefensive {
    fn name(&self) -> &str {
        "ultra_defensive"
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

        if observation.my.defense < p.defense_floor || self.turn <= p.defense_focus_turns {
            let invest = gold.saturating_sub(p.save_for_upkeep);
            command.spend_defense = invest;
            gold -= invest;
        }

        if observation.neutral_territory > 0 && gold > prices.expand_next {
            let cells = count_at(share(gold, p.expand_budget_percent), prices.expand_next);
            if cells > 0 {
                command.expand = to_cells(cells);
                gold = gold.saturating_sub(cells.saturating_mul(prices.expand_next));
            }
        }

        let surplus = gold.saturating_sub(p.save_for_upkeep);
        if surplus >= prices.buy_defense {
            command.spend_defense += surplus;
        }
        respond(command)
    }
}

/// Tuning for [`TurtleV2`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurtleV2Params {
    /// Defense kept above the estimated enemy attack.
    pub def_margin: u32,
    /// Surplus defense tolerated before selling.
    pub overshoot_sell: u32,
    /// Enemy defense at or below this counts as weak.
    pub enemy_def_weak: u32,
    /// Percentage of the remaining gold put into attack against weak defense.
    pub attack_budget_percent: u64,
    /// Percentage of the remaining gold always spent on expansion.
    pub expand_floor_percent: u64,
    /// Scout every this many turns (0 never).
    pub scout_every: u32,
    /// Smoothing of the damage-based attack estimate.
    pub ema_alpha: f64,
}

impl Default for TurtleV2Params {
    fn default() -> Self {
        Self {
            def_margin: 2,
            overshoot_sell: 5,
            enemy_def_weak: 4,
            attack_budget_percent: 15,
            expand_floor_percent: 30,
            scout_every: 6,
            ema_alpha: 0.5,
        }
    }
}

/// Sizes defense to the estimated enemy attack, selling surplus defense when
/// short of gold, and always spends something on land.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurtleV2 {
    params: TurtleV2Params,
    turn: u32,
    estimate: AttackEstimate,
}

impl TurtleV2 {
    /// Turtle with custom tuning.
    #[must_use]
    pub fn new(params: TurtleV2Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }
}

impl Policy for TurtleV2 {
    fn name(&self) -> &str {
        "turtle_v2"
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

        if my.defense < target {
            let need = u64::from(target - my.defense).min(gold);
            command.spend_defense = need;
            gold -= need;
        } else {
            let excess = my.defense - target;
            if excess > p.overshoot_sell && gold < prices.expand_next {
                let units = (excess - p.overshoot_sell).min(my.defense / 4);
                command.sell_defense = units;
                gold = gold.saturating_add(u64::from(units) * prices.sell_defense);
            }
        }

        if observation.enemy.defense.unwrap_or(0) <= p.enemy_def_weak && gold > 0 {
            let budget = share(gold, p.attack_budget_percent);
            if budget >= prices.buy_attack {
                command.spend_attack = budget;
                gold -= budget;
            }
        }

        if observation.neutral_territory > 0 && gold >= prices.expand_next {
            let cells = count_at(share(gold, p.expand_floor_percent), prices.expand_next).max(1);
            command.expand = to_cells(cells);
        }

        respond(command)
    }
}
