//! Strategies that react to what they learn about the opponent.

use serde_json::Value;

use super::{count_at, every, respond, share, to_cells, whole_points, AttackEstimate};
use crate::error::PolicyError;
use crate::game::{Command, Observation};
use crate::policy::Policy;

/// Tuning for [`AdaptiveOpponent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveParams {
    /// Scout every this many turns (0 never).
    pub scout_every: u32,
    /// Defense kept above the enemy's attack.
    pub defense_margin: u32,
    /// Enemy defense at or below this invites an attack.
    pub enemy_def_threshold: u32,
    /// Percentage of the remaining gold put into attack.
    pub attack_budget_percent: u64,
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        Self {
            scout_every: 4,
            defense_margin: 2,
            enemy_def_threshold: 5,
            attack_budget_percent: 20,
        }
    }
}

/// Keeps defense above the scouted enemy attack, attacks weak defenses and
/// spends what is left on land.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveOpponent {
    params: AdaptiveParams,
    turn: u32,
}

impl AdaptiveOpponent {
    /// Adaptive strategy with custom tuning.
    #[must_use]
    pub const fn new(params: AdaptiveParams) -> Self {
        Self { params, turn: 0 }
    }
}

/// The shared decision of both adaptive strategies, given an estimate of the
/// enemy attack and the share of leftover gold allowed on expansion.
fn adaptive_command(
    observation: &Observation,
    params: &AdaptiveParams,
    turn: u32,
    estimated_attack: u32,
    expand_percent: u64,
) -> Command {
    let prices = &observation.prices;
    let my = observation.my;
    let mut gold = my.gold;
    let mut command = Command::empty();

    if every(params.scout_every, turn) && gold >= prices.scout {
        command.scout = true;
        gold -= prices.scout;
    }

    let desired = estimated_attack.saturating_add(params.defense_margin);
    if my.defense < desired && gold >= prices.buy_defense {
        let invest = u64::from(desired - my.defense).min(gold);
        command.spend_defense = invest;
        gold -= invest;
    }

    if observation.enemy.defense.unwrap_or(0) <= params.enemy_def_threshold && gold > 0 {
        let budget = share(gold, params.attack_budget_percent);
        command.spend_attack = budget;
        gold -= budget;
    }

    if observation.neutral_territory > 0 && gold >= prices.expand_next {
        let cells = count_at(share(gold, expand_percent), prices.expand_next);
        command.expand = to_cells(cells);
    }

    command
}

impl Policy for AdaptiveOpponent {
    fn name(&self) -> &str {
        "adaptive_opponent"
    }

    fn reset(&mut self, _initial: &Observation) {
        self.turn = 0;
    }

    fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
        self.turn += 1;
        let enemy_attack = observation.enemy.attack.unwrap_or(0);
        respond(adaptive_command(
            observation,
            &self.params,
            self.turn,
            enemy_attack,
            100,
        ))
    }
}

/// Tuning for [`AdaptiveOpponentV2`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveV2Params {
    /// The reactive core shared with [`AdaptiveOpponent`].
    pub base: AdaptiveParams,
    /// Percentage of leftover gold spent on expansion.
    pub expand_floor_percent: u64,
    /// Smoothing of the damage-based attack estimate.
    pub infer_alpha: f64,
    /// Weight of lost defense points in the estimate.
    pub defense_loss_weight: f64,
    /// Weight of lost cells in the estimate.
    pub territory_loss_weight: f64,
}

impl Default for AdaptiveV2Params {
    fn default() -> Self {
        Self {
            base: AdaptiveParams::default(),
            expand_floor_percent: 40,
            infer_alpha: 0.5,
            defense_loss_weight: 1.0,
            territory_loss_weight: 1.0,
        }
    }
}

/// [`AdaptiveOpponent`] that also infers hidden enemy attack from its own
/// losses, and keeps part of its gold back from expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveOpponentV2 {
    params: AdaptiveV2Params,
    turn: u32,
    estimate: AttackEstimate,
}

impl AdaptiveOpponentV2 {
    /// Adaptive strategy with custom tuning.
    #[must_use]
    pub fn new(params: AdaptiveV2Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }
}

impl Policy for AdaptiveOpponentV2 {
    fn name(&self) -> &str {
        "adaptive_opponent_v2"
    }

    fn reset(&mut self, _initial: &Observation) {
        self.turn = 0;
        self.estimate = AttackEstimate::default();
    }

    fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
        self.turn += 1;
        let p = self.params;
        let inferred = self.estimate.update(
            observation.my.defense,
            observation.my.territory,
            p.infer_alpha,
            (p.defense_loss_weight, p.territory_loss_weight),
        );
        let seen = f64::from(observation.enemy.attack.unwrap_or(0));
        respond(adaptive_command(
            observation,
            &p.base,
            self.turn,
            whole_points(seen.max(inferred)),
            p.expand_floor_percent,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::game::AgentState;

    fn observation(gold: u64, territory: u32, enemy: Option<(u32, u32)>) -> Observation {
        let settings = GameSettings::default();
        let me = AgentState {
            gold,
            territory,
            has_enemy_intel: enemy.is_some(),
            ..AgentState::new(&settings)
        };
        let (attack, defense) = enemy.unwrap_or((0, 0));
        let them = AgentState {
            attack,
            defense,
            ..AgentState::new(&settings)
        };
        Observation::build(&me, &them, 40, 1, &settings)
    }

    #[test]
    fn test_defends_above_scouted_attack() {
        let mut bot = AdaptiveOpponent::default();
        let answer = bot.step(&observation(100, 30, Some((6, 20)))).unwrap();
        assert_eq!(answer["spend_defense"], 8);
        // Enemy defense 20 is too strong to attack.
        assert_eq!(answer["spend_attack"], 0);
        // 92 left: 9 cells at 10.
        assert_eq!(answer["expand"], 9);
    }

    #[test]
    fn test_hidden_enemy_reads_as_zero() {
        let mut bot = AdaptiveOpponent::default();
        let answer = bot.step(&observation(100, 30, None)).unwrap();
        assert_eq!(answer["spend_defense"], 2);
        // 98 left: 19 into attack, 79 -> 7 cells.
        assert_eq!(answer["spend_attack"], 19);
        assert_eq!(answer["expand"], 7);
    }

    #[test]
    fn test_scouts_on_schedule() {
        let mut bot = AdaptiveOpponent::default();
        bot.reset(&observation(100, 30, None));
        let scouts: Vec<bool> = (0..8)
            .map(|_| bot.step(&observation(100, 30, None)).unwrap()["scout"] == true)
            .collect();
        assert_eq!(scouts, vec![false, false, false, true, false, false, false, true]);
    }

    #[test]
    fn test_v2_infers_attack_from_losses() {
        let mut bot = AdaptiveOpponentV2::default();
        bot.step(&observation(100, 30, None)).unwrap();
        // 10 cells lost: estimate 5, desired defense 7.
        let answer = bot.step(&observation(100, 20, None)).unwrap();
        assert_eq!(answer["spend_defense"], 7);
    }

    #[test]
    fn test_v2_holds_back_from_expansion() {
        let mut bot = AdaptiveOpponentV2::default();
        let answer = bot.step(&observation(100, 30, Some((0, 20)))).unwrap();
        // 98 after defense, 40% -> 39 -> 3 cells.
        assert_eq!(answer["expand"], 3);
    }
}
