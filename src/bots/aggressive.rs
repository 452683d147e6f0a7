//! All-in rush.

use serde_json::Value;

use super::{every, respond, share};
use crate::error::PolicyError;
use crate::game::{Command, Observation};
use crate::policy::Policy;

/// Tuning for [`UltraAggressive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UltraAggressiveParams {
    /// Gold never spent.
    pub reserve_gold: u64,
    /// Percentage of spendable gold put into attack each turn.
    pub attack_percent: u64,
    /// Cells bought one per turn at the start of the match.
    pub expand_first_n: u32,
    /// Scout every this many turns (0 never).
    pub scout_every: u32,
}

impl Default for UltraAggressiveParams {
    fn default() -> Self {
        Self {
            reserve_gold: 0,
            attack_percent: 90,
            expand_first_n: 1,
            scout_every: 0,
        }
    }
}

/// Takes a cell or two early, then pours nearly everything into attack.
#[derive(Debug, Clone, Copy, Default)]
pub struct UltraAggressive {
    params: UltraAggressiveParams,
    turn: u32,
    expanded: u32,
}

impl UltraAggressive {
    /// Rush with custom tuning.
    #[must_use]
    pub const fn new(params: UltraAggressiveParams) -> Self {
        Self {
            params,
            turn: 0,
            expanded: 0,
        }
    }
}

impl Policy for UltraAggressive {
    fn name(&self) -> &str {
        "ultra_aggressive"
    }

    fn reset(&mut self, _initial: &Observation) {
        self.turn = 0;
        self.expanded = 0;
    }

    fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
        self.turn += 1;
        let prices = &observation.prices;
        let mut gold = observation.my.gold;
        let mut command = Command::empty();

        if every(self.params.scout_every, self.turn) && gold >= prices.scout {
            command.scout = true;
            gold -= prices.scout;
        }

        if self.expanded < self.params.expand_first_n
            && observation.neutral_territory > 0
            && gold >= prices.expand_next
        {
            command.expand = 1;
            gold -= prices.expand_next;
            self.expanded += 1;
        }

        command.spend_attack = share(
            gold.saturating_sub(self.params.reserve_gold),
            self.params.attack_percent,
        );
        respond(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::game::AgentState;

    fn observation(gold: u64) -> Observation {
        let settings = GameSettings::default();
        let me = AgentState {
            gold,
            ..AgentState::new(&settings)
        };
        Observation::build(&me, &AgentState::new(&settings), 40, 1, &settings)
    }

    #[test]
    fn test_expands_once_then_rushes() {
        let mut bot = UltraAggressive::default();
        bot.reset(&observation(80));

        let first = bot.step(&observation(80)).unwrap();
        assert_eq!(first["expand"], 1);
        // (80 - 10) * 0.9
        assert_eq!(first["spend_attack"], 63);

        let second = bot.step(&observation(80)).unwrap();
        assert_eq!(second["expand"], 0);
        assert_eq!(second["spend_attack"], 72);
    }

    #[test]
    fn test_reserve_and_scouting() {
        let mut bot = UltraAggressive::new(UltraAggressiveParams {
            reserve_gold: 10,
            attack_percent: 50,
            expand_first_n: 0,
            scout_every: 1,
        });
        bot.reset(&observation(70));
        let answer = bot.step(&observation(70)).unwrap();
        assert_eq!(answer["scout"], true);
        // (70 - 20 - 10) / 2
        assert_eq!(answer["spend_attack"], 20);
    }
}
