//! Seeded random strategy.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::Value;

use super::respond;
use crate::error::PolicyError;
use crate::game::{Command, Observation};
use crate::policy::Policy;

/// Picks one of expand / attack / defense each turn and buys a single unit
/// of it. When that is unaffordable it sells one random unit instead.
///
/// The generator is re-seeded on every reset, so the same seed replays the
/// same match.
#[derive(Debug, Clone)]
pub struct RandomBot {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomBot {
    /// Bot driven by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomBot {
    fn name(&self) -> &str {
        "random"
    }

    fn reset(&mut self, _initial: &Observation) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
        let gold = observation.limits.gold;
        let prices = &observation.prices;
        let mut command = Command::empty();

        match self.rng.gen_range(0..3) {
            0 if gold >= prices.expand_next => command.expand = 1,
            1 if gold >= prices.buy_attack => command.spend_attack = prices.buy_attack,
            2 if gold >= prices.buy_defense => command.spend_defense = prices.buy_defense,
            _ => {
                if self.rng.gen_bool(0.5) {
                    command.sell_attack = 1;
                } else {
                    command.sell_defense = 1;
                }
            }
        }

        respond(command)
    }
}
