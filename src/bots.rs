//! Built-in strategies.
//!
//! Every strategy here answers with a typed [`Command`] converted to a
//! mapping, so it goes through the same parsing as any external policy.
//! Opponent figures that are hidden (no scouting report) read as 0.

mod adaptive;
mod aggressive;
mod defensive;
mod economic;
mod random;
mod simple;

use std::fmt;
use std::str::FromStr;

pub use adaptive::{AdaptiveOpponent, AdaptiveOpponentV2, AdaptiveParams, AdaptiveV2Params};
pub use aggressive::{UltraAggressive, UltraAggressiveParams};
pub use defensive::{TurtleV2, TurtleV2Params, UltraDefensive, UltraDefensiveParams};
pub use economic::{EconomicBoom, EconomicBoomParams, EconomicBoomV2, EconomicBoomV2Params};
pub use random::RandomBot;
pub use simple::{Crashing, GreedyExpansion, Idle};

use crate::game::Command;
use crate::policy::Policy;

/// The built-in strategies, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotKind {
    /// Never does anything.
    Idle,
    /// Picks a random purchase each turn.
    Random,
    /// Spends everything on neutral land.
    GreedyExpansion,
    /// Early rush into attack.
    UltraAggressive,
    /// Defense first, some expansion.
    UltraDefensive,
    /// Defense sized to an estimate of the enemy attack; sells surplus.
    TurtleV2,
    /// Expansion first, then a balanced army.
    EconomicBoom,
    /// Expansion with defense kept ahead of the estimated enemy attack.
    EconomicBoomV2,
    /// Reacts to scouted enemy figures.
    AdaptiveOpponent,
    /// Reacts to scouted figures and to damage taken.
    AdaptiveOpponentV2,
    /// Fails on every call.
    Crashing,
}

impl BotKind {
    /// Every built-in strategy, in listing order.
    pub const ALL: [BotKind; 11] = [
        BotKind::Idle,
        BotKind::Random,
        BotKind::GreedyExpansion,
        BotKind::UltraAggressive,
        BotKind::UltraDefensive,
        BotKind::TurtleV2,
        BotKind::EconomicBoom,
        BotKind::EconomicBoomV2,
        BotKind::AdaptiveOpponent,
        BotKind::AdaptiveOpponentV2,
        BotKind::Crashing,
    ];

    /// Registry name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Random => "random",
            Self::GreedyExpansion => "greedy_expansion",
            Self::UltraAggressive => "ultra_aggressive",
            Self::UltraDefensive => "ultra_defensive",
            Self::TurtleV2 => "turtle_v2",
            Self::EconomicBoom => "economic_boom",
            Self::EconomicBoomV2 => "economic_boom_v2",
            Self::AdaptiveOpponent => "adaptive_opponent",
            Self::AdaptiveOpponentV2 => "adaptive_opponent_v2",
            Self::Crashing => "crashing",
        }
    }

    /// One-line description for listings.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Idle => "plays the empty command every turn",
            Self::Random => "random single purchase, sells a unit when broke (seeded)",
            Self::GreedyExpansion => "bids every coin on neutral land",
            Self::UltraAggressive => "one early cell, then 90% of gold into attack",
            Self::UltraDefensive => "defense up to a floor, 40% of the rest on land",
            Self::TurtleV2 => "defense tracks estimated enemy attack, sells surplus",
            Self::EconomicBoom => "60% on land while neutral lasts, then 30/70 attack/defense",
            Self::EconomicBoomV2 => "75% on land with a defense margin, then 60/40",
            Self::AdaptiveOpponent => "scouts every 4 turns, defends above enemy attack",
            Self::AdaptiveOpponentV2 => "adaptive with damage-based attack inference",
            Self::Crashing => "always fails (robustness testing)",
        }
    }

    /// Build a fresh instance. `seed` only matters for randomised strategies.
    #[must_use]
    pub fn create(self, seed: u64) -> Box<dyn Policy> {
        match self {
            Self::Idle => Box::new(Idle),
            Self::Random => Box::new(RandomBot::new(seed)),
            Self::GreedyExpansion => Box::new(GreedyExpansion),
            Self::UltraAggressive => Box::new(UltraAggressive::default()),
            Self::UltraDefensive => Box::new(UltraDefensive::default()),
            Self::TurtleV2 => Box::new(TurtleV2::default()),
            Self::EconomicBoom => Box::new(EconomicBoom::default()),
            Self::EconomicBoomV2 => Box::new(EconomicBoomV2::default()),
            Self::AdaptiveOpponent => Box::new(AdaptiveOpponent::default()),
            Self::AdaptiveOpponentV2 => Box::new(AdaptiveOpponentV2::default()),
            Self::Crashing => Box::new(Crashing),
        }
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A name that matches no built-in strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bot `{0}`")]
pub struct UnknownBot(pub String);

impl FromStr for BotKind {
    type Err = UnknownBot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownBot(s.to_string()))
    }
}

/// Build a built-in strategy by registry name.
#[must_use]
pub fn by_name(name: &str, seed: u64) -> Option<Box<dyn Policy>> {
    name.parse::<BotKind>().ok().map(|kind| kind.create(seed))
}

/// `percent`% of `gold`, rounded down.
fn share(gold: u64, percent: u64) -> u64 {
    gold.saturating_mul(percent) / 100
}

/// Whole cells or units `budget` covers at a flat `price`.
fn count_at(budget: u64, price: u64) -> u64 {
    budget.checked_div(price).unwrap_or(0)
}

fn to_cells(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Whether a periodic action is due on `turn`. A period of 0 never fires.
fn every(period: u32, turn: u32) -> bool {
    period > 0 && turn % period == 0
}

/// Running estimate of the opponent's hidden attack from own losses.
///
/// Each turn the defense and land lost since the previous turn are weighted
/// and folded into an exponential moving average.
#[derive(Debug, Clone, Copy, Default)]
struct AttackEstimate {
    prev: Option<(u32, u32)>,
    ema: f64,
}

impl AttackEstimate {
    /// Fold in the current defense and land, returning the updated estimate.
    fn update(&mut self, defense: u32, territory: u32, alpha: f64, weights: (f64, f64)) -> f64 {
        let observed = self.prev.map_or(0.0, |(prev_def, prev_land)| {
            f64::from(prev_def.saturating_sub(defense)) * weights.0
                + f64::from(prev_land.saturating_sub(territory)) * weights.1
        });
        self.prev = Some((defense, territory));
        self.ema = alpha * observed + (1.0 - alpha) * self.ema;
        self.ema
    }
}

/// Whole points of an estimate, for comparing against unit counts.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_points(estimate: f64) -> u32 {
    // Saturating float-to-int cast; negatives and NaN become 0.
    estimate as u32
}

fn respond(command: Command) -> Result<serde_json::Value, crate::error::PolicyError> {
    Ok(command.to_value())
}
