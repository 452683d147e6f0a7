//! Game layer for the territory duel.
//!
//! Implements the rules that every turn runs through:
//! - Agents with gold, land and military units
//! - Economy (income, upkeep, forced demobilisation, rising prices)
//! - Command parsing and application
//! - Neutral allocation between simultaneous expansion bids
//! - Combat resolution
//! - Observations handed to strategies

mod agent;
mod allocation;
mod combat;
mod command;
pub mod economy;
mod invariants;
mod observation;
mod state;

pub use agent::{AgentSnapshot, AgentState, Side};
pub use allocation::{allocate_neutral, split_neutral, Allocation};
pub use combat::{damage, resolve_combat, CombatResult};
pub use command::{
    apply_command, Command, CommandOutcome, ParsedCommand, ScoutOutcome, COMMAND_KEYS,
};
pub use economy::{apply_upkeep, income, upkeep_cost, Purchase, Sale, UpkeepResult};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use observation::{EnemyView, Limits, Observation, PriceSchedule};
pub use state::{History, MatchState, TurnSnapshot};
