//! Commands and their application.
//!
//! A strategy answers each turn with a mapping (a JSON object). Recognised
//! keys are `expand`, `spend_attack`, `spend_defense`, `sell_attack`,
//! `sell_defense` and `scout`; anything else is ignored and reported.
//!
//! Application only moves gold and units of the commanding side. Expansion
//! cells are paid for here but granted later by the neutral allocation, once
//! both bids are known.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::GameSettings;
use crate::error::PolicyError;
use crate::game::economy::{
    buy_attack, buy_defense, pay_for_expansion, sell_attack, sell_defense, Purchase, Sale,
};
use crate::game::AgentState;

/// Keys a command may carry.
pub const COMMAND_KEYS: [&str; 6] = [
    "expand",
    "spend_attack",
    "spend_defense",
    "sell_attack",
    "sell_defense",
    "scout",
];

/// One side's orders for a turn. Missing fields are zero / `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Command {
    /// Neutral cells to bid for.
    pub expand: u32,
    /// Gold to convert into attack units.
    pub spend_attack: u64,
    /// Gold to convert into defense units.
    pub spend_defense: u64,
    /// Attack units to sell.
    pub sell_attack: u32,
    /// Defense units to sell.
    pub sell_defense: u32,
    /// Buy a scouting report for next turn.
    pub scout: bool,
}

/// A command read from a raw mapping, with what was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    /// The recognised orders.
    pub command: Command,
    /// Keys outside [`COMMAND_KEYS`].
    pub unknown_keys: Vec<String>,
    /// Recognised keys whose value was not usable and read as zero.
    pub invalid_keys: Vec<String>,
}

impl Command {
    /// The empty command: do nothing this turn.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a command from a strategy's raw answer.
    ///
    /// Numbers are truncated toward zero and negative amounts read as zero;
    /// booleans count as 1 / 0 and `null` as zero.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NotAMapping`] if `value` is not a JSON object.
    pub fn parse(value: &Value) -> Result<ParsedCommand, PolicyError> {
        let Value::Object(map) = value else {
            return Err(PolicyError::NotAMapping(value_kind(value)));
        };
        Ok(Self::from_map(map))
    }

    fn from_map(map: &Map<String, Value>) -> ParsedCommand {
        let mut parsed = ParsedCommand::default();
        for (key, value) in map {
            let cmd = &mut parsed.command;
            let ok = match key.as_str() {
                "expand" => read_amount(value).map(|n| cmd.expand = saturate_u32(n)),
                "spend_attack" => read_amount(value).map(|n| cmd.spend_attack = n),
                "spend_defense" => read_amount(value).map(|n| cmd.spend_defense = n),
                "sell_attack" => read_amount(value).map(|n| cmd.sell_attack = saturate_u32(n)),
                "sell_defense" => read_amount(value).map(|n| cmd.sell_defense = saturate_u32(n)),
                "scout" => read_flag(value).map(|b| cmd.scout = b),
                _ => {
                    parsed.unknown_keys.push(key.clone());
                    continue;
                }
            };
            if ok.is_none() {
                parsed.invalid_keys.push(key.clone());
            }
        }
        parsed
    }

    /// The mapping form a strategy returns.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "expand": self.expand,
            "spend_attack": self.spend_attack,
            "spend_defense": self.spend_defense,
            "sell_attack": self.sell_attack,
            "sell_defense": self.sell_defense,
            "scout": self.scout,
        })
    }
}

impl From<Command> for Value {
    fn from(command: Command) -> Self {
        command.to_value()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn read_amount(value: &Value) -> Option<u64> {
    match value {
        Value::Null => Some(0),
        Value::Bool(b) => Some(u64::from(*b)),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u)
            } else if n.is_i64() {
                Some(0)
            } else {
                // Float: `as` saturates and maps NaN to zero.
                n.as_f64().map(|f| if f > 0.0 { f as u64 } else { 0 })
            }
        }
        _ => None,
    }
}

fn read_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Null => Some(false),
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f.abs() > 0.0),
        _ => None,
    }
}

fn saturate_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Result of a scouting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoutOutcome {
    /// No report requested.
    #[default]
    NotRequested,
    /// Report bought; intel is visible next turn.
    Bought,
    /// Requested but the treasury could not cover it.
    Unaffordable,
}

/// Everything applying one command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    /// Attack units sold.
    pub attack_sold: Sale,
    /// Defense units sold.
    pub defense_sold: Sale,
    /// Cells the command asked for.
    pub expand_requested: u32,
    /// Cells paid for: this side's bid for the neutral allocation.
    pub bid: u32,
    /// Scouting result.
    pub scout: ScoutOutcome,
    /// Gold the command asked to spend on attack.
    pub attack_requested: u64,
    /// Attack units bought.
    pub attack_bought: Purchase,
    /// Gold the command asked to spend on defense.
    pub defense_requested: u64,
    /// Defense units bought.
    pub defense_bought: Purchase,
}

impl CommandOutcome {
    /// Whether intel was bought this turn.
    #[must_use]
    pub fn scouted(&self) -> bool {
        self.scout == ScoutOutcome::Bought
    }

    /// Whether the treasury cut the expansion bid short.
    #[must_use]
    pub fn expansion_limited(&self) -> bool {
        self.bid < self.expand_requested
    }
}

/// Apply `command` to `agent` in the fixed order: sales, expansion bid,
/// scouting, attack spend, defense spend.
pub fn apply_command(
    agent: &mut AgentState,
    command: &Command,
    settings: &GameSettings,
) -> CommandOutcome {
    let mut outcome = CommandOutcome {
        expand_requested: command.expand,
        attack_requested: command.spend_attack,
        defense_requested: command.spend_defense,
        ..CommandOutcome::default()
    };

    if command.sell_attack > 0 {
        outcome.attack_sold = sell_attack(agent, settings, command.sell_attack);
    }
    if command.sell_defense > 0 {
        outcome.defense_sold = sell_defense(agent, settings, command.sell_defense);
    }

    outcome.bid = pay_for_expansion(agent, settings, command.expand);

    if command.scout {
        if agent.gold >= settings.scout_cost {
            agent.gold -= settings.scout_cost;
            outcome.scout = ScoutOutcome::Bought;
        } else {
            outcome.scout = ScoutOutcome::Unaffordable;
        }
    }

    let budget = command.spend_attack.min(agent.gold);
    outcome.attack_bought = buy_attack(agent, settings, budget);

    let budget = command.spend_defense.min(agent.gold);
    outcome.defense_bought = buy_defense(agent, settings, budget);

    outcome
}
