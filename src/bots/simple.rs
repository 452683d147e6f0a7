//! Strategies with no parameters.

use serde_json::{json, Value};

use super::{count_at, respond, to_cells};
use crate::error::PolicyError;
use crate::game::{Command, Observation};
use crate::policy::Policy;

/// Plays the empty command every turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Policy for Idle {
    fn name(&self) -> &str {
        "idle"
    }

    fn step(&mut self, _observation: &Observation) -> Result<Value, PolicyError> {
        Ok(json!({}))
    }
}

/// Bids the whole treasury on neutral cells at the current price.
///
/// The price rises with every cell, so the engine usually trims the bid.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyExpansion;

impl Policy for GreedyExpansion {
    fn name(&self) -> &str {
        "greedy_expansion"
    }

    fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
        let affordable = count_at(observation.my.gold, observation.prices.expand_next);
        let plan = to_cells(affordable).min(observation.neutral_territory);
        respond(Command {
            expand: plan,
            ..Command::empty()
        })
    }
}

/// Fails on every turn, alternating between an error and a non-mapping
/// answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crashing;

impl Policy for Crashing {
    fn name(&self) -> &str {
        "crashing"
    }

    fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
        if observation.turn % 2 == 0 {
            Ok(json!(["not", "a", "mapping"]))
        } else {
            Err(PolicyError::failed(format!("refusing turn {}", observation.turn)))
        }
    }
}
