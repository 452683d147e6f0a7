//! Integration tests for complete matches.
//!
//! Fixed rule scenarios, full matches between the built-in bots, and the
//! engine's handling of misbehaving strategies.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use serde_json::{json, Value};
use territory_duel::bots::BotKind;
use territory_duel::game::{check_invariants, resolve_combat, split_neutral, InvariantViolation};
use territory_duel::{
    check_winner, AgentState, Engine, GameSettings, MatchState, Observation, Phase, Policy,
    PolicyError, Side, Winner,
};

/// Cells in play with the default settings.
const DEFAULT_CELLS: u64 = 30 + 30 + 40;

fn settings(max_turns: u32) -> GameSettings {
    GameSettings::default().with_max_turns(max_turns)
}

/// Strategy that panics on every call.
struct Panicking;

impl Policy for Panicking {
    fn name(&self) -> &str {
        "panicking"
    }

    fn reset(&mut self, _initial: &Observation) {
        panic!("reset exploded");
    }

    fn step(&mut self, _observation: &Observation) -> Result<Value, PolicyError> {
        panic!("step exploded");
    }
}

/// Strategy replaying a fixed answer every turn.
struct Scripted(Value);

impl Policy for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn step(&mut self, _observation: &Observation) -> Result<Value, PolicyError> {
        Ok(self.0.clone())
    }
}

// =============================================================================
// Rule scenarios
// =============================================================================

#[test]
fn test_fully_contested_bids_grant_nothing() {
    let allocation = split_neutral(3, 3, 5);
    assert_eq!(allocation.contested, 3);
    assert_eq!(allocation.granted_p1, 0);
    assert_eq!(allocation.granted_p2, 0);
    assert_eq!(allocation.neutral_after, 5);
}

#[test]
fn test_uncontested_bid_is_granted() {
    let allocation = split_neutral(3, 0, 4);
    assert_eq!(allocation.contested, 0);
    assert_eq!(allocation.granted_p1, 3);
    assert_eq!(allocation.granted_p2, 0);
    assert_eq!(allocation.neutral_after, 1);
}

#[test]
fn test_combat_losses_return_to_neutral() {
    let mut p1 = AgentState {
        territory: 30,
        attack: 12,
        defense: 5,
        ..AgentState::default()
    };
    let mut p2 = AgentState {
        territory: 30,
        attack: 5,
        defense: 10,
        ..AgentState::default()
    };
    let mut neutral = 0;

    let result = resolve_combat(&mut p1, &mut p2, &mut neutral);

    assert_eq!(result.damage_by_p1, 2);
    assert_eq!(result.damage_by_p2, 0);
    assert_eq!((p1.territory, p2.territory, neutral), (30, 28, 2));
}

#[test]
fn test_elimination_decides_winner() {
    let mut state = MatchState::new(&GameSettings::default());
    state.agent_mut(Side::Player1).territory = 0;
    state.agent_mut(Side::Player2).territory = 10;
    assert_eq!(check_winner(&state, false), Some(Winner::Player2));

    state.agent_mut(Side::Player2).territory = 0;
    assert_eq!(check_winner(&state, false), Some(Winner::Draw));
    // Elimination outranks the treasury comparison.
    state.agent_mut(Side::Player1).gold = 1_000;
    assert_eq!(check_winner(&state, true), Some(Winner::Draw));
}

#[test]
fn test_turn_limit_compares_gold() {
    let mut state = MatchState::new(&GameSettings::default());
    state.agent_mut(Side::Player1).gold = 100;
    state.agent_mut(Side::Player2).gold = 50;
    assert_eq!(check_winner(&state, false), None);
    assert_eq!(check_winner(&state, true), Some(Winner::Player1));

    state.agent_mut(Side::Player2).gold = 100;
    assert_eq!(check_winner(&state, true), Some(Winner::Draw));
}

// =============================================================================
// Misbehaving strategies
// =============================================================================

#[test]
fn test_failing_policy_still_completes_match() {
    let mut engine = Engine::new(
        BotKind::Crashing.create(0),
        BotKind::Idle.create(0),
        settings(30),
    );
    let result = engine.run();

    assert_eq!(engine.phase(), Phase::Finished);
    assert_eq!(result.turns_played, 30);
    // Both sides only collected income, so the treasuries match.
    assert_eq!(result.player1, result.player2);
    assert_eq!(result.winner, Some(Winner::Draw));
}

#[test]
fn test_panicking_policy_plays_empty_commands() {
    let mut lines = Vec::new();
    let result = {
        let mut engine = Engine::new(
            Box::new(Panicking),
            BotKind::GreedyExpansion.create(0),
            settings(20),
        )
        .with_trace(|line: &str| lines.push(line.to_string()));
        engine.run()
    };

    assert_eq!(result.turns_played, 20);
    assert_eq!(result.player1.territory, 30);
    assert!(result.player2.territory > 30);
    assert!(lines.iter().any(|l| l.contains("reset failed")));
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("[ERROR] P1")).count(),
        20
    );
}

#[test]
fn test_non_mapping_answer_is_a_failure() {
    let mut lines = Vec::new();
    {
        let mut engine = Engine::new(
            Box::new(Scripted(json!([1, 2, 3]))),
            BotKind::Idle.create(0),
            settings(3),
        )
        .with_trace(|line: &str| lines.push(line.to_string()));
        engine.run();
    }
    assert_eq!(lines.iter().filter(|l| l.contains("[ERROR]")).count(), 3);
}

#[test]
fn test_loose_command_values_are_coerced() {
    let mut lines = Vec::new();
    let result = {
        let mut engine = Engine::new(
            Box::new(Scripted(json!({
                "expand": 1.9,
                "spend_defense": -5,
                "scout": "yes",
                "taunt": "hello",
            }))),
            BotKind::Idle.create(0),
            settings(1),
        )
        .with_trace(|line: &str| lines.push(line.to_string()));
        engine.run()
    };

    // One cell bought at the base price after 30 income.
    assert_eq!(result.player1.territory, 31);
    assert_eq!(result.player1.defense, 0);
    assert!(lines.iter().any(|l| l.contains("unknown key 'taunt'")));
    assert!(lines.iter().any(|l| l.contains("'scout'")));
}

// =============================================================================
// Full matches
// =============================================================================

#[test]
fn test_every_pairing_completes_with_invariants() {
    for bot1 in BotKind::ALL {
        for bot2 in BotKind::ALL {
            let mut engine = Engine::new(bot1.create(7), bot2.create(8), settings(60));
            let result = engine.run();

            assert_eq!(engine.phase(), Phase::Finished, "{bot1} vs {bot2}");
            assert!(result.winner.is_some(), "{bot1} vs {bot2}");
            assert!(result.turns_played <= 60, "{bot1} vs {bot2}");
            // Starting position plus one snapshot per turn.
            assert_eq!(engine.history().len(), result.turns_played as usize + 1);

            let violations: Vec<InvariantViolation> =
                check_invariants(engine.state(), DEFAULT_CELLS);
            assert!(violations.is_empty(), "{bot1} vs {bot2}: {violations:?}");
        }
    }
}

#[test]
fn test_history_conserves_cells_every_turn() {
    let mut engine = Engine::new(
        BotKind::UltraAggressive.create(1),
        BotKind::EconomicBoom.create(2),
        GameSettings::default(),
    );
    engine.run();

    for snap in engine.history().iter() {
        let cells =
            u64::from(snap.p1.territory) + u64::from(snap.p2.territory) + u64::from(snap.neutral);
        assert_eq!(cells, DEFAULT_CELLS, "turn {}", snap.turn);
    }
    let turns: Vec<u32> = engine.history().iter().map(|s| s.turn).collect();
    assert_eq!(turns, (0..=engine.state().turn).collect::<Vec<_>>());
}

#[test]
fn test_greedy_beats_idle_on_gold() {
    let mut engine = Engine::new(
        BotKind::GreedyExpansion.create(0),
        BotKind::Idle.create(0),
        GameSettings::default(),
    );
    let result = engine.run();

    assert_eq!(result.turns_played, 200);
    assert!(result.player1.territory > result.player2.territory);
    assert_eq!(result.winner, Some(Winner::Player1));
}

#[test]
fn test_same_seed_same_match() {
    let play = || {
        let mut engine = Engine::new(
            BotKind::Random.create(11),
            BotKind::AdaptiveOpponentV2.create(12),
            GameSettings::default(),
        );
        let result = engine.run();
        (result, engine.history().clone())
    };
    assert_eq!(play(), play());
}

#[test]
fn test_trace_sink_does_not_change_outcome() {
    let untraced = {
        let mut engine = Engine::new(
            BotKind::Random.create(3),
            BotKind::TurtleV2.create(4),
            GameSettings::default(),
        );
        engine.run()
    };

    let mut lines = Vec::new();
    let traced = {
        let mut engine = Engine::new(
            BotKind::Random.create(3),
            BotKind::TurtleV2.create(4),
            GameSettings::default(),
        )
        .with_trace(|line: &str| lines.push(line.to_string()));
        engine.run()
    };

    assert_eq!(untraced, traced);
    assert!(lines[0].starts_with("=== match start"));
    assert!(lines.last().unwrap().starts_with("=== result"));
    let turn_headers = lines.iter().filter(|l| l.starts_with("--- turn")).count();
    assert_eq!(turn_headers, traced.turns_played as usize);
}

#[test]
fn test_custom_settings_from_json() {
    let settings = GameSettings::from_json_str(r#"{"max_turns": 5, "neutral_territory": 0}"#)
        .unwrap();
    let mut engine = Engine::new(
        BotKind::GreedyExpansion.create(0),
        BotKind::GreedyExpansion.create(0),
        settings,
    );
    let result = engine.run();

    assert_eq!(result.turns_played, 5);
    assert_eq!(result.neutral_pool, 0);
    assert_eq!(result.player1.territory, 30);
    assert_eq!(result.winner, Some(Winner::Draw));
}
