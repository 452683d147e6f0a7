//! Turn orchestrator.
//!
//! An [`Engine`] owns the match state and both policies and runs the fixed
//! turn sequence:
//!
//! 1. Economy for both sides (income, then upkeep with forced demobilisation)
//! 2. Observations for both sides, built before anyone acts
//! 3. One policy call per side; failures become the empty command
//! 4. Command application per side (gold and units only)
//! 5. Neutral allocation of both expansion bids
//! 6. Combat
//! 7. Intel flags from this turn's scouting
//! 8. Turn counter, history snapshot, termination check
//!
//! Both policies are queried before either command is applied, and each
//! command only touches its own side, so the order in which sides are
//! processed cannot change the outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GameSettings;
use crate::game::{
    allocate_neutral, apply_command, apply_upkeep, assert_invariants, income, resolve_combat,
    AgentSnapshot, Command, CommandOutcome, History, MatchState, Observation, ScoutOutcome, Side,
};
use crate::policy::{guarded_reset, guarded_step, Policy};
use crate::trace::{TraceSink, Tracer};

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created but not reset yet.
    NotStarted,
    /// Turns are being played.
    InProgress,
    /// A winner (or a draw) has been declared.
    Finished,
}

/// Outcome of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// Player 1 won.
    Player1,
    /// Player 2 won.
    Player2,
    /// Nobody won.
    Draw,
}

impl Winner {
    /// The winning side, if any.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Player1 => Some(Side::Player1),
            Self::Player2 => Some(Side::Player2),
            Self::Draw => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player1 => write!(f, "player1"),
            Self::Player2 => write!(f, "player2"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// Summary of a match, complete once the engine has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// `None` until the match is finished.
    pub winner: Option<Winner>,
    /// Completed turns.
    pub turns_played: u32,
    /// Final neutral pool.
    pub neutral_pool: u32,
    /// Player 1's final figures.
    pub player1: AgentSnapshot,
    /// Player 2's final figures.
    pub player2: AgentSnapshot,
}

impl MatchResult {
    /// One side's final figures.
    #[must_use]
    pub const fn agent(&self, side: Side) -> &AgentSnapshot {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }

    /// Whether the match ended because a side lost all its land.
    #[must_use]
    pub const fn by_elimination(&self) -> bool {
        self.player1.territory == 0 || self.player2.territory == 0
    }
}

/// Decide the winner of `state`, if there is one yet.
///
/// A side with no land loses, and both sides without land is a draw. When
/// `at_turn_limit` is set and both sides still hold land, the larger
/// treasury wins and equal treasuries draw.
#[must_use]
pub fn check_winner(state: &MatchState, at_turn_limit: bool) -> Option<Winner> {
    let p1 = state.agent(Side::Player1);
    let p2 = state.agent(Side::Player2);
    match (p1.is_eliminated(), p2.is_eliminated()) {
        (true, true) => Some(Winner::Draw),
        (true, false) => Some(Winner::Player2),
        (false, true) => Some(Winner::Player1),
        (false, false) if at_turn_limit => Some(match p1.gold.cmp(&p2.gold) {
            std::cmp::Ordering::Greater => Winner::Player1,
            std::cmp::Ordering::Less => Winner::Player2,
            std::cmp::Ordering::Equal => Winner::Draw,
        }),
        (false, false) => None,
    }
}

/// Runs one match between two policies.
pub struct Engine<'a> {
    policies: [Box<dyn Policy + 'a>; 2],
    settings: GameSettings,
    tracer: Tracer<'a>,
    state: MatchState,
    phase: Phase,
    winner: Option<Winner>,
    /// Cells in play, fixed at reset.
    total_cells: u64,
}

impl fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("player1", &self.policies[0].name())
            .field("player2", &self.policies[1].name())
            .field("phase", &self.phase)
            .field("turn", &self.state.turn)
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

impl<'a> Engine<'a> {
    /// Create an engine for `player1` against `player2`.
    ///
    /// Settings are taken as given; callers loading them from outside should
    /// run [`GameSettings::validate`] first.
    #[must_use]
    pub fn new(
        player1: Box<dyn Policy + 'a>,
        player2: Box<dyn Policy + 'a>,
        settings: GameSettings,
    ) -> Self {
        if let Err(err) = settings.validate() {
            log::warn!("engine created with settings that fail validation: {err}");
        }
        let state = MatchState::new(&settings);
        let total_cells = state.total_cells();
        Self {
            policies: [player1, player2],
            settings,
            tracer: Tracer::silent(),
            state,
            phase: Phase::NotStarted,
            winner: None,
            total_cells,
        }
    }

    /// Deliver trace lines to `sink`.
    #[must_use]
    pub fn with_trace(mut self, sink: impl TraceSink + 'a) -> Self {
        self.tracer = Tracer::with_sink(sink);
        self
    }

    /// Start a fresh match: initial state, then `reset` on both policies.
    pub fn reset(&mut self) {
        self.state = MatchState::new(&self.settings);
        self.total_cells = self.state.total_cells();
        self.phase = Phase::InProgress;
        self.winner = None;

        let names = [self.policies[0].name(), self.policies[1].name()];
        log::info!("match start: {} vs {}", names[0], names[1]);
        self.tracer
            .emit(|| format!("=== match start: P1 {} vs P2 {} ===", names[0], names[1]));

        for side in Side::BOTH {
            let initial = self.observation(side, 0);
            if let Err(err) = guarded_reset(self.policies[side.index()].as_mut(), &initial) {
                log::warn!("{side} ({}) failed to reset: {err}", self.policies[side.index()].name());
                self.tracer.emit(|| format!("{side} reset failed: {err}"));
            }
        }

        self.check_termination();
    }

    /// Play one turn, resetting first if the match has not started.
    ///
    /// Does nothing once the match is finished. Returns the phase after
    /// the turn.
    pub fn play_turn(&mut self) -> Phase {
        match self.phase {
            Phase::NotStarted => self.reset(),
            Phase::InProgress => {}
            Phase::Finished => return self.phase,
        }
        if self.phase == Phase::Finished {
            return self.phase;
        }

        let turn = self.state.turn + 1;
        self.tracer.emit(|| format!("--- turn {turn} ---"));

        self.run_economy();

        let observations = Side::BOTH.map(|side| self.observation(side, turn));

        let mut commands = [Command::empty(); 2];
        for side in Side::BOTH {
            commands[side.index()] = self.decide(side, &observations[side.index()], turn);
        }

        let mut outcomes = [CommandOutcome::default(); 2];
        for side in Side::BOTH {
            outcomes[side.index()] = self.apply(side, &commands[side.index()]);
        }

        self.resolve(&outcomes);

        for side in Side::BOTH {
            self.state.agent_mut(side).has_enemy_intel = outcomes[side.index()].scouted();
        }

        self.state.advance_turn();
        self.state.record_snapshot();
        assert_invariants(&self.state, self.total_cells);

        self.check_termination();
        self.phase
    }

    /// Reset, then play until a winner is declared.
    pub fn run(&mut self) -> MatchResult {
        self.reset();
        while self.phase != Phase::Finished {
            self.play_turn();
        }
        self.result()
    }

    /// Current summary; `winner` is `None` until the match is finished.
    #[must_use]
    pub fn result(&self) -> MatchResult {
        MatchResult {
            winner: self.winner,
            turns_played: self.state.turn,
            neutral_pool: self.state.neutral,
            player1: self.state.agent(Side::Player1).snapshot(),
            player2: self.state.agent(Side::Player2).snapshot(),
        }
    }

    /// Current match state.
    #[must_use]
    pub const fn state(&self) -> &MatchState {
        &self.state
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Snapshots recorded so far.
    #[must_use]
    pub const fn history(&self) -> &History {
        self.state.history()
    }

    /// Settings in force.
    #[must_use]
    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Name of the policy playing `side`.
    #[must_use]
    pub fn policy_name(&self, side: Side) -> &str {
        self.policies[side.index()].name()
    }

    fn observation(&self, side: Side, turn: u32) -> Observation {
        Observation::build(
            self.state.agent(side),
            self.state.agent(side.opponent()),
            self.state.neutral,
            turn,
            &self.settings,
        )
    }

    fn run_economy(&mut self) {
        for side in Side::BOTH {
            let agent = self.state.agent_mut(side);
            let earned = income(agent, &self.settings);
            agent.gold = agent.gold.saturating_add(earned);
            let upkeep = apply_upkeep(agent, &self.settings);
            let gold = agent.gold;

            self.tracer.emit(|| {
                format!("{side} income=+{earned} upkeep=-{} gold={gold}", upkeep.cost)
            });
            if upkeep.attack_disbanded > 0 || upkeep.defense_disbanded > 0 {
                self.tracer.emit(|| {
                    format!(
                        "{side} upkeep shortfall: disbanded {} atk, {} def",
                        upkeep.attack_disbanded, upkeep.defense_disbanded
                    )
                });
            }
            if upkeep.written_off > 0 {
                self.tracer
                    .emit(|| format!("{side} upkeep deficit {} written off", upkeep.written_off));
            }
        }
    }

    fn decide(&mut self, side: Side, observation: &Observation, turn: u32) -> Command {
        let policy = self.policies[side.index()].as_mut();
        let parsed = guarded_step(policy, observation).and_then(|value| Command::parse(&value));

        match parsed {
            Ok(parsed) => {
                for key in &parsed.unknown_keys {
                    self.tracer.emit(|| format!("{side} unknown key '{key}' ignored"));
                }
                for key in &parsed.invalid_keys {
                    self.tracer
                        .emit(|| format!("{side} unusable value for '{key}' read as 0"));
                }
                parsed.command
            }
            Err(err) => {
                log::warn!(
                    "{side} ({}) failed on turn {turn}: {err}",
                    self.policies[side.index()].name()
                );
                self.tracer
                    .emit(|| format!("[ERROR] {side} {err}; playing the empty command"));
                Command::empty()
            }
        }
    }

    fn apply(&mut self, side: Side, command: &Command) -> CommandOutcome {
        let outcome = apply_command(self.state.agent_mut(side), command, &self.settings);

        if outcome.attack_sold.units > 0 {
            self.tracer.emit(|| {
                format!(
                    "{side} sell {} atk (+{}g)",
                    outcome.attack_sold.units, outcome.attack_sold.refund
                )
            });
        }
        if outcome.defense_sold.units > 0 {
            self.tracer.emit(|| {
                format!(
                    "{side} sell {} def (+{}g)",
                    outcome.defense_sold.units, outcome.defense_sold.refund
                )
            });
        }
        if outcome.expansion_limited() {
            self.tracer.emit(|| {
                format!(
                    "{side} expand limited by gold to {}/{}",
                    outcome.bid, outcome.expand_requested
                )
            });
        }
        match outcome.scout {
            ScoutOutcome::NotRequested => {}
            ScoutOutcome::Bought => {
                let cost = self.settings.scout_cost;
                self.tracer.emit(|| format!("{side} scout (-{cost}g)"));
            }
            ScoutOutcome::Unaffordable => {
                self.tracer.emit(|| format!("{side} cannot afford scout"));
            }
        }
        if outcome.attack_bought.spent < outcome.attack_requested {
            self.tracer.emit(|| {
                format!(
                    "{side} atk spend trimmed to {}/{}",
                    outcome.attack_bought.spent, outcome.attack_requested
                )
            });
        }
        if outcome.defense_bought.spent < outcome.defense_requested {
            self.tracer.emit(|| {
                format!(
                    "{side} def spend trimmed to {}/{}",
                    outcome.defense_bought.spent, outcome.defense_requested
                )
            });
        }

        outcome
    }

    fn resolve(&mut self, outcomes: &[CommandOutcome; 2]) {
        let bids = [outcomes[0].bid, outcomes[1].bid];

        let (p1, p2, neutral) = self.state.board_mut();
        let allocation = allocate_neutral(p1, p2, bids, neutral);
        self.tracer.emit(|| {
            format!(
                "expands: P1 want={} P2 want={} | contested={} granted P1={} P2={} | neutral={}",
                bids[0],
                bids[1],
                allocation.contested,
                allocation.granted_p1,
                allocation.granted_p2,
                allocation.neutral_after
            )
        });

        let (p1, p2, neutral) = self.state.board_mut();
        let combat = resolve_combat(p1, p2, neutral);
        let (t1, t2, pool) = (p1.territory, p2.territory, *neutral);
        self.tracer.emit(|| {
            format!(
                "combat: P1 dmg={} P2 dmg={} | terr P1={t1} P2={t2} neutral={pool}",
                combat.damage_by_p1, combat.damage_by_p2
            )
        });
    }

    fn check_termination(&mut self) {
        let at_turn_limit = self.state.turn >= self.settings.max_turns;
        let Some(winner) = check_winner(&self.state, at_turn_limit) else {
            return;
        };

        self.phase = Phase::Finished;
        self.winner = Some(winner);

        let result = self.result();
        log::info!(
            "match finished after {} turns: {winner}",
            result.turns_played
        );
        self.tracer.emit(|| {
            format!(
                "=== result: {winner} after {} turns | P1 terr={} gold={} | P2 terr={} gold={} | neutral={} ===",
                result.turns_played,
                result.player1.territory,
                result.player1.gold,
                result.player2.territory,
                result.player2.gold,
                result.neutral_pool
            )
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolicyError;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Plays the same mapping every turn.
    struct Fixed(Value);

    impl Policy for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn step(&mut self, _observation: &Observation) -> Result<Value, PolicyError> {
            Ok(self.0.clone())
        }
    }

    /// Records every observation it is shown.
    struct Recorder(Rc<RefCell<Vec<Observation>>>);

    impl Policy for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn reset(&mut self, initial: &Observation) {
            self.0.borrow_mut().push(*initial);
        }

        fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
            self.0.borrow_mut().push(*observation);
            Ok(json!({"scout": observation.turn == 1}))
        }
    }

    fn idle() -> Box<dyn Policy> {
        Box::new(Fixed(json!({})))
    }

    #[test]
    fn test_check_winner_elimination() {
        let mut state = MatchState::new(&GameSettings::default());
        state.agent_mut(Side::Player1).territory = 0;
        state.agent_mut(Side::Player2).territory = 10;
        assert_eq!(check_winner(&state, false), Some(Winner::Player2));

        state.agent_mut(Side::Player2).territory = 0;
        assert_eq!(check_winner(&state, false), Some(Winner::Draw));
    }

    #[test]
    fn test_check_winner_turn_limit() {
        let mut state = MatchState::new(&GameSettings::default());
        assert_eq!(check_winner(&state, false), None);
        assert_eq!(check_winner(&state, true), Some(Winner::Draw));

        state.agent_mut(Side::Player1).gold = 100;
        state.agent_mut(Side::Player2).gold = 50;
        assert_eq!(check_winner(&state, true), Some(Winner::Player1));
    }

    #[test]
    fn test_phases() {
        let settings = GameSettings::default().with_max_turns(2);
        let mut engine = Engine::new(idle(), idle(), settings);
        assert_eq!(engine.phase(), Phase::NotStarted);
        assert_eq!(engine.result().winner, None);

        assert_eq!(engine.play_turn(), Phase::InProgress);
        assert_eq!(engine.state().turn, 1);
        assert_eq!(engine.play_turn(), Phase::Finished);
        assert_eq!(engine.play_turn(), Phase::Finished);
        assert_eq!(engine.state().turn, 2);
        assert_eq!(engine.history().len(), 3);
    }

    #[test]
    fn test_idle_match_times_out_as_draw() {
        let settings = GameSettings::default().with_max_turns(5);
        let result = Engine::new(idle(), idle(), settings).run();
        assert_eq!(result.winner, Some(Winner::Draw));
        assert_eq!(result.turns_played, 5);
        // 50 + 5 turns of 30 income.
        assert_eq!(result.player1.gold, 200);
        assert_eq!(result.neutral_pool, 40);
    }

    #[test]
    fn test_zero_turn_limit_finishes_at_reset() {
        let settings = GameSettings::default().with_max_turns(0);
        let mut engine = Engine::new(idle(), idle(), settings);
        let result = engine.run();
        assert_eq!(result.turns_played, 0);
        assert_eq!(result.winner, Some(Winner::Draw));
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_observation_turns_and_intel_lag() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let settings = GameSettings::default().with_max_turns(3);
        let mut engine = Engine::new(Box::new(Recorder(Rc::clone(&seen))), idle(), settings);
        engine.run();

        let seen = seen.borrow();
        let turns: Vec<u32> = seen.iter().map(|o| o.turn).collect();
        assert_eq!(turns, vec![0, 1, 2, 3]);
        // Scout bought on turn 1 is visible on turn 2 only.
        assert!(!seen[1].enemy.has_intel());
        assert!(seen[2].enemy.has_intel());
        assert!(!seen[3].enemy.has_intel());
    }

    #[test]
    fn test_observation_reflects_economy_phase() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let settings = GameSettings::default().with_max_turns(1);
        Engine::new(Box::new(Recorder(Rc::clone(&seen))), idle(), settings).run();

        let seen = seen.borrow();
        assert_eq!(seen[0].my.gold, 50);
        assert_eq!(seen[1].my.gold, 80);
        assert_eq!(seen[1].limits.gold, 80);
    }

    #[test]
    fn test_expansion_and_trace() {
        let lines = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink_lines = Rc::clone(&lines);
        let settings = GameSettings::default().with_max_turns(1);
        let mut engine = Engine::new(
            Box::new(Fixed(json!({"expand": 3, "dance": true}))),
            idle(),
            settings,
        )
        .with_trace(move |line: &str| sink_lines.borrow_mut().push(line.to_string()));

        let result = engine.run();
        assert_eq!(result.player1.territory, 33);
        assert_eq!(result.neutral_pool, 37);
        // 50 + 30 - (10 + 11 + 12)
        assert_eq!(result.player1.gold, 47);

        let lines = lines.borrow();
        assert!(lines.iter().any(|l| l.contains("unknown key 'dance'")));
        assert!(lines.iter().any(|l| l.starts_with("expands: P1 want=3 P2 want=0")));
        assert!(lines.iter().any(|l| l.starts_with("combat:")));
        // Timeout on gold: 47 against an untouched 80.
        assert!(lines.last().is_some_and(|l| l.contains("result: player2")));
    }

    #[test]
    fn test_engine_is_reusable() {
        let settings = GameSettings::default().with_max_turns(4);
        let mut engine = Engine::new(Box::new(Fixed(json!({"expand": 1}))), idle(), settings);
        let first = engine.run();
        let second = engine.run();
        assert_eq!(first, second);
        assert_eq!(engine.history().len(), 5);
    }

    #[test]
    fn test_winner_serializes_lowercase() {
        let result = Engine::new(idle(), idle(), GameSettings::default().with_max_turns(1)).run();
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["winner"], "draw");
        assert_eq!(json["turns_played"], 1);
        assert_eq!(json["player2"]["territory"], 30);
    }
}
