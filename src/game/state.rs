//! Match state management.

use serde::Serialize;

use crate::config::GameSettings;
use crate::game::{AgentSnapshot, AgentState, Side};

/// Figures recorded at the end of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnSnapshot {
    /// Completed turn number (0 is the starting position).
    pub turn: u32,
    /// Neutral pool size.
    pub neutral: u32,
    /// Player 1's figures.
    pub p1: AgentSnapshot,
    /// Player 2's figures.
    pub p2: AgentSnapshot,
}

/// Append-only record of turn snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History {
    snapshots: Vec<TurnSnapshot>,
}

impl History {
    /// Record a snapshot.
    pub fn push(&mut self, snapshot: TurnSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshots oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TurnSnapshot> {
        self.snapshots.iter()
    }

    /// The most recent snapshot.
    #[must_use]
    pub fn last(&self) -> Option<&TurnSnapshot> {
        self.snapshots.last()
    }

    /// All snapshots as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[TurnSnapshot] {
        &self.snapshots
    }
}

/// Complete state of a running match.
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Completed turns.
    pub turn: u32,
    /// Unclaimed cells, contested cells and cells lost in combat.
    pub neutral: u32,
    /// Both sides, indexed by [`Side::index`].
    pub agents: [AgentState; 2],
    history: History,
}

impl MatchState {
    /// Fresh state with the starting position recorded as turn 0.
    #[must_use]
    pub fn new(settings: &GameSettings) -> Self {
        let mut state = Self {
            turn: 0,
            neutral: settings.neutral_territory,
            agents: [AgentState::new(settings), AgentState::new(settings)],
            history: History::default(),
        };
        state.record_snapshot();
        state
    }

    /// One side's state.
    #[must_use]
    pub const fn agent(&self, side: Side) -> &AgentState {
        &self.agents[side.index()]
    }

    /// One side's state, mutably.
    pub fn agent_mut(&mut self, side: Side) -> &mut AgentState {
        &mut self.agents[side.index()]
    }

    /// Both sides and the neutral pool, mutably, for resolution steps.
    pub fn board_mut(&mut self) -> (&mut AgentState, &mut AgentState, &mut u32) {
        let [p1, p2] = &mut self.agents;
        (p1, p2, &mut self.neutral)
    }

    /// Cells across both sides and the neutral pool.
    #[must_use]
    pub fn total_cells(&self) -> u64 {
        u64::from(self.agents[0].territory)
            + u64::from(self.agents[1].territory)
            + u64::from(self.neutral)
    }

    /// Current figures as a snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            turn: self.turn,
            neutral: self.neutral,
            p1: self.agents[0].snapshot(),
            p2: self.agents[1].snapshot(),
        }
    }

    /// Append the current figures to the history.
    pub fn record_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    /// Recorded snapshots.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Advance to the next turn.
    pub fn advance_turn(&mut self) {
        self.turn += 1;
    }
}
