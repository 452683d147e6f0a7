//! Per-side state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GameSettings;

/// One of the two sides of a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The first side; served first on the neutral tie-break.
    Player1,
    /// The second side.
    Player2,
}

impl Side {
    /// Both sides, in resolution order.
    pub const BOTH: [Side; 2] = [Side::Player1, Side::Player2];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }

    /// Index into two-element per-side arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Player1 => 0,
            Self::Player2 => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player1 => write!(f, "P1"),
            Self::Player2 => write!(f, "P2"),
        }
    }
}

/// Economic and military state of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgentState {
    /// Treasury; never negative.
    pub gold: u64,
    /// Owned cells.
    pub territory: u32,
    /// Attack units held.
    pub attack: u32,
    /// Defense units held.
    pub defense: u32,
    /// Cells ever granted by the neutral allocation; never decreases.
    pub expanded_total: u32,
    /// Whether the next observation reveals the opponent's private state.
    pub has_enemy_intel: bool,
}

impl AgentState {
    /// Starting state for a match.
    #[must_use]
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            gold: settings.start_gold,
            territory: settings.start_territory,
            attack: settings.start_attack,
            defense: settings.start_defense,
            expanded_total: 0,
            has_enemy_intel: false,
        }
    }

    /// Public-facing figures for history and results.
    #[must_use]
    pub const fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            territory: self.territory,
            gold: self.gold,
            attack: self.attack,
            defense: self.defense,
        }
    }

    /// Whether this side has lost all of its land.
    #[must_use]
    pub const fn is_eliminated(&self) -> bool {
        self.territory == 0
    }
}

/// Territory, gold and military of one side at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Owned cells.
    pub territory: u32,
    /// Treasury.
    pub gold: u64,
    /// Attack units.
    pub attack: u32,
    /// Defense units.
    pub defense: u32,
}
