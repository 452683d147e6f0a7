// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Territory duel: a deterministic simultaneous-turn strategy game engine.
//!
//! Two policies compete over a shared pool of neutral land. Each turn both
//! sides collect income, pay upkeep, decide on a command without seeing the
//! other's decision, bid for neutral cells and trade blows. The side that
//! loses all its land loses; at the turn limit the larger treasury wins.
//!
//! This crate provides:
//! - Bit-exact deterministic matches (integer arithmetic only)
//! - Isolation of strategies: failures and panics cost a turn, not the match
//! - Parallel series of independent matches
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │    Tournament Runner (rayon)        │
//! ├─────────────────────────────────────┤
//! │    Engine (turn orchestration)      │
//! ├─────────────────────────────────────┤
//! │    Game rules (economy, allocation, │
//! │    combat, commands, observations)  │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use territory_duel::{bots::BotKind, Engine, GameSettings};
//!
//! let settings = GameSettings::default().with_max_turns(50);
//! let mut engine = Engine::new(
//!     BotKind::GreedyExpansion.create(1),
//!     BotKind::Idle.create(2),
//!     settings,
//! );
//! let result = engine.run();
//! assert!(result.winner.is_some());
//! assert_eq!(result.turns_played, 50);
//! ```

pub mod bots;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod policy;
pub mod tournament;
pub mod trace;

pub use config::GameSettings;
pub use engine::{check_winner, Engine, MatchResult, Phase, Winner};
pub use error::{ConfigError, PolicyError};
pub use game::{AgentSnapshot, AgentState, Command, MatchState, Observation, Side};
pub use policy::Policy;
pub use trace::{LogSink, TraceSink, Tracer};
