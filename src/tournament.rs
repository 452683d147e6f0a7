//! Series of independent matches between two built-in strategies.
//!
//! Provides a pure function interface: `(config) -> SeriesStats`.
//!
//! Every game gets its own engine, policies and seed (`base_seed + index`),
//! so games share nothing and run in parallel with rayon. Per-thread
//! statistics are folded locally and merged at the end; all counters are
//! sums, so the merged result does not depend on scheduling.

// Averages and rates are reported as floats.
#![allow(clippy::cast_precision_loss)]

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::bots::{BotKind, UnknownBot};
use crate::config::GameSettings;
use crate::engine::{Engine, MatchResult, Winner};
use crate::error::ConfigError;
use crate::game::Side;

/// Mixed into the second bot's seed so mirrored random bots differ.
const SECOND_SEAT_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed for the Player 2 bot of a game seeded with `seed`.
#[must_use]
pub const fn second_seat_seed(seed: u64) -> u64 {
    seed ^ SECOND_SEAT_SALT
}

/// Error type for series setup.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// A series of zero games.
    #[error("a series needs at least one game")]
    NoGames,
    /// A bot name that matches no built-in strategy.
    #[error(transparent)]
    UnknownBot(#[from] UnknownBot),
    /// Settings that cannot be used for a match.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration for a series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesConfig {
    /// The two strategies; index 0 is "bot A", index 1 "bot B".
    pub bots: [BotKind; 2],
    /// Number of games.
    pub games: u64,
    /// Seed of game 0; game `i` uses `base_seed + i`.
    pub base_seed: u64,
    /// Rules for every game.
    pub settings: GameSettings,
    /// Put bot B on the Player 1 seat in odd games.
    pub swap_sides: bool,
}

impl SeriesConfig {
    /// A series between two strategies given by name, with default rules.
    ///
    /// # Errors
    ///
    /// Returns [`TournamentError::UnknownBot`] if either name is unknown.
    pub fn from_names(bot_a: &str, bot_b: &str, games: u64) -> Result<Self, TournamentError> {
        Ok(Self {
            bots: [bot_a.parse()?, bot_b.parse()?],
            games,
            base_seed: 0,
            settings: GameSettings::default(),
            swap_sides: false,
        })
    }

    /// Which bot sits on `side` in game `index`.
    #[must_use]
    pub const fn seat(&self, index: u64, side: Side) -> usize {
        let swapped = self.swap_sides && index % 2 == 1;
        match (side, swapped) {
            (Side::Player1, false) | (Side::Player2, true) => 0,
            (Side::Player2, false) | (Side::Player1, true) => 1,
        }
    }
}

/// One finished game of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    /// Position in the series.
    pub index: u64,
    /// Seed handed to the bots.
    pub seed: u64,
    /// Whether bot B played as Player 1.
    pub swapped: bool,
    /// The engine's result.
    pub result: MatchResult,
}

impl GameRecord {
    /// Winning bot index (0 for A, 1 for B), `None` for a draw.
    #[must_use]
    pub fn winning_bot(&self) -> Option<usize> {
        let side = self.result.winner.and_then(Winner::side)?;
        let seat = side.index();
        Some(if self.swapped { 1 - seat } else { seat })
    }
}

/// Play game `index` of the series.
#[must_use]
pub fn play_game(config: &SeriesConfig, index: u64) -> GameRecord {
    let seed = config.base_seed.wrapping_add(index);
    let p1 = config.bots[config.seat(index, Side::Player1)];
    let p2 = config.bots[config.seat(index, Side::Player2)];

    let mut engine = Engine::new(
        p1.create(seed),
        p2.create(second_seat_seed(seed)),
        config.settings,
    );
    let result = engine.run();
    log::debug!("game {index} (seed {seed}): {p1} vs {p2} -> {:?}", result.winner);

    GameRecord {
        index,
        seed,
        swapped: config.seat(index, Side::Player1) == 1,
        result,
    }
}

/// Aggregated statistics of a series, per bot (not per seat).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesStats {
    /// Total games played.
    pub games_played: u64,
    /// Wins of bot A and bot B.
    pub wins: [u64; 2],
    /// Draw count.
    pub draws: u64,
    /// Games decided by a side losing all its land.
    pub eliminations: u64,
    /// Games that reached the turn limit.
    pub timeouts: u64,
    /// Total turns across all games.
    total_turns: u64,
    /// Final territory summed per bot.
    total_territory: [u64; 2],
    /// Final gold summed per bot.
    total_gold: [u64; 2],
}

impl SeriesStats {
    /// Add one game.
    pub fn add_record(&mut self, record: &GameRecord) {
        let result = &record.result;
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);

        match record.winning_bot() {
            Some(bot) => self.wins[bot] += 1,
            None => self.draws += 1,
        }
        if result.by_elimination() {
            self.eliminations += 1;
        } else {
            self.timeouts += 1;
        }

        for side in Side::BOTH {
            let bot = if record.swapped { 1 - side.index() } else { side.index() };
            let figures = result.agent(side);
            self.total_territory[bot] += u64::from(figures.territory);
            self.total_gold[bot] = self.total_gold[bot].saturating_add(figures.gold);
        }
    }

    /// Combine with stats gathered elsewhere.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.eliminations += other.eliminations;
        self.timeouts += other.timeouts;
        self.total_turns += other.total_turns;
        for bot in 0..2 {
            self.wins[bot] += other.wins[bot];
            self.total_territory[bot] += other.total_territory[bot];
            self.total_gold[bot] = self.total_gold[bot].saturating_add(other.total_gold[bot]);
        }
    }

    /// Win rate of a bot (0.0-1.0).
    #[must_use]
    pub fn win_rate(&self, bot: usize) -> f64 {
        self.per_game(self.wins.get(bot).copied().unwrap_or(0))
    }

    /// Draw rate (0.0-1.0).
    #[must_use]
    pub fn draw_rate(&self) -> f64 {
        self.per_game(self.draws)
    }

    /// Average game length.
    #[must_use]
    pub fn avg_turns(&self) -> f64 {
        self.per_game(self.total_turns)
    }

    /// Average final territory of a bot.
    #[must_use]
    pub fn avg_territory(&self, bot: usize) -> f64 {
        self.per_game(self.total_territory.get(bot).copied().unwrap_or(0))
    }

    /// Average final gold of a bot.
    #[must_use]
    pub fn avg_gold(&self, bot: usize) -> f64 {
        self.per_game(self.total_gold.get(bot).copied().unwrap_or(0))
    }

    fn per_game(&self, total: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        total as f64 / self.games_played as f64
    }
}

/// Run a series in parallel.
///
/// `on_game` is called from worker threads as each game finishes.
///
/// # Determinism
///
/// The same config always produces the same `SeriesStats`, whatever the
/// thread count.
///
/// # Errors
///
/// Returns an error if the series has no games or the settings are invalid.
pub fn run_series(
    config: &SeriesConfig,
    on_game: impl Fn(&GameRecord) + Sync,
) -> Result<SeriesStats, TournamentError> {
    if config.games == 0 {
        return Err(TournamentError::NoGames);
    }
    config.settings.validate()?;

    log::info!(
        "series: {} vs {}, {} games from seed {}",
        config.bots[0],
        config.bots[1],
        config.games,
        config.base_seed
    );

    let stats = (0..config.games)
        .into_par_iter()
        .fold(SeriesStats::default, |mut local, index| {
            let record = play_game(config, index);
            on_game(&record);
            local.add_record(&record);
            local
        })
        .reduce(SeriesStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(bot_a: &str, bot_b: &str, games: u64) -> SeriesConfig {
        let mut config = SeriesConfig::from_names(bot_a, bot_b, games).unwrap();
        config.settings = config.settings.with_max_turns(40);
        config
    }

    #[test]
    fn test_zero_games_rejected() {
        let config = config("idle", "idle", 0);
        assert!(matches!(
            run_series(&config, |_| {}),
            Err(TournamentError::NoGames)
        ));
    }

    #[test]
    fn test_unknown_bot_rejected() {
        let err = SeriesConfig::from_names("idle", "skynet", 1).unwrap_err();
        assert_eq!(err.to_string(), "unknown bot `skynet`");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut config = config("idle", "idle", 1);
        config.settings.attack_base = 0;
        assert!(matches!(
            run_series(&config, |_| {}),
            Err(TournamentError::Config(_))
        ));
    }

    #[test]
    fn test_idle_mirror_is_all_draws() {
        let stats = run_series(&config("idle", "idle", 6), |_| {}).unwrap();
        assert_eq!(stats.games_played, 6);
        assert_eq!(stats.draws, 6);
        assert_eq!(stats.timeouts, 6);
        assert!((stats.avg_turns() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_series_is_deterministic() {
        let mut config = config("random", "adaptive_opponent_v2", 12);
        config.base_seed = 99;
        config.swap_sides = true;
        let first = run_series(&config, |_| {}).unwrap();
        let second = run_series(&config, |_| {}).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.wins[0] + first.wins[1] + first.draws, 12);
    }

    #[test]
    fn test_swap_sides_alternates_seats() {
        let mut config = config("idle", "greedy_expansion", 4);
        config.swap_sides = true;
        assert_eq!(config.seat(0, Side::Player1), 0);
        assert_eq!(config.seat(1, Side::Player1), 1);
        assert_eq!(config.seat(1, Side::Player2), 0);

        let record = play_game(&config, 1);
        assert!(record.swapped);
        // Greedy expansion (bot B) played as Player 1 and holds more land.
        assert!(record.result.player1.territory > record.result.player2.territory);
    }

    #[test]
    fn test_progress_callback_sees_every_game() {
        let seen = std::sync::atomic::AtomicU64::new(0);
        let stats = run_series(&config("idle", "crashing", 5), |_| {
            seen.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(seen.into_inner(), 5);
        assert_eq!(stats.games_played, 5);
    }
}
