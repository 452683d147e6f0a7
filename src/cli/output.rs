//! Output formatting utilities for CLI.

// Rates and averages are shown as floats.
#![allow(clippy::cast_precision_loss)]

use std::fmt::Write as _;

use serde::Serialize;
use territory_duel::game::History;
use territory_duel::tournament::SeriesStats;
use territory_duel::{MatchResult, Winner};

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunResult<'a> {
    /// Random seed used.
    pub(super) seed: u64,
    /// Bot playing Player 1.
    pub(super) player1: &'a str,
    /// Bot playing Player 2.
    pub(super) player2: &'a str,
    /// Engine result.
    pub(super) result: MatchResult,
    /// Per-turn snapshots, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) history: Option<&'a History>,
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult, names: &[&str; 2], seed: u64) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Match Result (seed: {seed})");
    match result.winner {
        Some(Winner::Player1) => {
            let _ = writeln!(output, "  Winner: Player 1 ({})", names[0]);
        }
        Some(Winner::Player2) => {
            let _ = writeln!(output, "  Winner: Player 2 ({})", names[1]);
        }
        Some(Winner::Draw) => output.push_str("  Winner: Draw\n"),
        None => output.push_str("  Winner: undecided\n"),
    }
    let ending = if result.by_elimination() { "elimination" } else { "turn limit" };
    let _ = writeln!(output, "  Turns: {} ({ending})", result.turns_played);
    let _ = writeln!(output, "  Neutral pool: {}\n", result.neutral_pool);

    for (i, (name, figures)) in names.iter().zip([&result.player1, &result.player2]).enumerate() {
        let _ = writeln!(
            output,
            "  Player {} ({name}): territory {}, gold {}, attack {}, defense {}",
            i + 1,
            figures.territory,
            figures.gold,
            figures.attack,
            figures.defense
        );
    }

    output
}

/// Format the per-turn history as a table.
pub(super) fn format_history_text(history: &History) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{:>5} {:>7} | {:>5} {:>6} {:>4} {:>4} | {:>5} {:>6} {:>4} {:>4}",
        "turn", "neutral", "terr", "gold", "atk", "def", "terr", "gold", "atk", "def"
    );
    for snap in history.iter() {
        let _ = writeln!(
            output,
            "{:>5} {:>7} | {:>5} {:>6} {:>4} {:>4} | {:>5} {:>6} {:>4} {:>4}",
            snap.turn,
            snap.neutral,
            snap.p1.territory,
            snap.p1.gold,
            snap.p1.attack,
            snap.p1.defense,
            snap.p2.territory,
            snap.p2.gold,
            snap.p2.attack,
            snap.p2.defense
        );
    }

    output
}

/// JSON-serializable series result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSeriesResult {
    /// Total games played.
    games_played: u64,
    /// Per-bot statistics.
    bots: Vec<JsonSeriesBot>,
    /// Number of draws.
    draws: u64,
    /// Games ended by elimination.
    eliminations: u64,
    /// Games ended at the turn limit.
    timeouts: u64,
    /// Average game length in turns.
    avg_turns: f64,
}

/// JSON-serializable per-bot series stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonSeriesBot {
    /// Bot name.
    bot: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average final territory.
    avg_territory: f64,
    /// Average final gold.
    avg_gold: f64,
}

impl JsonSeriesResult {
    /// Create from stats and bot names.
    pub(super) fn from_stats(stats: &SeriesStats, names: &[&str; 2]) -> Self {
        let bots = names
            .iter()
            .enumerate()
            .map(|(i, name)| JsonSeriesBot {
                bot: (*name).to_string(),
                wins: stats.wins[i],
                win_rate: stats.win_rate(i),
                avg_territory: stats.avg_territory(i),
                avg_gold: stats.avg_gold(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            bots,
            draws: stats.draws,
            eliminations: stats.eliminations,
            timeouts: stats.timeouts,
            avg_turns: stats.avg_turns(),
        }
    }
}

/// Format series stats as human-readable text.
pub(super) fn format_series_text(stats: &SeriesStats, names: &[&str; 2]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Series Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "  Bot {} ({name}): {:.1}% ({} wins)",
            if i == 0 { 'A' } else { 'B' },
            stats.win_rate(i) * 100.0,
            stats.wins[i]
        );
    }
    let _ = writeln!(
        output,
        "  Draws: {} ({:.1}%)\n",
        stats.draws,
        stats.draw_rate() * 100.0
    );

    output.push_str("Final Position (average):\n");
    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "  {name}: territory {:.1}, gold {:.1}",
            stats.avg_territory(i),
            stats.avg_gold(i)
        );
    }

    let _ = writeln!(
        output,
        "\nEndings: {} eliminations, {} turn limits",
        stats.eliminations, stats.timeouts
    );
    let _ = writeln!(output, "Average Game Length: {:.0} turns", stats.avg_turns());

    output
}

/// Format series stats as CSV.
pub(super) fn format_series_csv(stats: &SeriesStats, names: &[&str; 2]) -> String {
    let mut output = String::new();

    output.push_str("bot,wins,win_rate,draws,avg_territory,avg_gold,avg_turns\n");

    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "{name},{},{:.4},{},{:.2},{:.2},{:.2}",
            stats.wins[i],
            stats.win_rate(i),
            stats.draws,
            stats.avg_territory(i),
            stats.avg_gold(i),
            stats.avg_turns()
        );
    }

    output
}
