//! Tournament command implementation.

// Throughput is reported as a float.
#![allow(clippy::cast_precision_loss)]

use super::output::{format_series_csv, format_series_text, JsonSeriesResult};
use super::{resolve_seed, CliError, TournamentFormat};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use territory_duel::bots::BotKind;
use territory_duel::tournament::{run_series, SeriesConfig};
use territory_duel::GameSettings;

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the series cannot be set up or the output cannot be
/// serialized.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    bots: [BotKind; 2],
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    settings: GameSettings,
    swap_sides: bool,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    if let Some(num_threads) = threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            log::warn!("thread pool already initialised: {e}");
        }
    }

    let config = SeriesConfig {
        bots,
        games,
        base_seed: resolve_seed(seed),
        settings,
        swap_sides,
    };
    let names = bots.map(BotKind::name);

    let pb = if progress {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("invalid progress template: {e}")))?
            .progress_chars("=>-");
        let pb = ProgressBar::new(games);
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_series(&config, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })?;
    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!("Seed: {}{}", config.base_seed, if swap_sides { " (sides swapped in odd games)" } else { "" });
            println!();
            print!("{}", format_series_text(&stats, &names));
            println!();
            println!("Duration: {:.2}s ({games_per_sec:.0} games/sec)", duration.as_secs_f64());
        }
        TournamentFormat::Json => {
            let json_result = JsonSeriesResult::from_stats(&stats, &names);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
        TournamentFormat::Csv => {
            print!("{}", format_series_csv(&stats, &names));
        }
    }

    Ok(())
}
