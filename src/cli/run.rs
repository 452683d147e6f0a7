//! Run command implementation.

use super::output::{format_history_text, format_text, JsonRunResult};
use super::{resolve_seed, CliError, OutputFormat};
use territory_duel::bots::BotKind;
use territory_duel::tournament::second_seat_seed;
use territory_duel::{Engine, GameSettings};

/// Optional extras of the run command.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Extras {
    /// Include the per-turn history.
    pub(crate) history: bool,
    /// Stream trace lines to stdout.
    pub(crate) trace: bool,
    /// Suppress the header.
    pub(crate) quiet: bool,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the result cannot be serialized.
pub(crate) fn execute(
    bots: [BotKind; 2],
    seed: Option<u64>,
    settings: GameSettings,
    format: OutputFormat,
    extras: Extras,
) -> Result<(), CliError> {
    let seed = resolve_seed(seed);
    let names = bots.map(BotKind::name);

    if !extras.quiet && format == OutputFormat::Text {
        println!("Running match with seed {seed}...");
        println!("Players: P1 {} vs P2 {}", names[0], names[1]);
        println!();
    }

    let mut engine = Engine::new(
        bots[0].create(seed),
        bots[1].create(second_seat_seed(seed)),
        settings,
    );
    if extras.trace {
        // Keep stdout parseable in JSON mode.
        let to_stderr = format == OutputFormat::Json;
        engine = engine.with_trace(move |line: &str| {
            if to_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        });
    }

    let result = engine.run();

    match format {
        OutputFormat::Text => {
            if extras.trace {
                println!();
            }
            print!("{}", format_text(&result, &names, seed));
            if extras.history {
                println!();
                print!("{}", format_history_text(engine.history()));
            }
        }
        OutputFormat::Json => {
            let history = extras.history.then(|| engine.history());
            let json_result = JsonRunResult {
                seed,
                player1: names[0],
                player2: names[1],
                result,
                history,
            };
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
    }

    Ok(())
}
