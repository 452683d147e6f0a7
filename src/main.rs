//! Territory duel CLI - run matches and series between built-in strategies.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use territory_duel::bots::BotKind;

/// Territory duel - a deterministic two-player territory conquest engine
#[derive(Parser, Debug)]
#[command(name = "duel")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single match between two bots
    Run {
        /// Bot playing Player 1 (see `duel bots`)
        bot1: BotKind,

        /// Bot playing Player 2
        bot2: BotKind,

        /// Random seed for randomised bots (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum turns (overrides the settings file)
        #[arg(short, long)]
        turns: Option<u32>,

        /// Settings file (JSON, partial files allowed)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Include the per-turn history
        #[arg(long)]
        history: bool,

        /// Print the engine's trace lines as the match runs
        #[arg(long)]
        trace: bool,

        /// Suppress the header
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many independent matches in parallel and aggregate statistics
    Tournament {
        /// Bot A
        bot1: BotKind,

        /// Bot B
        bot2: BotKind,

        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum turns per game (overrides the settings file)
        #[arg(short = 't', long)]
        turns: Option<u32>,

        /// Settings file (JSON, partial files allowed)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Alternate seats: bot B plays Player 1 in odd games
        #[arg(long)]
        swap_sides: bool,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// List the built-in bots
    Bots,

    /// Print the effective settings as JSON
    Config {
        /// Settings file to start from
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum turns override
        #[arg(short, long)]
        turns: Option<u32>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            bot1,
            bot2,
            seed,
            turns,
            config,
            format,
            history,
            trace,
            quiet,
        } => cli::load_settings(config.as_deref(), turns).and_then(|settings| {
            cli::run::execute(
                [bot1, bot2],
                seed,
                settings,
                format,
                cli::run::Extras { history, trace, quiet },
            )
        }),

        Commands::Tournament {
            bot1,
            bot2,
            games,
            seed,
            threads,
            turns,
            config,
            swap_sides,
            format,
            progress,
        } => cli::load_settings(config.as_deref(), turns).and_then(|settings| {
            cli::tournament::execute(
                [bot1, bot2],
                games,
                seed,
                threads,
                settings,
                swap_sides,
                format,
                progress,
            )
        }),

        Commands::Bots => {
            cli::bots::execute();
            Ok(())
        }

        Commands::Config { config, turns } => {
            cli::load_settings(config.as_deref(), turns).and_then(|settings| cli::show_settings(&settings))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
