//! qnim CLI - Train a Q-learner on the misère subtraction game
//!
//! Logging goes through `env_logger`; set `RUST_LOG` for fine control or
//! pass `--verbose` to the train command to see the move-by-move transcript.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "qnim")]
#[command(version, about = "Q-learning for the misère subtraction game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the Q-learner against a scripted opponent
    Train(qnim::cli::commands::train::TrainArgs),
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => {
            init_logging(args.wants_transcript());
            qnim::cli::commands::train::execute(args)
        }
    }
}
