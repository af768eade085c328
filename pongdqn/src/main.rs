//! # Pong DQN Runtime
//!
//! Command-line front end: `train` runs a training session and can save the
//! result, `demo` restores a saved agent and plays greedy points against the
//! scripted opponent.

mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pongdqn::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pongdqn", version, about = "Train a DQN agent to play Pong")]
struct Cli {
    /// JSON file with `pong`, `dqn`, `session` and `log_every` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding saved models
    #[arg(long = "model-dir", global = true, default_value = "models")]
    model_dir: PathBuf,
    /// Master random seed
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Run ticks back-to-back instead of one per real-time interval
    #[arg(long, global = true)]
    fast: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train the agent
    Train {
        /// Stop after this many episodes
        #[arg(long)]
        episodes: Option<u64>,
        /// Continue from the saved model
        #[arg(long)]
        load: bool,
        /// Save the model when training ends
        #[arg(long)]
        save: bool,
        /// Play a demonstration once training ends
        #[arg(long)]
        demo: bool,
    },
    /// Play greedy points with the saved model
    Demo {
        /// Points to play
        #[arg(long)]
        games: Option<u32>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.session.seed = seed;
    }

    let run = app::RunOptions { model_dir: cli.model_dir, fast: cli.fast };
    match cli.command {
        Command::Train { episodes, load, save, demo } => {
            if let Some(episodes) = episodes {
                config.session.max_episodes = episodes;
            }
            config.validate()?;
            app::train(&config, &run, &app::TrainOptions { load, save, demo })
        }
        Command::Demo { games } => {
            if let Some(games) = games {
                config.session.demo_games = games;
            }
            config.validate()?;
            app::demo(&config, &run)
        }
    }
}
