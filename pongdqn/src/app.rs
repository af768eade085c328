//! # Pong DQN Application Logic
//!
//! Builds a [`rl::TrainingSession`] over the Pong table and drives it. The
//! session only advances when told to; this module owns the wall-clock side,
//! running a batch of ticks per frame in fast cadence or one tick per frame
//! interval in real-time cadence, and logging progress as episodes finish.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use physics::PongSim;
use pongdqn::AppConfig;
use rl::{pong_session, Cadence, EpisodeReport, JsonFileStore, TrainingSession};

pub struct RunOptions {
    pub model_dir: PathBuf,
    pub fast: bool,
}

pub struct TrainOptions {
    pub load: bool,
    pub save: bool,
    pub demo: bool,
}

/// Train until `max_episodes`, optionally resuming from and saving to the model directory.
///
/// # Errors
///
/// Returns any error from building the session or from the model store.
pub fn train(config: &AppConfig, run: &RunOptions, opts: &TrainOptions) -> Result<()> {
    let mut session = build_session(config)?;
    let mut store = JsonFileStore::new(&run.model_dir);

    if opts.load {
        session
            .load(&store)
            .with_context(|| format!("loading model from {}", run.model_dir.display()))?;
    }

    session.start_training()?;
    tracing::info!(
        episodes = config.session.max_episodes,
        fast = run.fast,
        seed = config.session.seed,
        "Starting training..."
    );
    let last = drive(&mut session, cadence(config, run.fast), config.log_every);

    match last {
        Some(report) => log_report("Training finished", &report),
        None => tracing::warn!("Training ended before any episode finished"),
    }
    tracing::info!(
        learning_steps = session.learning_steps(),
        stored = session.agent().replay().len(),
        "Session summary"
    );

    if opts.save {
        session
            .save(&mut store)
            .with_context(|| format!("saving model to {}", run.model_dir.display()))?;
        tracing::info!(path = %store.path_for(rl::MODEL_KEY).display(), "Model saved");
    }

    if opts.demo {
        play_demo(&mut session, cadence(config, run.fast))?;
    }
    Ok(())
}

/// Restore the saved model and play `demo_games` greedy points.
///
/// # Errors
///
/// Fails if no compatible model is stored in the model directory.
pub fn demo(config: &AppConfig, run: &RunOptions) -> Result<()> {
    let mut session = build_session(config)?;
    let store = JsonFileStore::new(&run.model_dir);
    session.load(&store).with_context(|| {
        format!(
            "no usable model in {}; run `pongdqn train --save` first",
            run.model_dir.display()
        )
    })?;
    play_demo(&mut session, cadence(config, run.fast))
}

fn build_session(config: &AppConfig) -> Result<TrainingSession<PongSim>> {
    let session = pong_session(config.pong.clone(), config.dqn.clone(), config.session.clone())
        .context("building training session")?;
    Ok(session)
}

fn cadence(config: &AppConfig, fast: bool) -> Cadence {
    if fast {
        Cadence::fast(&config.session)
    } else {
        Cadence::real_time(&config.session)
    }
}

fn play_demo(session: &mut TrainingSession<PongSim>, cadence: Cadence) -> Result<()> {
    session.start_evaluation()?;
    tracing::info!(games = session.config().demo_games, "Running demonstration...");
    drive(session, cadence, 0);
    let state = session.snapshot().state;
    tracing::info!(
        agent = state.player_score,
        opponent = state.opponent_score,
        "Demonstration finished"
    );
    Ok(())
}

/// Advance the session until its run ends, pacing each frame to `cadence`.
///
/// Returns the last episode report produced, if any.
fn drive(
    session: &mut TrainingSession<PongSim>,
    cadence: Cadence,
    log_every: u64,
) -> Option<EpisodeReport> {
    let frame_duration = cadence.interval();
    let mut last = None;

    while session.mode().is_active() {
        let frame_start = Instant::now();

        for report in session.advance(cadence.ticks_per_yield()) {
            if log_every > 0 && report.episode % log_every == 0 {
                log_report("Progress", &report);
            }
            last = Some(report);
        }

        // Frame rate limiting
        let frame_time = frame_start.elapsed();
        if frame_time < frame_duration {
            std::thread::sleep(frame_duration - frame_time);
        }
    }
    last
}

fn log_report(message: &str, report: &EpisodeReport) {
    tracing::info!(
        episode = report.episode,
        outcome = ?report.outcome,
        average = format_args!("{:.3}", report.average),
        loss = ?report.loss,
        epsilon = format_args!("{:.3}", report.epsilon),
        score = format_args!("{}-{}", report.player_score, report.opponent_score),
        "{message}"
    );
}
