//! # Training Session
//!
//! Owns the environment and the agent for one training run and drives them
//! one tick at a time. The session never sleeps or spawns: the host calls
//! [`TrainingSession::tick`] or [`TrainingSession::advance`] and decides the
//! pacing itself, using [`Cadence`] as a hint.
//!
//! Training and evaluation are mutually exclusive modes. Transitions are only
//! stored, and learning steps only run, in [`Mode::Training`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use physics::{Observation, PongConfig, PongSim};
use tracing::{debug, info, warn};

use crate::config::{DqnConfig, SessionConfig};
use crate::dqn::DqnAgent;
use crate::env::Env;
use crate::error::RlError;
use crate::metrics::{EpisodeHistory, EpisodeReport, Outcome};
use crate::persistence::{ParameterStore, MODEL_KEY};
use crate::replay::Transition;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Training,
    /// Greedy demonstration play; `games_played` counts scored points.
    Evaluating { games_played: u32 },
    /// A run was cut short by [`TrainingSession::stop`].
    Stopped,
}

impl Mode {
    /// Training or evaluating.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Mode::Training | Mode::Evaluating { .. })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Idle => write!(f, "idle"),
            Mode::Training => write!(f, "training"),
            Mode::Evaluating { games_played } => write!(f, "evaluating (game {games_played})"),
            Mode::Stopped => write!(f, "stopped"),
        }
    }
}

/// How a host should pace calls into the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cadence {
    /// Run several ticks back-to-back, then yield.
    Fast { ticks_per_yield: usize },
    /// One tick per interval of wall-clock time.
    RealTime { interval: Duration },
}

impl Cadence {
    #[must_use]
    pub fn fast(config: &SessionConfig) -> Self {
        Cadence::Fast { ticks_per_yield: config.fast_ticks_per_yield }
    }

    #[must_use]
    pub fn real_time(config: &SessionConfig) -> Self {
        Cadence::RealTime { interval: Duration::from_millis(config.realtime_interval_ms) }
    }

    #[must_use]
    pub fn ticks_per_yield(self) -> usize {
        match self {
            Cadence::Fast { ticks_per_yield } => ticks_per_yield,
            Cadence::RealTime { .. } => 1,
        }
    }

    /// Wall-clock wait between yields; zero in fast cadence.
    #[must_use]
    pub fn interval(self) -> Duration {
        match self {
            Cadence::Fast { .. } => Duration::ZERO,
            Cadence::RealTime { interval } => interval,
        }
    }
}

/// Cloneable flag a host can raise from anywhere to stop the active run.
///
/// The session checks it at the start of every tick.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct TrainingSession<E: Env> {
    config: SessionConfig,
    env: E,
    agent: DqnAgent,
    mode: Mode,
    observation: Observation,
    episode: u64,
    episode_ticks: u32,
    history: EpisodeHistory,
    learning_steps: u64,
    last_loss: Option<f32>,
    stop: StopHandle,
}

/// Session over the Pong table with every random stream derived from `session.seed`.
///
/// # Errors
///
/// Returns an error if any of the three configurations fails validation.
pub fn pong_session(
    pong: PongConfig,
    dqn: DqnConfig,
    session: SessionConfig,
) -> Result<TrainingSession<PongSim>, RlError> {
    let mut seeds = fastrand::Rng::with_seed(session.seed);
    let env = PongSim::new(pong, seeds.u64(..))?;
    let agent = DqnAgent::new(dqn, seeds.u64(..))?;
    TrainingSession::new(env, agent, session)
}

impl<E: Env> TrainingSession<E> {
    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] if `config` does not validate or the
    /// environment's observation and action sizes disagree with the agent's.
    pub fn new(mut env: E, agent: DqnAgent, config: SessionConfig) -> Result<Self, RlError> {
        config.validate()?;
        let dqn = agent.config();
        if env.obs_size() != dqn.observation_dim || env.action_size() != dqn.action_count {
            return Err(RlError::InvalidConfig(format!(
                "environment has {} observations and {} actions, agent expects {} and {}",
                env.obs_size(),
                env.action_size(),
                dqn.observation_dim,
                dqn.action_count
            )));
        }
        let observation = env.reset();
        Ok(Self {
            history: EpisodeHistory::new(config.average_window),
            config,
            env,
            agent,
            mode: Mode::Idle,
            observation,
            episode: 0,
            episode_ticks: 0,
            learning_steps: 0,
            last_loss: None,
            stop: StopHandle::default(),
        })
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn agent(&self) -> &DqnAgent {
        &self.agent
    }

    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Read-only view of the table for a renderer.
    #[must_use]
    pub fn snapshot(&self) -> E::Snapshot {
        self.env.snapshot()
    }

    #[must_use]
    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    /// Episodes finished since training started.
    #[must_use]
    pub fn episode(&self) -> u64 {
        self.episode
    }

    #[must_use]
    pub fn history(&self) -> &EpisodeHistory {
        &self.history
    }

    /// Learning steps that actually ran since training started.
    #[must_use]
    pub fn learning_steps(&self) -> u64 {
        self.learning_steps
    }

    #[must_use]
    pub fn last_loss(&self) -> Option<f32> {
        self.last_loss
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Begin a fresh training run.
    ///
    /// Exploration, the learning-step counter, the episode counter, the
    /// outcome history and both scores start over. Stored experience and
    /// network weights carry on from any previous run. With an episode
    /// limit of zero the session stays [`Mode::Idle`].
    ///
    /// # Errors
    ///
    /// Returns [`RlError::Busy`] if a training or evaluation run is active.
    pub fn start_training(&mut self) -> Result<(), RlError> {
        self.ensure_inactive()?;
        self.agent.restart();
        self.episode = 0;
        self.history.clear();
        self.learning_steps = 0;
        self.last_loss = None;
        self.env.clear_scores();
        self.begin_rally();
        self.stop.clear();
        if self.config.max_episodes == 0 {
            info!("episode limit is zero, nothing to train");
            self.mode = Mode::Idle;
            return Ok(());
        }
        self.mode = Mode::Training;
        info!(
            max_episodes = self.config.max_episodes,
            stored = self.agent.replay().len(),
            "training started"
        );
        Ok(())
    }

    /// Begin a greedy demonstration of `demo_games` points.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::Busy`] if a training or evaluation run is active.
    pub fn start_evaluation(&mut self) -> Result<(), RlError> {
        self.ensure_inactive()?;
        self.env.clear_scores();
        self.begin_rally();
        self.stop.clear();
        if self.config.demo_games == 0 {
            self.mode = Mode::Idle;
            return Ok(());
        }
        self.mode = Mode::Evaluating { games_played: 0 };
        info!(games = self.config.demo_games, "demonstration started");
        Ok(())
    }

    /// End the active run. Takes effect between ticks, so the environment,
    /// the agent and the replay store are left consistent.
    pub fn stop(&mut self) {
        if self.mode.is_active() {
            info!(mode = %self.mode, episode = self.episode, "run stopped");
            self.mode = Mode::Stopped;
        }
    }

    /// Advance the active run by exactly one tick.
    ///
    /// Returns the report of a training episode that ended on this tick.
    /// Does nothing outside [`Mode::Training`] and [`Mode::Evaluating`], or if
    /// a stop was requested through the [`StopHandle`].
    pub fn tick(&mut self) -> Option<EpisodeReport> {
        if self.stop.take() {
            self.stop();
        }
        match self.mode {
            Mode::Training => self.training_tick(),
            Mode::Evaluating { games_played } => {
                self.evaluation_tick(games_played);
                None
            }
            Mode::Idle | Mode::Stopped => None,
        }
    }

    /// Run up to `n` ticks, stopping early once the run ends.
    pub fn advance(&mut self, n: usize) -> Vec<EpisodeReport> {
        let mut reports = Vec::new();
        for _ in 0..n {
            if !self.mode.is_active() {
                break;
            }
            reports.extend(self.tick());
        }
        reports
    }

    /// Store the online network's parameters under [`MODEL_KEY`].
    ///
    /// # Errors
    ///
    /// Returns [`RlError::Busy`] during a run, or whatever the store reports.
    pub fn save<S: ParameterStore + ?Sized>(&self, store: &mut S) -> Result<(), RlError> {
        self.ensure_inactive()?;
        store.save(MODEL_KEY, &self.agent.export_online())?;
        info!(key = MODEL_KEY, "model saved");
        Ok(())
    }

    /// Restore the online network from [`MODEL_KEY`] and re-sync the target.
    ///
    /// On success the episode counter, the outcome history and both scores
    /// are cleared. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::Busy`] during a run, [`RlError::NoModel`] if nothing
    /// is stored, or [`RlError::IncompatibleModel`] if the stored parameters
    /// belong to another architecture.
    pub fn load<S: ParameterStore + ?Sized>(&mut self, store: &S) -> Result<(), RlError> {
        self.ensure_inactive()?;
        let restored = store
            .load(MODEL_KEY)
            .and_then(|params| self.agent.load_online(&params));
        if let Err(err) = restored {
            warn!(key = MODEL_KEY, %err, "model load failed");
            return Err(err);
        }
        self.episode = 0;
        self.history.clear();
        self.learning_steps = 0;
        self.last_loss = None;
        self.env.clear_scores();
        self.begin_rally();
        self.mode = Mode::Idle;
        Ok(())
    }

    fn ensure_inactive(&self) -> Result<(), RlError> {
        if self.mode.is_active() {
            return Err(RlError::Busy { mode: self.mode });
        }
        Ok(())
    }

    fn begin_rally(&mut self) {
        self.observation = self.env.reset();
        self.episode_ticks = 0;
    }

    fn training_tick(&mut self) -> Option<EpisodeReport> {
        let action = self.agent.choose_action(&self.observation, false);
        let (player_before, _) = self.env.scores();
        let (next, reward, done) = self.env.step(action);
        self.agent.remember(Transition {
            observation: self.observation,
            action,
            reward,
            next_observation: next,
            terminal: done,
        });
        self.observation = next;
        self.episode_ticks += 1;

        let outcome = if done {
            if self.env.scores().0 > player_before {
                Outcome::Won
            } else {
                Outcome::Lost
            }
        } else if self.episode_ticks >= self.config.max_ticks_per_rally {
            Outcome::Neutral
        } else {
            return None;
        };

        Some(self.finish_episode(outcome))
    }

    fn finish_episode(&mut self, outcome: Outcome) -> EpisodeReport {
        self.episode += 1;
        self.history.record(outcome.reward());

        let loss = self.agent.train().loss();
        if loss.is_some() {
            self.learning_steps += 1;
            self.last_loss = loss;
        }

        let (player_score, opponent_score) = self.env.scores();
        let report = EpisodeReport {
            episode: self.episode,
            outcome,
            outcome_reward: outcome.reward(),
            average: self.history.average(),
            loss,
            epsilon: self.agent.epsilon(),
            player_score,
            opponent_score,
            ticks: self.episode_ticks,
        };
        debug!(
            episode = report.episode,
            ?outcome,
            average = report.average,
            ?loss,
            epsilon = report.epsilon,
            "episode finished"
        );

        self.begin_rally();
        if self.episode >= self.config.max_episodes {
            info!(episodes = self.episode, learning_steps = self.learning_steps, "training complete");
            self.mode = Mode::Idle;
        }
        report
    }

    fn evaluation_tick(&mut self, games_played: u32) {
        let action = self.agent.choose_action(&self.observation, true);
        let (next, _, done) = self.env.step(action);
        self.observation = next;
        self.episode_ticks += 1;

        if done {
            let games_played = games_played + 1;
            self.begin_rally();
            if games_played >= self.config.demo_games {
                let (player, opponent) = self.env.scores();
                info!(player, opponent, "demonstration finished");
                self.mode = Mode::Idle;
            } else {
                self.mode = Mode::Evaluating { games_played };
            }
        } else if self.episode_ticks >= self.config.max_ticks_per_rally {
            self.begin_rally();
        }
    }
}
