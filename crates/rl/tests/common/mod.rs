#![allow(dead_code)]

use physics::{Observation, OBSERVATION_DIM};
use rl::{DqnConfig, Env, SessionConfig, Transition};

/// Rallies of a fixed length whose points alternate between the sides.
pub struct ScriptedEnv {
    pub rally_len: u32,
    pub tick: u32,
    pub points: u32,
    pub scores: (u32, u32),
    pub resets: u32,
    /// Reward paid to whichever side wins a point, negated for the loser
    pub point_reward: f32,
}

impl ScriptedEnv {
    pub fn new(rally_len: u32) -> Self {
        Self { rally_len, tick: 0, points: 0, scores: (0, 0), resets: 0, point_reward: 1.0 }
    }

    fn obs(&self) -> Observation {
        [self.tick as f32 / 100.0; OBSERVATION_DIM]
    }
}

impl Env for ScriptedEnv {
    type Snapshot = (u32, u32);

    fn step(&mut self, _action: usize) -> (Observation, f32, bool) {
        self.tick += 1;
        if self.tick < self.rally_len {
            return (self.obs(), 0.0, false);
        }
        self.points += 1;
        let reward = if self.points % 2 == 1 {
            self.scores.0 += 1;
            self.point_reward
        } else {
            self.scores.1 += 1;
            -self.point_reward
        };
        (self.obs(), reward, true)
    }

    fn reset(&mut self) -> Observation {
        self.tick = 0;
        self.resets += 1;
        self.obs()
    }

    fn clear_scores(&mut self) {
        self.scores = (0, 0);
    }

    fn scores(&self) -> (u32, u32) {
        self.scores
    }

    fn snapshot(&self) -> (u32, u32) {
        self.scores
    }

    fn obs_size(&self) -> usize {
        OBSERVATION_DIM
    }

    fn action_size(&self) -> usize {
        3
    }
}

/// A network small enough to train quickly in tests.
pub fn small_dqn() -> DqnConfig {
    DqnConfig {
        hidden_layers: vec![8],
        replay_capacity: 64,
        min_replay_to_train: 4,
        batch_size: 4,
        target_sync_period: 3,
        epsilon_decay_steps: 20,
        ..DqnConfig::default()
    }
}

pub fn session_config(max_episodes: u64) -> SessionConfig {
    SessionConfig { max_episodes, max_ticks_per_rally: 50, demo_games: 2, ..SessionConfig::default() }
}

pub fn random_transition(rng: &mut fastrand::Rng) -> Transition {
    let mut obs = [0.0; OBSERVATION_DIM];
    let mut next = [0.0; OBSERVATION_DIM];
    for v in obs.iter_mut().chain(next.iter_mut()) {
        *v = rng.f32() * 2.0 - 1.0;
    }
    Transition {
        observation: obs,
        action: rng.usize(..3),
        reward: rng.f32() * 2.0 - 1.0,
        next_observation: next,
        terminal: rng.bool(),
    }
}
