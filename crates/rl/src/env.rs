use physics::{Action, Observation, PongSim, TableSnapshot, OBSERVATION_DIM};

/// Reinforcement learning environment with a discrete action space.
///
/// Each call to [`step`] advances the simulation by one action and returns
/// the new observation, a reward signal, and whether the episode has
/// terminated.
///
/// [`step`]: Env::step
pub trait Env {
    /// Read-only view handed to a renderer.
    type Snapshot;

    /// Advance the environment by one action.
    ///
    /// Returns `(obs, reward, done)`.
    fn step(&mut self, action: usize) -> (Observation, f32, bool);

    /// Start a new episode and return its first observation. Cumulative
    /// scores survive a reset.
    fn reset(&mut self) -> Observation;

    /// Zero the cumulative scores.
    fn clear_scores(&mut self);

    /// `(learner, opponent)` cumulative scores.
    fn scores(&self) -> (u32, u32);

    fn snapshot(&self) -> Self::Snapshot;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Number of discrete actions.
    fn action_size(&self) -> usize;
}

impl Env for PongSim {
    type Snapshot = TableSnapshot;

    /// # Panics
    ///
    /// Panics if `action` is not below [`Action::COUNT`].
    fn step(&mut self, action: usize) -> (Observation, f32, bool) {
        let step = PongSim::step(self, Action::ALL[action]);
        (step.observation, step.reward, step.done)
    }

    fn reset(&mut self) -> Observation {
        PongSim::reset(self)
    }

    fn clear_scores(&mut self) {
        PongSim::clear_scores(self);
    }

    fn scores(&self) -> (u32, u32) {
        let s = self.state();
        (s.player_score, s.opponent_score)
    }

    fn snapshot(&self) -> TableSnapshot {
        PongSim::snapshot(self)
    }

    fn obs_size(&self) -> usize {
        OBSERVATION_DIM
    }

    fn action_size(&self) -> usize {
        Action::COUNT
    }
}
