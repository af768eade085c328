//! Construction-time parameters for the agent and the training session.

use serde::{Deserialize, Serialize};

use crate::error::RlError;

/// Hyper-parameters of the DQN learner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DqnConfig {
    /// Length of an observation vector
    pub observation_dim: usize,
    /// Number of discrete actions
    pub action_count: usize,
    /// Widths of the hidden ReLU layers
    pub hidden_layers: Vec<usize>,
    /// Adam step size
    pub learning_rate: f32,
    /// Discount factor applied to the bootstrapped next-state value
    pub gamma: f32,
    pub epsilon_start: f32,
    pub epsilon_end: f32,
    /// Learning steps over which epsilon falls linearly from start to end
    pub epsilon_decay_steps: u32,
    /// Transitions kept in the experience store
    pub replay_capacity: usize,
    /// Stored transitions required before a learning step runs
    pub min_replay_to_train: usize,
    /// Transitions sampled per learning step
    pub batch_size: usize,
    /// Learning steps between hard target-network syncs
    pub target_sync_period: u64,
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            observation_dim: physics::OBSERVATION_DIM,
            action_count: physics::Action::COUNT,
            hidden_layers: vec![64, 64],
            learning_rate: 0.001,
            gamma: 0.99,
            epsilon_start: 1.0,
            epsilon_end: 0.01,
            epsilon_decay_steps: 10_000,
            replay_capacity: 10_000,
            min_replay_to_train: 500,
            batch_size: 32,
            target_sync_period: 100,
        }
    }
}

impl DqnConfig {
    /// Layer widths of the value network, input to output.
    #[must_use]
    pub fn layer_widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.hidden_layers.len() + 2);
        widths.push(self.observation_dim);
        widths.extend(&self.hidden_layers);
        widths.push(self.action_count);
        widths
    }

    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] naming the first inconsistent field.
    pub fn validate(&self) -> Result<(), RlError> {
        let bad = |msg: String| Err(RlError::InvalidConfig(msg));
        if self.observation_dim != physics::OBSERVATION_DIM {
            return bad(format!(
                "observation_dim must be {}, got {}",
                physics::OBSERVATION_DIM,
                self.observation_dim
            ));
        }
        if self.action_count == 0 {
            return bad("action_count must be positive".into());
        }
        if self.hidden_layers.iter().any(|&w| w == 0) {
            return bad("hidden layer widths must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return bad(format!("gamma must lie in [0, 1], got {}", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.epsilon_end) || self.epsilon_start < self.epsilon_end || self.epsilon_start > 1.0 {
            return bad(format!(
                "epsilon schedule {} -> {} is not a valid probability decay",
                self.epsilon_start, self.epsilon_end
            ));
        }
        if self.epsilon_decay_steps == 0 {
            return bad("epsilon_decay_steps must be positive".into());
        }
        if self.replay_capacity == 0 || self.batch_size == 0 || self.target_sync_period == 0 {
            return bad("replay_capacity, batch_size and target_sync_period must be positive".into());
        }
        if self.min_replay_to_train == 0 || self.min_replay_to_train > self.replay_capacity {
            return bad(format!(
                "min_replay_to_train must be in 1..={}, got {}",
                self.replay_capacity, self.min_replay_to_train
            ));
        }
        if self.learning_rate <= 0.0 || !self.learning_rate.is_finite() {
            return bad(format!("learning_rate must be positive, got {}", self.learning_rate));
        }
        Ok(())
    }
}

/// Episode cadence and bookkeeping for a [`TrainingSession`](crate::TrainingSession).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Training finishes after this many episodes
    pub max_episodes: u64,
    /// A rally is cut off after this many ticks without a point
    pub max_ticks_per_rally: u32,
    /// Trailing window for the episode-outcome moving average
    pub average_window: usize,
    /// Points played by a demonstration run
    pub demo_games: u32,
    /// Ticks per yield in fast cadence
    pub fast_ticks_per_yield: usize,
    /// Wall-clock interval between ticks in real-time cadence
    pub realtime_interval_ms: u64,
    /// Master seed; every random stream in the session derives from it
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_episodes: 10_000,
            max_ticks_per_rally: 1_500,
            average_window: 100,
            demo_games: 5,
            fast_ticks_per_yield: 5,
            realtime_interval_ms: 30,
            seed: 0,
        }
    }
}

impl SessionConfig {
    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] naming the first zero-sized field.
    pub fn validate(&self) -> Result<(), RlError> {
        if self.max_ticks_per_rally == 0 || self.average_window == 0 || self.fast_ticks_per_yield == 0 {
            return Err(RlError::InvalidConfig(
                "max_ticks_per_rally, average_window and fast_ticks_per_yield must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        DqnConfig::default().validate().unwrap();
        SessionConfig::default().validate().unwrap();
    }

    #[test]
    fn default_network_shape() {
        assert_eq!(DqnConfig::default().layer_widths(), vec![6, 64, 64, 3]);
    }

    #[test]
    fn rejects_threshold_above_capacity() {
        let cfg = DqnConfig { replay_capacity: 10, min_replay_to_train: 11, ..DqnConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: DqnConfig = serde_json::from_str(r#"{ "gamma": 0.9 }"#).unwrap();
        assert_eq!(cfg.gamma, 0.9);
        assert_eq!(cfg.batch_size, 32);
    }
}
