//! # DQN Agent
//!
//! Epsilon-greedy action selection over an online Q-network, and a learning
//! step that regresses the taken action's value toward a Bellman target
//! computed with a periodically synced target network.

use ml::{mse, Adam, NetworkParams, Tensor};
use physics::Observation;
use tracing::{debug, info, warn};

use crate::config::DqnConfig;
use crate::error::RlError;
use crate::qnet::{to_tensor, QNetwork};
use crate::replay::{ReplayBuffer, Transition};
use crate::schedule::EpsilonSchedule;

/// Result of [`DqnAgent::train`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TrainOutcome {
    /// Fewer than `min_replay_to_train` transitions stored; nothing changed.
    NotReady,
    /// One update ran; `loss` is the batch mean squared error.
    Trained { loss: f32 },
}

impl TrainOutcome {
    #[must_use]
    pub fn loss(self) -> Option<f32> {
        match self {
            TrainOutcome::NotReady => None,
            TrainOutcome::Trained { loss } => Some(loss),
        }
    }
}

/// `reward + gamma * max_next_q`, or just `reward` for a terminal transition.
#[must_use]
pub fn bellman_target(reward: f32, gamma: f32, max_next_q: f32, terminal: bool) -> f32 {
    if terminal {
        reward
    } else {
        reward + gamma * max_next_q
    }
}

pub struct DqnAgent {
    config: DqnConfig,
    online: QNetwork,
    target: QNetwork,
    optimizer: Adam,
    replay: ReplayBuffer,
    epsilon: EpsilonSchedule,
    train_steps: u64,
    explore_rng: fastrand::Rng,
    sample_rng: fastrand::Rng,
}

impl DqnAgent {
    /// Build an agent with fresh networks; the target starts as a copy of the online network.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: DqnConfig, seed: u64) -> Result<Self, RlError> {
        config.validate()?;
        let mut seeds = fastrand::Rng::with_seed(seed);
        let mut init_rng = fastrand::Rng::with_seed(seeds.u64(..));
        let widths = config.layer_widths();
        let online = QNetwork::new(&widths, &mut init_rng);
        let mut target = QNetwork::new(&widths, &mut init_rng);
        target.copy_from(&online)?;

        Ok(Self {
            optimizer: Adam::new(config.learning_rate),
            replay: ReplayBuffer::new(config.replay_capacity),
            epsilon: EpsilonSchedule::linear(
                config.epsilon_start,
                config.epsilon_end,
                config.epsilon_decay_steps,
            ),
            train_steps: 0,
            explore_rng: fastrand::Rng::with_seed(seeds.u64(..)),
            sample_rng: fastrand::Rng::with_seed(seeds.u64(..)),
            online,
            target,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    #[must_use]
    pub fn epsilon(&self) -> f32 {
        self.epsilon.value()
    }

    /// Learning steps taken since construction or the last restart.
    #[must_use]
    pub fn train_steps(&self) -> u64 {
        self.train_steps
    }

    /// Updates applied by the optimizer since construction or the last load.
    #[must_use]
    pub fn optimizer_steps(&self) -> u32 {
        self.optimizer.steps()
    }

    #[must_use]
    pub fn replay(&self) -> &ReplayBuffer {
        &self.replay
    }

    #[must_use]
    pub fn online(&self) -> &QNetwork {
        &self.online
    }

    #[must_use]
    pub fn target(&self) -> &QNetwork {
        &self.target
    }

    /// Whether enough experience is stored for [`DqnAgent::train`] to run.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.replay.len() >= self.config.min_replay_to_train
    }

    /// Pick an action for `obs`.
    ///
    /// While training, a uniformly random action is taken with probability
    /// epsilon; otherwise, and always when `evaluating`, the online network's
    /// greedy action.
    pub fn choose_action(&mut self, obs: &Observation, evaluating: bool) -> usize {
        if !evaluating && self.explore_rng.f32() < self.epsilon.value() {
            self.explore_rng.usize(..self.config.action_count)
        } else {
            self.online.greedy_action(obs)
        }
    }

    /// Store a transition, evicting the oldest one when full.
    pub fn remember(&mut self, transition: Transition) {
        self.replay.push(transition);
    }

    /// One learning step on a sampled batch.
    ///
    /// Does nothing and returns [`TrainOutcome::NotReady`] until the replay
    /// store holds `min_replay_to_train` transitions.
    pub fn train(&mut self) -> TrainOutcome {
        if !self.is_ready() {
            return TrainOutcome::NotReady;
        }

        let batch = self.replay.sample(self.config.batch_size, &mut self.sample_rng);
        let targets: Vec<f32> = batch
            .iter()
            .map(|t| {
                bellman_target(
                    t.reward,
                    self.config.gamma,
                    self.target.max_q(&t.next_observation),
                    t.terminal,
                )
            })
            .collect();

        let loss = self.fit_online(&batch, &targets);

        self.train_steps += 1;
        if self.train_steps % self.config.target_sync_period == 0 {
            self.sync_target();
            info!(step = self.train_steps, "target network synced");
        }
        self.epsilon.decay();
        debug!(step = self.train_steps, loss, epsilon = self.epsilon.value(), "learning step");

        TrainOutcome::Trained { loss }
    }

    // Gradient of the MSE between Q(s, a_taken) and the targets, averaged
    // over the batch, followed by one Adam update of the online network.
    fn fit_online(&mut self, batch: &[Transition], targets: &[f32]) -> f32 {
        let net = self.online.inner();
        #[allow(clippy::cast_precision_loss)]
        let n = batch.len() as f32;
        let mut grads = net.zero_grads();
        let mut preds = Vec::with_capacity(batch.len());

        for (t, &target) in batch.iter().zip(targets) {
            let (out, activations) = net.forward(&to_tensor(&t.observation));
            let pred = out.data[t.action];
            preds.push(pred);

            let mut grad_out = Tensor::zeros(out.shape.clone());
            grad_out.data[t.action] = 2.0 * (pred - target) / n;
            let (_, sample_grads) = net.backward(&activations, &grad_out);
            for (acc, g) in grads.iter_mut().zip(&sample_grads) {
                acc.add_assign(g);
            }
        }

        let mut pairs: Vec<_> = self.online.inner_mut().params_mut().into_iter().zip(grads.iter()).collect();
        self.optimizer.step(&mut pairs);
        mse(&preds, targets)
    }

    /// Hard-copy the online parameters into the target network.
    pub fn sync_target(&mut self) {
        if let Err(err) = self.target.copy_from(&self.online) {
            warn!(%err, "target sync skipped");
        }
    }

    /// Reset exploration and the step counter for a fresh training run.
    /// Stored experience and network weights are kept.
    pub fn restart(&mut self) {
        self.epsilon.restart();
        self.train_steps = 0;
    }

    #[must_use]
    pub fn export_online(&self) -> NetworkParams {
        self.online.export_params()
    }

    /// Replace the online network with restored parameters and immediately
    /// re-sync the target. Exploration is pinned to its floor, the replay
    /// store starts empty and the optimizer forgets its moments, as for a
    /// freshly built agent.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::IncompatibleModel`] if `params` does not fit this
    /// agent's architecture; the agent is left untouched.
    pub fn load_online(&mut self, params: &NetworkParams) -> Result<(), RlError> {
        self.online.import_params(params)?;
        self.sync_target();
        self.epsilon.finish();
        self.replay.clear();
        self.train_steps = 0;
        self.optimizer = Adam::new(self.config.learning_rate);
        info!(epsilon = self.epsilon.value(), "restored online network");
        Ok(())
    }
}
