use ml::{MlError, NetworkParams, Sequential, Tensor};
use physics::Observation;

/// Maps an observation to one value estimate per action.
pub struct QNetwork {
    net: Sequential,
}

impl QNetwork {
    /// Fresh network with Glorot-initialized weights.
    pub fn new(widths: &[usize], rng: &mut fastrand::Rng) -> Self {
        Self { net: Sequential::mlp(widths, rng) }
    }

    #[must_use]
    pub fn q_values(&self, obs: &Observation) -> Tensor {
        self.net.predict(&to_tensor(obs))
    }

    /// Highest-valued action; the first wins on ties.
    #[must_use]
    pub fn greedy_action(&self, obs: &Observation) -> usize {
        self.q_values(obs).argmax()
    }

    /// Best estimated value over all actions.
    #[must_use]
    pub fn max_q(&self, obs: &Observation) -> f32 {
        self.q_values(obs).max()
    }

    pub(crate) fn inner(&self) -> &Sequential {
        &self.net
    }

    pub(crate) fn inner_mut(&mut self) -> &mut Sequential {
        &mut self.net
    }

    /// Overwrite every parameter with `other`'s.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::ShapeMismatch`] if the architectures differ.
    pub fn copy_from(&mut self, other: &QNetwork) -> Result<(), MlError> {
        self.net.copy_params_from(&other.net)
    }

    #[must_use]
    pub fn export_params(&self) -> NetworkParams {
        self.net.export_params()
    }

    /// # Errors
    ///
    /// Returns [`MlError::ShapeMismatch`] if `params` came from another architecture.
    pub fn import_params(&mut self, params: &NetworkParams) -> Result<(), MlError> {
        self.net.import_params(params)
    }
}

pub(crate) fn to_tensor(obs: &Observation) -> Tensor {
    Tensor::from_vec(vec![obs.len()], obs.to_vec())
}
