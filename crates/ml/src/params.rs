//! Serializable network parameters.

use serde::{Deserialize, Serialize};

use crate::error::MlError;
use crate::tensor::Tensor;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TensorParams {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// Every parameter tensor of a network, in [`Sequential::params`](crate::Sequential::params) order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub tensors: Vec<TensorParams>,
}

impl NetworkParams {
    #[must_use]
    pub fn from_tensors(tensors: &[&Tensor]) -> Self {
        Self {
            tensors: tensors
                .iter()
                .map(|t| TensorParams { shape: t.shape.clone(), data: t.data.clone() })
                .collect(),
        }
    }

    /// Verify these parameters fit the given tensors one-for-one.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::ShapeMismatch`] on any count, shape or length difference.
    pub fn check_against(&self, tensors: &[&Tensor]) -> Result<(), MlError> {
        let expected: Vec<&[usize]> = tensors.iter().map(|t| t.shape.as_slice()).collect();
        let got: Vec<&[usize]> = self.tensors.iter().map(|t| t.shape.as_slice()).collect();
        let lengths_ok = self
            .tensors
            .iter()
            .all(|t| t.shape.iter().product::<usize>() == t.data.len());
        if expected == got && lengths_ok {
            Ok(())
        } else {
            Err(MlError::ShapeMismatch {
                expected: format!("{expected:?}"),
                got: format!("{got:?}"),
            })
        }
    }
}
