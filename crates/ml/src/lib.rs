#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
//! # ML Building Blocks
//!
//! Small, dependency-light pieces for value-function approximation on the
//! CPU: a [`Tensor`] buffer, [`Layer`]s with explicit backward passes stacked
//! in a [`Sequential`], the [`Adam`] optimizer, mean-squared-error loss and a
//! serde representation of network parameters for persistence.

pub mod error;
pub mod loss;
pub mod nn;
pub mod optim;
pub mod params;
pub mod tensor;

pub use error::MlError;
pub use loss::{mse, mse_grad};
pub use nn::{Dense, Layer, Relu, Sequential};
pub use optim::Adam;
pub use params::{NetworkParams, TensorParams};
pub use tensor::Tensor;
