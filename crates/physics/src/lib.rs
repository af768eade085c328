#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Pong Physics
//!
//! The deterministic table simulation that defines the control problem.
//!
//! ## Key Components
//!
//! -   **Table state:** [`TableState`] holds both paddle positions, the ball
//!     and the cumulative scores. It is only mutated by [`PongSim::step`] and
//!     [`PongSim::reset`].
//! -   **Simulation:** [`PongSim`] applies an [`Action`] to the learner's
//!     paddle, moves the scripted opponent, integrates the ball, resolves
//!     contacts and scoring, and returns a normalized [`Observation`] with the
//!     tick's reward and termination flag.
//! -   **Configuration:** [`PongConfig`] carries geometry, speeds and reward
//!     values; the defaults reproduce a 600×400 table.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{Action, PongConfig, PongSim};
//!
//! let mut sim = PongSim::new(PongConfig::default(), 42)?;
//! let mut obs = sim.reset();
//! loop {
//!     let step = sim.step(Action::Stay);
//!     obs = step.observation;
//!     if step.done {
//!         break;
//!     }
//! }
//! # let _ = obs;
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod collision;
pub mod config;
pub mod error;
pub mod integrator;
pub mod pong;
pub mod types;

pub use config::PongConfig;
pub use error::PhysicsError;
pub use pong::PongSim;
pub use types::{
    Action, Observation, StepResult, TableSnapshot, TableState, Vec2, OBSERVATION_DIM,
};
