#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
//! # Reinforcement Learning
//!
//! Deep Q-learning for a single agent with a discrete action space: an
//! [`Env`] abstraction, a ring-buffer [`ReplayBuffer`], the [`DqnAgent`]
//! with its online and target [`QNetwork`]s, and the [`TrainingSession`]
//! that drives them tick by tick.
//!
//! ```
//! use rl::{pong_session, DqnConfig, SessionConfig};
//!
//! let mut session = pong_session(
//!     physics::PongConfig::default(),
//!     DqnConfig::default(),
//!     SessionConfig { max_episodes: 2, ..SessionConfig::default() },
//! )
//! .unwrap();
//! session.start_training().unwrap();
//! while session.mode().is_active() {
//!     session.advance(5);
//! }
//! assert_eq!(session.episode(), 2);
//! ```

pub mod config;
pub mod dqn;
pub mod env;
pub mod error;
pub mod metrics;
pub mod persistence;
pub mod qnet;
pub mod replay;
pub mod schedule;
pub mod session;

pub use config::{DqnConfig, SessionConfig};
pub use dqn::{bellman_target, DqnAgent, TrainOutcome};
pub use env::Env;
pub use error::RlError;
pub use metrics::{EpisodeHistory, EpisodeReport, Outcome};
pub use persistence::{JsonFileStore, MemoryStore, ParameterStore, MODEL_KEY};
pub use qnet::QNetwork;
pub use replay::{ReplayBuffer, Transition};
pub use schedule::EpsilonSchedule;
pub use session::{pong_session, Cadence, Mode, StopHandle, TrainingSession};
