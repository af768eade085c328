//! # Pong DQN
//!
//! A deep Q-learning agent that learns to return serves in a minimal game of
//! Pong, written as a small stack of crates.
//!
//! ## Project Architecture
//!
//! -   **`pongdqn`:** The crate you are currently viewing. It holds the
//!     command-line entry point, the configuration file format and the host
//!     loop that paces a training session.
//! -   **[`physics`]:** The table simulation. Paddles, ball, walls, scoring
//!     and the scripted opponent live here, behind a `step`/`reset` API that
//!     returns normalized observations.
//! -   **[`ml`]:** Tensors, dense layers with hand-written backward passes,
//!     the Adam optimizer and serializable network parameters.
//! -   **[`rl`]:** The experience replay store, the DQN agent with its target
//!     network, and the tick-driven training session.
//!
//! ## Getting Started
//!
//! ```text
//! pongdqn train --fast --episodes 2000 --save
//! pongdqn demo
//! ```
//!
//! Logging is controlled through `RUST_LOG`; `RUST_LOG=rl=debug` prints every
//! finished episode.

pub mod config;

pub use config::AppConfig;
pub use ml;
pub use physics;
pub use rl;
