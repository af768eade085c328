//! # Pong Simulation Core
//!
//! [`PongSim`] owns the table state and advances it one tick per call to
//! [`PongSim::step`]. Each tick runs in a fixed order: player paddle,
//! opponent paddle, ball integration, walls, paddles, scoring, observation.

use tracing::trace;

use crate::collision::{resolve_paddles, resolve_scoring, resolve_walls, Point};
use crate::config::PongConfig;
use crate::error::PhysicsError;
use crate::integrator::{integrate_ball, move_opponent_paddle, move_player_paddle};
use crate::types::{Action, Observation, StepResult, TableSnapshot, TableState, Vec2};

/// Deterministic two-paddle table. The learner controls the left paddle.
pub struct PongSim {
    config: PongConfig,
    state: TableState,
    rng: fastrand::Rng,
}

impl PongSim {
    /// Create a table with centered paddles and a randomized serve.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: PongConfig, seed: u64) -> Result<Self, PhysicsError> {
        config.validate()?;
        let state = centered_state(&config);
        let mut sim = Self { config, state, rng: fastrand::Rng::with_seed(seed) };
        sim.serve();
        Ok(sim)
    }

    /// Create a table from an explicit state, e.g. to set up a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] if `config` fails validation.
    pub fn from_state(config: PongConfig, state: TableState, seed: u64) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self { config, state, rng: fastrand::Rng::with_seed(seed) })
    }

    #[must_use]
    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Re-center paddles and ball and serve in a random direction. Scores are kept.
    pub fn reset(&mut self) -> Observation {
        let scores = (self.state.player_score, self.state.opponent_score);
        self.state = centered_state(&self.config);
        (self.state.player_score, self.state.opponent_score) = scores;
        self.serve();
        self.observation()
    }

    /// Zero both scores.
    pub fn clear_scores(&mut self) {
        self.state.player_score = 0;
        self.state.opponent_score = 0;
    }

    /// Advance the table by one tick with `action` applied to the learner's paddle.
    pub fn step(&mut self, action: Action) -> StepResult {
        move_player_paddle(&mut self.state, action, &self.config);
        move_opponent_paddle(&mut self.state, &self.config);
        integrate_ball(&mut self.state);
        resolve_walls(&mut self.state, &self.config);

        let mut reward = 0.0;
        let mut done = false;
        if resolve_paddles(&mut self.state, &self.config) {
            reward = self.config.hit_reward;
        }
        if let Some(point) = resolve_scoring(&mut self.state, &self.config) {
            reward = match point {
                Point::Player => self.config.point_reward,
                Point::Opponent => -self.config.point_reward,
            };
            done = true;
            trace!(
                ?point,
                player = self.state.player_score,
                opponent = self.state.opponent_score,
                "point scored"
            );
        }

        StepResult { observation: self.observation(), reward, done }
    }

    /// Encode the current state as a normalized observation.
    #[must_use]
    pub fn observation(&self) -> Observation {
        let c = &self.config;
        let s = &self.state;
        let half_paddle = c.paddle_height / 2.0;
        [
            s.ball_pos.x / c.width * 2.0 - 1.0,
            s.ball_pos.y / c.height * 2.0 - 1.0,
            s.ball_vel.x / c.max_ball_speed,
            s.ball_vel.y / c.max_ball_speed,
            (s.player_paddle_y + half_paddle) / c.height * 2.0 - 1.0,
            (s.opponent_paddle_y + half_paddle) / c.height * 2.0 - 1.0,
        ]
    }

    /// Copy of the table for a renderer.
    #[must_use]
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            width: self.config.width,
            height: self.config.height,
            paddle_width: self.config.paddle_width,
            paddle_height: self.config.paddle_height,
            ball_radius: self.config.ball_radius,
            state: self.state,
        }
    }

    fn serve(&mut self) {
        let c = &self.config;
        let vx = if self.rng.bool() { c.serve_speed } else { -c.serve_speed };
        let mut vy = self.rng.f32() * 2.0 * c.serve_vertical_range - c.serve_vertical_range;
        // Keep the serve from degenerating into a flat horizontal rally.
        if vy.abs() < c.min_serve_vertical_speed {
            vy = c.min_serve_vertical_speed * vy.signum();
        }
        self.state.ball_vel = Vec2::new(vx, vy);
    }
}

fn centered_state(config: &PongConfig) -> TableState {
    let paddle_y = config.height / 2.0 - config.paddle_height / 2.0;
    TableState {
        player_paddle_y: paddle_y,
        opponent_paddle_y: paddle_y,
        ball_pos: Vec2::new(config.width / 2.0, config.height / 2.0),
        ball_vel: Vec2::ZERO,
        player_score: 0,
        opponent_score: 0,
    }
}
