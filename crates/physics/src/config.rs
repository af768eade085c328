//! Table geometry, speeds and reward values for the Pong simulation.

use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

/// Configuration for a [`PongSim`](crate::PongSim)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    /// Table width in pixels
    pub width: f32,
    /// Table height in pixels
    pub height: f32,
    /// Paddle thickness along x
    pub paddle_width: f32,
    /// Paddle length along y
    pub paddle_height: f32,
    pub ball_radius: f32,
    /// Distance a paddle travels per tick at full speed
    pub paddle_speed: f32,
    /// Horizontal ball speed on a fresh serve
    pub serve_speed: f32,
    /// Serve vertical speed is drawn from `[-serve_vertical_range, serve_vertical_range)`
    pub serve_vertical_range: f32,
    /// Serves slower than this vertically are pushed out to it
    pub min_serve_vertical_speed: f32,
    /// Fraction of `paddle_speed` the scripted opponent moves at
    pub opponent_speed_factor: f32,
    /// The opponent ignores vertical offsets smaller than this
    pub opponent_dead_zone: f32,
    /// Horizontal speed multiplier applied on every paddle bounce
    pub bounce_amplification: f32,
    /// Vertical speed per pixel of offset from the paddle center on a bounce
    pub steering_factor: f32,
    /// Shaping reward for returning the ball
    pub hit_reward: f32,
    /// Reward for winning a point; losing one yields its negation
    pub point_reward: f32,
    /// Velocity normalization denominator for observations
    pub max_ball_speed: f32,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            paddle_width: 10.0,
            paddle_height: 80.0,
            ball_radius: 5.0,
            paddle_speed: 6.0,
            serve_speed: 4.0,
            serve_vertical_range: 2.0,
            min_serve_vertical_speed: 0.5,
            opponent_speed_factor: 0.7,
            opponent_dead_zone: 15.0,
            bounce_amplification: 1.05,
            steering_factor: 0.25,
            hit_reward: 0.1,
            point_reward: 1.0,
            max_ball_speed: 5.0,
        }
    }
}

impl PongConfig {
    /// Highest valid paddle y (top edge), i.e. the playable vertical range.
    #[must_use]
    pub fn paddle_travel(&self) -> f32 {
        self.height - self.paddle_height
    }

    /// Reject geometry that would make normalization or clamping meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] describing the first bad field.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_radius", self.ball_radius),
            ("max_ball_speed", self.max_ball_speed),
        ];
        for (name, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(PhysicsError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.paddle_height > self.height {
            return Err(PhysicsError::InvalidConfig(format!(
                "paddle_height {} exceeds table height {}",
                self.paddle_height, self.height
            )));
        }
        if self.min_serve_vertical_speed < 0.0 || self.serve_vertical_range < 0.0 {
            return Err(PhysicsError::InvalidConfig(
                "serve speeds must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
