//! Plain data types shared by the Pong simulation.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::error::PhysicsError;

/// Number of scalars in an [`Observation`].
pub const OBSERVATION_DIM: usize = 6;

/// Normalized view of the table handed to the learner.
///
/// Layout: `[ball_x, ball_y, ball_vel_x, ball_vel_y, own_paddle_center, opponent_paddle_center]`,
/// each roughly in `[-1, 1]`.
pub type Observation = [f32; OBSERVATION_DIM];

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Discrete control for the learner's paddle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Stay,
    Up,
    Down,
}

impl Action {
    /// Number of discrete actions.
    pub const COUNT: usize = 3;

    pub const ALL: [Action; Self::COUNT] = [Action::Stay, Action::Up, Action::Down];
}

impl TryFrom<usize> for Action {
    type Error = PhysicsError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(PhysicsError::InvalidAction(index))
    }
}

/// Full physical state of the table.
///
/// Paddle positions are the y of the paddle's top edge. The ball position is
/// its center. Screen coordinates: y grows downward.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    pub player_paddle_y: f32,
    pub opponent_paddle_y: f32,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub player_score: u32,
    pub opponent_score: u32,
}

/// Result of a single [`PongSim::step`](crate::PongSim::step).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
}

/// Read-only copy of the table for a renderer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub ball_radius: f32,
    pub state: TableState,
}
