//! # Contact Resolution
//!
//! Wall bounces, paddle returns and scoring. The order matters: callers run
//! [`resolve_walls`], then [`resolve_paddles`], then [`resolve_scoring`], so a
//! point scored on the same tick as a paddle contact overrides the hit.

use crate::config::PongConfig;
use crate::types::TableState;

/// Which side won a point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Point {
    Player,
    Opponent,
}

/// Reflect the ball off the top and bottom walls.
pub fn resolve_walls(state: &mut TableState, config: &PongConfig) {
    let r = config.ball_radius;
    if state.ball_pos.y - r < 0.0 {
        state.ball_pos.y = r;
        state.ball_vel.y = -state.ball_vel.y;
    } else if state.ball_pos.y + r > config.height {
        state.ball_pos.y = config.height - r;
        state.ball_vel.y = -state.ball_vel.y;
    }
}

/// Bounce the ball off either paddle.
///
/// Returns `true` when the learner's (left) paddle returned the ball.
pub fn resolve_paddles(state: &mut TableState, config: &PongConfig) -> bool {
    let r = config.ball_radius;
    let mut player_hit = false;

    let leading_left = state.ball_pos.x - r;
    if leading_left < config.paddle_width
        && leading_left > 0.0
        && within_paddle(state.ball_pos.y, state.player_paddle_y, config)
    {
        state.ball_pos.x = config.paddle_width + r;
        bounce(state, state.player_paddle_y, config);
        player_hit = true;
    }

    let leading_right = state.ball_pos.x + r;
    if leading_right > config.width - config.paddle_width
        && leading_right < config.width
        && within_paddle(state.ball_pos.y, state.opponent_paddle_y, config)
    {
        state.ball_pos.x = config.width - config.paddle_width - r;
        bounce(state, state.opponent_paddle_y, config);
    }

    player_hit
}

/// Detect a ball that left the table through either goal line and credit the
/// scoring side.
pub fn resolve_scoring(state: &mut TableState, config: &PongConfig) -> Option<Point> {
    let r = config.ball_radius;
    if state.ball_pos.x - r < 0.0 {
        state.opponent_score += 1;
        Some(Point::Opponent)
    } else if state.ball_pos.x + r > config.width {
        state.player_score += 1;
        Some(Point::Player)
    } else {
        None
    }
}

fn within_paddle(ball_y: f32, paddle_y: f32, config: &PongConfig) -> bool {
    ball_y > paddle_y && ball_y < paddle_y + config.paddle_height
}

// Reverse and amplify horizontal speed; steer vertically by impact offset.
fn bounce(state: &mut TableState, paddle_y: f32, config: &PongConfig) {
    state.ball_vel.x *= -config.bounce_amplification;
    let offset = state.ball_pos.y - (paddle_y + config.paddle_height / 2.0);
    state.ball_vel.y = offset * config.steering_factor;
}
