//! # Table Integration
//!
//! Kinematic updates for the two paddles and the ball. Everything here moves
//! bodies; contact handling lives in [`crate::collision`].

use crate::config::PongConfig;
use crate::types::{Action, TableState};

/// Apply the learner's action to its paddle and clamp it to the table.
pub fn move_player_paddle(state: &mut TableState, action: Action, config: &PongConfig) {
    match action {
        Action::Stay => {}
        Action::Up => state.player_paddle_y -= config.paddle_speed,
        Action::Down => state.player_paddle_y += config.paddle_speed,
    }
    state.player_paddle_y = state.player_paddle_y.clamp(0.0, config.paddle_travel());
}

/// Scripted opponent: chase the ball's height at a fraction of paddle speed,
/// but only while the ball is on the opponent's half of the table.
pub fn move_opponent_paddle(state: &mut TableState, config: &PongConfig) {
    let travel = config.paddle_travel();
    let center = state.opponent_paddle_y + config.paddle_height / 2.0;
    let speed = config.paddle_speed * config.opponent_speed_factor;
    let ball_on_opponent_side = state.ball_pos.x > config.width / 2.0;

    if ball_on_opponent_side {
        if center < state.ball_pos.y - config.opponent_dead_zone {
            state.opponent_paddle_y += speed.min(travel - state.opponent_paddle_y);
        } else if center > state.ball_pos.y + config.opponent_dead_zone {
            state.opponent_paddle_y -= speed.min(state.opponent_paddle_y);
        }
    }
    state.opponent_paddle_y = state.opponent_paddle_y.clamp(0.0, travel);
}

/// Advance the ball by one tick of its current velocity.
pub fn integrate_ball(state: &mut TableState) {
    state.ball_pos += state.ball_vel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec2;

    fn centered(config: &PongConfig) -> TableState {
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

    #[test]
    fn up_moves_toward_the_top_edge() {
        let config = PongConfig::default();
        let mut state = centered(&config);
        let before = state.player_paddle_y;
        move_player_paddle(&mut state, Action::Up, &config);
        assert_eq!(state.player_paddle_y, before - config.paddle_speed);
    }

    #[test]
    fn opponent_idles_while_ball_is_on_player_half() {
        let config = PongConfig::default();
        let mut state = centered(&config);
        state.ball_pos = Vec2::new(100.0, 0.0);
        let before = state.opponent_paddle_y;
        move_opponent_paddle(&mut state, &config);
        assert_eq!(state.opponent_paddle_y, before);
    }

    #[test]
    fn opponent_chases_ball_on_its_half() {
        let config = PongConfig::default();
        let mut state = centered(&config);
        state.ball_pos = Vec2::new(500.0, 390.0);
        let before = state.opponent_paddle_y;
        move_opponent_paddle(&mut state, &config);
        let expected = before + config.paddle_speed * config.opponent_speed_factor;
        assert!((state.opponent_paddle_y - expected).abs() < 1e-5);
    }

    #[test]
    fn opponent_holds_inside_dead_zone() {
        let config = PongConfig::default();
        let mut state = centered(&config);
        let center = state.opponent_paddle_y + config.paddle_height / 2.0;
        state.ball_pos = Vec2::new(500.0, center + config.opponent_dead_zone - 1.0);
        let before = state.opponent_paddle_y;
        move_opponent_paddle(&mut state, &config);
        assert_eq!(state.opponent_paddle_y, before);
    }
}
