//! Per-episode values handed to the display side.

use std::collections::VecDeque;

use serde::Serialize;

/// How a training episode ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Won,
    Lost,
    /// The rally hit the tick cutoff before anyone scored.
    Neutral,
}

impl Outcome {
    /// Value recorded in the moving average: `+1`, `-1` or `0`.
    #[must_use]
    pub fn reward(self) -> f32 {
        match self {
            Outcome::Won => 1.0,
            Outcome::Lost => -1.0,
            Outcome::Neutral => 0.0,
        }
    }
}

/// Trailing window of episode outcomes.
#[derive(Clone, Debug)]
pub struct EpisodeHistory {
    window: usize,
    recent: VecDeque<f32>,
    total: usize,
}

impl EpisodeHistory {
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self { window: window.max(1), recent: VecDeque::with_capacity(window), total: 0 }
    }

    pub fn record(&mut self, value: f32) {
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(value);
        self.total += 1;
    }

    /// Mean of the last `window` values, `0.0` when nothing is recorded.
    #[must_use]
    pub fn average(&self) -> f32 {
        if self.recent.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.recent.len() as f32;
        self.recent.iter().sum::<f32>() / n
    }

    /// Values recorded since the last clear, including ones outside the window.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn clear(&mut self) {
        self.recent.clear();
        self.total = 0;
    }
}

/// Everything the display side needs after one training episode.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct EpisodeReport {
    /// 1-based episode number since training started
    pub episode: u64,
    pub outcome: Outcome,
    pub outcome_reward: f32,
    /// Moving average of outcome rewards over the configured window
    pub average: f32,
    /// `None` until the replay store is warm enough to train
    pub loss: Option<f32>,
    pub epsilon: f32,
    pub player_score: u32,
    pub opponent_score: u32,
    /// Ticks the episode lasted
    pub ticks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_average_is_zero() {
        assert_eq!(EpisodeHistory::new(100).average(), 0.0);
    }

    #[test]
    fn average_only_sees_the_window() {
        let mut h = EpisodeHistory::new(3);
        for v in [-1.0, -1.0, 1.0, 1.0, 0.0] {
            h.record(v);
        }
        assert_relative_eq!(h.average(), 2.0 / 3.0);
        assert_eq!(h.total(), 5);
    }
}
