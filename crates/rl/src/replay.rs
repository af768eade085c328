//! Fixed-capacity experience store with FIFO eviction.

use physics::Observation;

/// One environment step as seen by the learner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    pub observation: Observation,
    pub action: usize,
    pub reward: f32,
    pub next_observation: Observation,
    pub terminal: bool,
}

/// Circular buffer of [`Transition`]s. Once full, each insert overwrites the
/// oldest entry.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: Vec<Transition>,
    capacity: usize,
    // Slot the next insert writes to once the buffer is full.
    cursor: usize,
}

impl ReplayBuffer {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay capacity must be positive");
        Self { buffer: Vec::with_capacity(capacity), capacity, cursor: 0 }
    }

    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() < self.capacity {
            self.buffer.push(transition);
        } else {
            self.buffer[self.cursor] = transition;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    /// Draw `n` transitions uniformly at random, with replacement.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty; callers check readiness first.
    pub fn sample(&self, n: usize, rng: &mut fastrand::Rng) -> Vec<Transition> {
        assert!(!self.buffer.is_empty(), "sampled an empty replay buffer");
        (0..n).map(|_| self.buffer[rng.usize(..self.buffer.len())]).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Stored transitions from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        let split = if self.buffer.len() < self.capacity { 0 } else { self.cursor };
        let (newer, older) = self.buffer.split_at(split);
        older.iter().chain(newer.iter())
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(i: usize) -> Transition {
        #[allow(clippy::cast_precision_loss)]
        let r = i as f32;
        Transition {
            observation: [r; 6],
            action: i % 3,
            reward: r,
            next_observation: [r + 1.0; 6],
            terminal: false,
        }
    }

    #[test]
    fn iter_is_oldest_first_after_wrap() {
        let mut buf = ReplayBuffer::new(3);
        for i in 0..5 {
            buf.push(tagged(i));
        }
        let rewards: Vec<f32> = buf.iter().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn sample_draws_with_replacement() {
        let mut buf = ReplayBuffer::new(4);
        buf.push(tagged(0));
        let mut rng = fastrand::Rng::with_seed(0);
        let batch = buf.sample(8, &mut rng);
        assert_eq!(batch.len(), 8);
        assert!(batch.iter().all(|t| *t == tagged(0)));
    }

    #[test]
    #[should_panic(expected = "empty replay buffer")]
    fn sampling_empty_buffer_is_a_contract_violation() {
        let buf = ReplayBuffer::new(4);
        let _ = buf.sample(1, &mut fastrand::Rng::with_seed(0));
    }
}
