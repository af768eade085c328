/// Linearly decaying exploration rate.
#[derive(Clone, Debug, PartialEq)]
pub struct EpsilonSchedule {
    start: f32,
    end: f32,
    decrement: f32,
    value: f32,
}

impl EpsilonSchedule {
    /// Fall from `start` to `end` in `steps` equal decrements.
    #[must_use]
    pub fn linear(start: f32, end: f32, steps: u32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let decrement = (start - end) / steps.max(1) as f32;
        Self { start, end, decrement, value: start }
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[must_use]
    pub fn end(&self) -> f32 {
        self.end
    }

    /// One decrement, never below `end`.
    pub fn decay(&mut self) {
        self.value = (self.value - self.decrement).max(self.end);
    }

    /// Back to full exploration.
    pub fn restart(&mut self) {
        self.value = self.start;
    }

    /// Jump straight to the floor.
    pub fn finish(&mut self) {
        self.value = self.end;
    }
}
