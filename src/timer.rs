//! Frame timer on the monotonic clock.

use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct Timer {
    last: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous mark (or construction); starts a new span.
    pub fn mark(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        elapsed.as_secs_f32()
    }

    /// Seconds since the previous mark, without resetting.
    pub fn peek(&self) -> f32 {
        self.last.elapsed().as_secs_f32()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
