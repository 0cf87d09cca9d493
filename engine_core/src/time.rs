//! Frame clock

use std::time::Duration;

/// Clock advanced once per engine tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    /// Seconds since the previous tick
    pub delta: f32,
    /// Seconds accumulated over all ticks
    pub elapsed: f64,
    pub frame_count: u64,
}

impl Time {
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta.as_secs_f32();
        self.elapsed += delta.as_secs_f64();
        self.frame_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut time = Time::default();
        time.advance(Duration::from_millis(16));
        time.advance(Duration::from_millis(34));
        assert_eq!(time.frame_count, 2);
        assert!((time.delta - 0.034).abs() < 1e-6);
        assert!((time.elapsed - 0.050).abs() < 1e-9);
    }
}
