//! Wall-clock position tracking
//!
//! The audio graph has no reliable position callback, so the position is
//! derived from a checkpoint: `base + (now - anchor) * rate` while running,
//! `base` while paused. Nothing is ever accumulated from polling.

use std::time::{Duration, Instant};

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The system monotonic clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Position checkpoint of the loaded track
#[derive(Debug, Clone, PartialEq)]
pub struct PositionClock {
    base: Duration,
    anchor: Option<Instant>,
    rate: f32,
}

impl Default for PositionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionClock {
    pub fn new() -> Self {
        Self {
            base: Duration::ZERO,
            anchor: None,
            rate: 1.0,
        }
    }

    /// Position at `now`
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.anchor {
            Some(anchor) => {
                let running = now.saturating_duration_since(anchor);
                if self.rate == 1.0 {
                    self.base + running
                } else {
                    self.base + running.mul_f64(f64::from(self.rate))
                }
            }
            None => self.base,
        }
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    /// Move the checkpoint to `at`
    pub fn reset(&mut self, now: Instant, at: Duration, running: bool) {
        self.base = at;
        self.anchor = running.then_some(now);
    }

    /// Freeze the position (`elapsed_at_pause`)
    pub fn pause(&mut self, now: Instant) {
        if self.anchor.is_some() {
            self.base = self.elapsed(now);
            self.anchor = None;
        }
    }

    /// Continue from the frozen position
    pub fn resume(&mut self, now: Instant) {
        if self.anchor.is_none() {
            self.anchor = Some(now);
        }
    }

    /// Change the rate, rebasing so the position stays continuous
    pub fn set_rate(&mut self, now: Instant, rate: f32) {
        if self.anchor.is_some() {
            self.base = self.elapsed(now);
            self.anchor = Some(now);
        }
        self.rate = if rate.is_finite() && rate > 0.0 { rate } else { 1.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_preserves_elapsed() {
        let start = Instant::now();
        let mut clock = PositionClock::new();
        clock.reset(start, Duration::ZERO, true);

        clock.pause(start + Duration::from_secs(5));
        assert_eq!(clock.elapsed(start + Duration::from_secs(60)), Duration::from_secs(5));

        clock.resume(start + Duration::from_secs(60));
        assert_eq!(clock.elapsed(start + Duration::from_secs(62)), Duration::from_secs(7));
    }

    #[test]
    fn reset_while_paused_stays_paused() {
        let start = Instant::now();
        let mut clock = PositionClock::new();
        clock.reset(start, Duration::from_secs(30), false);
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(start + Duration::from_secs(10)), Duration::from_secs(30));
    }

    #[test]
    fn rate_change_is_continuous() {
        let start = Instant::now();
        let mut clock = PositionClock::new();
        clock.reset(start, Duration::ZERO, true);

        clock.set_rate(start + Duration::from_secs(4), 2.0);
        assert_eq!(clock.elapsed(start + Duration::from_secs(4)), Duration::from_secs(4));
        assert_eq!(clock.elapsed(start + Duration::from_secs(6)), Duration::from_secs(8));
    }

    #[test]
    fn invalid_rate_falls_back_to_unity() {
        let start = Instant::now();
        let mut clock = PositionClock::new();
        clock.set_rate(start, f32::NAN);
        clock.reset(start, Duration::ZERO, true);
        assert_eq!(clock.elapsed(start + Duration::from_secs(3)), Duration::from_secs(3));
    }
}
