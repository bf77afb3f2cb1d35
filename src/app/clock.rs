//! Wall-clock frame timing.

use std::time::Instant;
use talus_core::particles::MAX_DT;

/// Measures the elapsed time between frames and clamps it so a stalled
/// process (suspended laptop, debugger pause) resumes with one normal
/// step instead of a huge integration jump.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    #[must_use]
    pub fn start() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous tick, clamped to the simulation's
    /// largest accepted step.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        Self::clamp(dt)
    }

    pub(crate) fn clamp(raw: f64) -> f64 {
        raw.clamp(0.0, MAX_DT)
    }
}
