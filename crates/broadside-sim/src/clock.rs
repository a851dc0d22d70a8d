//! Wall-clock to frame-scale conversion.

use std::time::{Duration, Instant};

/// Measures real time between tick starts and turns it into a frame scale.
///
/// A scale of 1.0 means the tick started exactly one nominal interval after
/// the previous one. Stalls are capped at `max_scale` so a long pause never
/// integrates into a single huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    nominal: Duration,
    max_scale: f64,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new(nominal: Duration, max_scale: f64) -> Self {
        Self {
            nominal,
            max_scale: max_scale.max(0.0),
            last: None,
        }
    }

    /// Clock for a tick rate in Hz.
    pub fn from_tick_rate(tick_rate: u32, max_scale: f64) -> Self {
        Self::new(Duration::from_secs(1) / tick_rate.max(1), max_scale)
    }

    pub fn nominal(&self) -> Duration {
        self.nominal
    }

    /// Frame scale for a tick starting at `now`. The first call returns 1.0.
    pub fn scale_at(&mut self, now: Instant) -> f64 {
        let scale = match self.last {
            None => 1.0,
            Some(prev) => {
                let elapsed = now.saturating_duration_since(prev);
                elapsed.as_secs_f64() / self.nominal.as_secs_f64()
            }
        };
        self.last = Some(now);
        scale.clamp(0.0, self.max_scale)
    }
}
