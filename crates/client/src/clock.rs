//! Fixed-rate monotonic clock.

/// Steps time forward by exactly one tick per `advance`.
///
/// Milliseconds are derived from the tick count so rounding never drifts.
#[derive(Debug, Clone)]
pub struct FixedClock {
    tick_rate: u32,
    ticks: u64,
}

impl FixedClock {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            tick_rate: tick_rate.max(1),
            ticks: 0,
        }
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    pub fn now_ms(&self) -> u64 {
        self.ticks * 1000 / u64::from(self.tick_rate)
    }
}
