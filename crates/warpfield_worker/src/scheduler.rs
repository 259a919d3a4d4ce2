//! # Tick Scheduling
//!
//! The worker has no display clock to hang off, so it re-arms its own
//! deadline after every tick. How that deadline is chosen is a [`Cadence`]:
//!
//! - [`FixedInterval`]: next tick one interval after this one *finished*.
//!   Work time stretches the period; ticks never pile up.
//! - [`FixedRate`]: next tick one interval after this one *started*, like a
//!   display clock. A late tick is followed immediately by the next one,
//!   but missed ticks are skipped rather than replayed.
//!
//! The session never sees the cadence; it only receives timestamps.

use std::time::{Duration, Instant};

use warpfield_shared::constants::DEFAULT_TICK_INTERVAL_MS;

/// Policy for choosing the next tick deadline.
pub trait Cadence {
    /// Deadline of the tick after one that ran from `started` to `finished`.
    fn next_deadline(&mut self, started: Instant, finished: Instant) -> Instant;

    /// Nominal period.
    fn interval(&self) -> Duration;
}

/// Self-chaining timer: re-arms relative to tick completion.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    /// Creates a cadence with the given gap between ticks.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedInterval {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TICK_INTERVAL_MS))
    }
}

impl Cadence for FixedInterval {
    fn next_deadline(&mut self, _started: Instant, finished: Instant) -> Instant {
        finished + self.interval
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Display-like clock: ticks aligned to their start times.
#[derive(Debug, Clone, Copy)]
pub struct FixedRate {
    interval: Duration,
    late_ticks: u64,
}

impl FixedRate {
    /// Creates a cadence at the given period.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            late_ticks: 0,
        }
    }

    /// Creates a cadence at `hz` ticks per second.
    #[must_use]
    pub fn hz(hz: u32) -> Self {
        Self::new(Duration::from_micros(1_000_000 / u64::from(hz.max(1))))
    }

    /// Ticks that overran their period.
    #[must_use]
    pub const fn late_ticks(&self) -> u64 {
        self.late_ticks
    }
}

impl Default for FixedRate {
    fn default() -> Self {
        Self::hz(60)
    }
}

impl Cadence for FixedRate {
    fn next_deadline(&mut self, started: Instant, finished: Instant) -> Instant {
        let aligned = started + self.interval;
        if aligned < finished {
            self.late_ticks += 1;
            finished
        } else {
            aligned
        }
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Millisecond timestamps relative to worker start.
#[derive(Debug, Clone, Copy)]
pub struct WorkerClock {
    epoch: Instant,
}

impl WorkerClock {
    /// Starts the clock at zero.
    #[must_use]
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Milliseconds from the epoch to `instant` (0 if it predates the epoch).
    #[must_use]
    pub fn millis_at(&self, instant: Instant) -> f64 {
        instant.saturating_duration_since(self.epoch).as_secs_f64() * 1000.0
    }

    /// Milliseconds since the epoch.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.millis_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_interval_chains_from_finish() {
        let mut cadence = FixedInterval::default();
        assert_eq!(cadence.interval(), Duration::from_millis(16));

        let start = Instant::now();
        let finish = start + Duration::from_millis(5);
        assert_eq!(cadence.next_deadline(start, finish), finish + Duration::from_millis(16));
    }

    #[test]
    fn test_fixed_rate_aligns_to_start() {
        let mut cadence = FixedRate::new(Duration::from_millis(10));
        let start = Instant::now();

        let on_time = cadence.next_deadline(start, start + Duration::from_millis(3));
        assert_eq!(on_time, start + Duration::from_millis(10));
        assert_eq!(cadence.late_ticks(), 0);

        let late_finish = start + Duration::from_millis(25);
        assert_eq!(cadence.next_deadline(start, late_finish), late_finish);
        assert_eq!(cadence.late_ticks(), 1);
    }

    #[test]
    fn test_fixed_rate_hz() {
        assert_eq!(FixedRate::hz(60).interval(), Duration::from_micros(16_666));
        assert_eq!(FixedRate::hz(0).interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_clock_is_monotonic_from_zero() {
        let clock = WorkerClock::start();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0.0 && b >= a);
        assert_eq!(clock.millis_at(clock.epoch), 0.0);
    }
}
