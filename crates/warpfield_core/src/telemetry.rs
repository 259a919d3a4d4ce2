//! Frame-rate telemetry.
//!
//! Keeps an exponential moving average of instantaneous FPS and hands out a
//! [`WorkerEvent::Perf`] sample at most once per [`PERF_INTERVAL_MS`].
//! Observational only.

use warpfield_shared::constants::{FPS_EMA_INITIAL, FPS_EMA_KEEP, PERF_INTERVAL_MS};
use warpfield_shared::WorkerEvent;

/// Smoothed FPS plus the report throttle.
#[derive(Debug, Clone, Copy)]
pub struct Telemetry {
    fps_ema: f64,
    last_report: f64,
    samples: u64,
}

impl Telemetry {
    /// Starts the throttle window at `now`.
    #[must_use]
    pub const fn new(now: f64) -> Self {
        Self {
            fps_ema: FPS_EMA_INITIAL,
            last_report: now,
            samples: 0,
        }
    }

    /// Folds one frame of `dt_ms` into the average. Zero-length frames are
    /// skipped.
    pub fn record_frame(&mut self, dt_ms: f64) {
        if dt_ms > 0.0 && dt_ms.is_finite() {
            let instant = 1000.0 / dt_ms;
            self.fps_ema = self.fps_ema * FPS_EMA_KEEP + instant * (1.0 - FPS_EMA_KEEP);
            self.samples += 1;
        }
    }

    /// Returns a sample if at least [`PERF_INTERVAL_MS`] passed since the
    /// last one.
    pub fn poll(&mut self, now: f64) -> Option<WorkerEvent> {
        if now - self.last_report < PERF_INTERVAL_MS {
            return None;
        }
        self.last_report = now;
        Some(WorkerEvent::Perf {
            fps: self.fps_ema,
            at: now,
        })
    }

    /// Current smoothed FPS
    #[must_use]
    pub const fn fps(&self) -> f64 {
        self.fps_ema
    }

    /// Frames folded into the average
    #[must_use]
    pub const fn samples(&self) -> u64 {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_fps() {
        let t = Telemetry::new(0.0);
        assert_eq!(t.fps(), 60.0);
        assert_eq!(t.samples(), 0);
    }

    #[test]
    fn test_ema_converges_monotonically() {
        for (dt, target) in [(40.0, 25.0), (10.0, 100.0)] {
            let mut t = Telemetry::new(0.0);
            let mut prev_err = (t.fps() - target).abs();
            for _ in 0..100 {
                t.record_frame(dt);
                let err = (t.fps() - target).abs();
                assert!(err <= prev_err);
                prev_err = err;
            }
            assert!(prev_err < 0.01, "fps {} did not reach {}", t.fps(), target);
        }
    }

    #[test]
    fn test_zero_dt_skipped() {
        let mut t = Telemetry::new(0.0);
        t.record_frame(0.0);
        t.record_frame(f64::NAN);
        assert_eq!(t.fps(), 60.0);
        assert_eq!(t.samples(), 0);
    }

    #[test]
    fn test_poll_throttles() {
        let mut t = Telemetry::new(1000.0);
        assert!(t.poll(1499.0).is_none());
        let sample = t.poll(1500.0).unwrap();
        assert_eq!(sample, WorkerEvent::Perf { fps: 60.0, at: 1500.0 });
        assert!(t.poll(1600.0).is_none());
        assert!(t.poll(2000.0).is_some());
    }
}
