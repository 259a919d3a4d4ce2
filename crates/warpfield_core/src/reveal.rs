//! Reveal gate.
//!
//! Decides when the field is exposed. The gate stays [`RevealState::Hidden`]
//! until the host has signalled readiness, the start delay has elapsed since
//! that signal, the field touches every edge, and enough stars have spread
//! past the reveal radius. It then latches [`RevealState::Visible`] for the
//! rest of the session.

use warpfield_shared::Config;

use crate::geometry::Geometry;
use crate::physics::SpreadStats;

/// Gate state. `Visible` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    /// Simulation runs, nothing is drawn
    #[default]
    Hidden,
    /// Latched; drawing enabled
    Visible,
}

/// Readiness latch plus the hidden/visible state machine.
#[derive(Debug, Clone, Default)]
pub struct RevealGate {
    is_ready: bool,
    ready_at: Option<f64>,
    visible_at: Option<f64>,
}

impl RevealGate {
    /// Creates a gate for a fresh session.
    ///
    /// The host is considered ready immediately unless the config asks to
    /// hold until an anchor reports in.
    #[must_use]
    pub fn new(config: &Config, now: f64) -> Self {
        let mut gate = Self::default();
        if !config.hold_until_anchor {
            gate.set_ready(true, now);
        }
        gate
    }

    /// Applies a host readiness signal.
    ///
    /// The first `true` stamps `ready_at`; later signals never move it.
    /// `false` clears readiness only.
    pub fn set_ready(&mut self, ready: bool, now: f64) {
        self.is_ready = ready;
        if ready && self.ready_at.is_none() {
            self.ready_at = Some(now);
        }
    }

    /// Host readiness
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.is_ready
    }

    /// First instant the host reported ready
    #[must_use]
    pub const fn ready_at(&self) -> Option<f64> {
        self.ready_at
    }

    /// Instant the gate latched, if it has
    #[must_use]
    pub const fn visible_at(&self) -> Option<f64> {
        self.visible_at
    }

    /// True once latched
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible_at.is_some()
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> RevealState {
        if self.is_visible() {
            RevealState::Visible
        } else {
            RevealState::Hidden
        }
    }

    /// True while nothing should be drawn.
    #[must_use]
    pub const fn should_hold(&self, config: &Config) -> bool {
        (config.hold_until_anchor && !self.is_ready) || !self.is_visible()
    }

    /// Spread statistics are only worth collecting before the latch.
    #[must_use]
    pub const fn tracks_spread(&self) -> bool {
        !self.is_visible()
    }

    /// Evaluates the transition for this tick.
    ///
    /// Returns the latch timestamp exactly once, on the tick the gate flips.
    pub fn evaluate(
        &mut self,
        spread: &SpreadStats,
        geometry: &Geometry,
        config: &Config,
        now: f64,
    ) -> Option<f64> {
        if self.is_visible() || !self.is_ready {
            return None;
        }
        let ready_at = self.ready_at?;

        let elapsed = now - ready_at;
        let coverage_ok = spread.touches_all_edges(geometry);
        let spread_ok = spread.ratio() >= config.min_reveal_spread_ratio;

        if coverage_ok && spread_ok && elapsed >= config.start_delay_ms {
            self.visible_at = Some(now);
            Some(now)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warpfield_shared::{Bounds, Vec2};

    fn full_spread() -> SpreadStats {
        SpreadStats {
            bounds: Bounds {
                min: Vec2::new(0.0, 0.0),
                max: Vec2::new(1000.0, 1000.0),
            },
            beyond: 10,
            total: 10,
        }
    }

    #[test]
    fn test_ready_from_config() {
        let gate = RevealGate::new(&Config::default(), 5.0);
        assert!(gate.is_ready());
        assert_eq!(gate.ready_at(), Some(5.0));

        let held = Config {
            hold_until_anchor: true,
            ..Config::default()
        };
        let gate = RevealGate::new(&held, 5.0);
        assert!(!gate.is_ready());
        assert_eq!(gate.ready_at(), None);
    }

    #[test]
    fn test_ready_at_stamped_once() {
        let config = Config {
            hold_until_anchor: true,
            ..Config::default()
        };
        let mut gate = RevealGate::new(&config, 0.0);
        gate.set_ready(true, 100.0);
        gate.set_ready(false, 150.0);
        assert!(!gate.is_ready());
        gate.set_ready(true, 200.0);
        assert_eq!(gate.ready_at(), Some(100.0));
    }

    #[test]
    fn test_not_ready_never_reveals() {
        let config = Config {
            hold_until_anchor: true,
            start_delay_ms: 0.0,
            ..Config::default()
        };
        let geometry = Geometry::from_surface(1000, 1000);
        let mut gate = RevealGate::new(&config, 0.0);
        assert_eq!(gate.evaluate(&full_spread(), &geometry, &config, 10_000.0), None);
        assert!(gate.should_hold(&config));
    }

    #[test]
    fn test_fires_at_delay_not_before() {
        let config = Config {
            start_delay_ms: 300.0,
            ..Config::default()
        };
        let geometry = Geometry::from_surface(1000, 1000);
        let mut gate = RevealGate::new(&config, 1000.0);

        assert_eq!(gate.evaluate(&full_spread(), &geometry, &config, 1299.0), None);
        assert_eq!(gate.state(), RevealState::Hidden);
        assert_eq!(gate.evaluate(&full_spread(), &geometry, &config, 1300.0), Some(1300.0));
        assert_eq!(gate.state(), RevealState::Visible);
        assert!(!gate.should_hold(&config));
        assert!(!gate.tracks_spread());
    }

    #[test]
    fn test_latch_is_terminal() {
        let config = Config {
            start_delay_ms: 0.0,
            ..Config::default()
        };
        let geometry = Geometry::from_surface(1000, 1000);
        let mut gate = RevealGate::new(&config, 0.0);
        assert!(gate.evaluate(&full_spread(), &geometry, &config, 1.0).is_some());

        // Later ticks never fire again, whatever the stats say.
        assert_eq!(gate.evaluate(&SpreadStats::default(), &geometry, &config, 2.0), None);
        assert_eq!(gate.evaluate(&full_spread(), &geometry, &config, 3.0), None);
        gate.set_ready(false, 4.0);
        assert!(gate.is_visible());
        assert_eq!(gate.visible_at(), Some(1.0));
    }

    #[test]
    fn test_insufficient_spread_blocks() {
        let config = Config {
            start_delay_ms: 0.0,
            min_reveal_spread_ratio: 0.5,
            ..Config::default()
        };
        let geometry = Geometry::from_surface(1000, 1000);
        let mut gate = RevealGate::new(&config, 0.0);
        let sparse = SpreadStats {
            beyond: 4,
            ..full_spread()
        };
        assert_eq!(gate.evaluate(&sparse, &geometry, &config, 10.0), None);

        let narrow = SpreadStats {
            bounds: Bounds {
                min: Vec2::new(100.0, 0.0),
                max: Vec2::new(1000.0, 1000.0),
            },
            ..full_spread()
        };
        assert_eq!(gate.evaluate(&narrow, &geometry, &config, 10.0), None);
    }
}
