//! Per-tick star integration.
//!
//! One pass over the pool does everything that needs a star's position:
//! integrate, hand the streak segment to the caller, extend the spread
//! statistics, and respawn anything that left the surface.

use rand::Rng;
use warpfield_shared::constants::{
    COVERAGE_EDGE_FRAC, DEPTH_SPEED_BASE, REDUCE_MOTION_DEPTH_SCALE, STREAK_FACTOR,
    Z_DECAY_PER_SEC,
};
use warpfield_shared::{Bounds, Config, Vec2};

use crate::geometry::Geometry;
use crate::pool::StarPool;
use crate::star::SpawnMode;

/// A streak from tail to head, plus the depth used to style it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Trailing end
    pub tail: Vec2,
    /// Leading end (the star's position)
    pub head: Vec2,
    /// Star depth after integration
    pub z: f32,
}

/// Inputs of one step.
#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    /// Elapsed time in seconds, already clamped
    pub dt_sec: f32,
    /// Time dilation (pre-sim boost while holding, else 1)
    pub scale: f32,
    /// Collect [`SpreadStats`] this step
    pub track_spread: bool,
    /// How respawned stars are placed
    pub spawn_mode: SpawnMode,
}

/// How far the field has dispersed. Only collected before reveal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpreadStats {
    /// Bounding box of all star positions
    pub bounds: Bounds,
    /// Stars at or beyond the reveal radius
    pub beyond: usize,
    /// Stars inspected
    pub total: usize,
}

impl SpreadStats {
    /// Fraction of stars beyond the reveal radius, in `[0, 1]`.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.beyond as f32 / self.total as f32).clamp(0.0, 1.0)
    }

    /// True if the bounding box reaches within 4% of the minimum dimension
    /// of every edge.
    #[must_use]
    pub fn touches_all_edges(&self, geometry: &Geometry) -> bool {
        if self.bounds.is_empty() {
            return false;
        }
        let m = COVERAGE_EDGE_FRAC * geometry.min_dim();
        let (w, h) = (geometry.width() as f32, geometry.height() as f32);
        self.bounds.min.x <= m
            && self.bounds.min.y <= m
            && self.bounds.max.x >= w - m
            && self.bounds.max.y >= h - m
    }
}

/// What a step did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// Spread statistics, when tracking was requested
    pub spread: Option<SpreadStats>,
    /// Stars respawned this step
    pub respawned: usize,
}

/// Advances every star by one tick.
///
/// `on_segment` receives each star's streak before any respawn, so it is
/// called exactly once per star.
pub fn step<R, F>(
    pool: &mut StarPool,
    geometry: &Geometry,
    config: &Config,
    params: StepParams,
    rng: &mut R,
    mut on_segment: F,
) -> StepOutcome
where
    R: Rng + ?Sized,
    F: FnMut(Segment),
{
    let mut outcome = StepOutcome::default();
    if geometry.is_empty() {
        return outcome;
    }

    let sdt = params.dt_sec * params.scale;
    let speed = config.speed * geometry.dpr();
    let depth_scale = if config.reduce_motion {
        REDUCE_MOTION_DEPTH_SCALE
    } else {
        1.0
    };
    let streak = STREAK_FACTOR * config.streak;
    let center = geometry.center();
    let reveal_r2 = {
        let r = config.reveal_radius_frac * geometry.min_dim();
        r * r
    };

    let mut spread = SpreadStats::default();

    for index in 0..pool.len() {
        let star = &mut pool.stars_mut()[index];

        let depth_factor = DEPTH_SPEED_BASE + (1.0 - star.z) * depth_scale;
        let d = speed * depth_factor * star.sp * sdt;
        star.pos = star.pos + star.dir * d;
        let tail = star.pos - star.dir * (streak * star.len * d);
        star.z = (star.z - Z_DECAY_PER_SEC * sdt).clamp(0.0, 1.0);

        let (head, z) = (star.pos, star.z);

        if params.track_spread {
            spread.bounds.include(head);
            spread.total += 1;
            if (head - center).length_squared() >= reveal_r2 {
                spread.beyond += 1;
            }
        }

        on_segment(Segment { tail, head, z });

        if geometry.is_out_of_bounds(head) {
            pool.respawn(index, rng, geometry, config, params.spawn_mode);
            outcome.respawned += 1;
        }
    }

    if params.track_spread {
        outcome.spread = Some(spread);
    }
    outcome
}
