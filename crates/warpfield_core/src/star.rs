//! Star entities and how they are spawned.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use rand::Rng;
use warpfield_shared::constants::{SPAWN_MAX_RADIUS_FRAC, SPAWN_RADIUS_EXPONENT};
use warpfield_shared::{Config, Vec2};

use crate::geometry::Geometry;

/// A single star.
///
/// `dir` is unit length and points away from the center the star was spawned
/// around. It is fixed for the star's lifetime.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Star {
    /// Position in device pixels
    pub pos: Vec2,
    /// Inverse depth: 1 = just spawned, 0 = at the viewer
    pub z: f32,
    /// Unit direction of travel
    pub dir: Vec2,
    /// Speed multiplier
    pub sp: f32,
    /// Streak length multiplier
    pub len: f32,
    /// Reserved jitter seed
    pub phase: f32,
}

impl Star {
    /// Size of a star in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Where a spawned star may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    /// Field not revealed yet: keep stars out of the vignette's dead center.
    Hidden,
    /// Field revealed: stars may appear anywhere inside the spawn disc.
    Visible,
}

impl SpawnMode {
    /// Mode matching the reveal state.
    #[must_use]
    pub const fn for_visibility(visible: bool) -> Self {
        if visible {
            Self::Visible
        } else {
            Self::Hidden
        }
    }
}

/// Spawns a star at depth `z`.
///
/// The radius follows `u^0.55` between the mode's inner fraction and half the
/// minimum dimension, so new stars bunch up toward the outside of the disc.
pub fn spawn<R: Rng + ?Sized>(
    rng: &mut R,
    geometry: &Geometry,
    config: &Config,
    mode: SpawnMode,
    z: f32,
) -> Star {
    let min_frac = match mode {
        SpawnMode::Hidden => config.hidden_spawn_min_frac().clamp(0.0, SPAWN_MAX_RADIUS_FRAC),
        SpawnMode::Visible => 0.0,
    };

    let angle = rng.gen::<f32>() * TAU;
    let u = rng.gen::<f32>();
    let frac = min_frac + (SPAWN_MAX_RADIUS_FRAC - min_frac) * u.powf(SPAWN_RADIUS_EXPONENT);

    let dir = Vec2::from_angle(angle);
    Star {
        pos: geometry.center() + dir * (frac * geometry.min_dim()),
        z,
        dir,
        sp: rng.gen_range(0.6..1.4),
        len: rng.gen_range(0.7..1.3),
        phase: rng.gen::<f32>() * TAU,
    }
}
