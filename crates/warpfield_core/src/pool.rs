//! The star pool.
//!
//! Sized from geometry × density when a session starts, grown by appending
//! or shrunk by truncation when the geometry changes. Stars below the new
//! length are never touched by a resize.

use rand::Rng;
use warpfield_shared::Config;

use crate::geometry::Geometry;
use crate::star::{spawn, SpawnMode, Star};

/// What a resize did to the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolResize {
    /// Length before the resize
    pub from: usize,
    /// Length after the resize
    pub to: usize,
}

impl PoolResize {
    /// Stars appended by the resize.
    #[must_use]
    pub const fn grown(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// Stars truncated by the resize.
    #[must_use]
    pub const fn truncated(&self) -> usize {
        self.from.saturating_sub(self.to)
    }
}

/// Fixed-size set of stars owned by one session.
#[derive(Debug, Clone, Default)]
pub struct StarPool {
    stars: Vec<Star>,
}

impl StarPool {
    /// Creates a pool sized for `geometry` and `config.density`.
    pub fn populate<R: Rng + ?Sized>(
        rng: &mut R,
        geometry: &Geometry,
        config: &Config,
        mode: SpawnMode,
    ) -> Self {
        let mut pool = Self::default();
        pool.resize_to(geometry.target_pool_size(config.density), rng, geometry, config, mode);
        pool
    }

    /// Grows or truncates to exactly `target` stars.
    ///
    /// Appended stars get a random depth so a freshly grown field is not
    /// depth-synchronized.
    pub fn resize_to<R: Rng + ?Sized>(
        &mut self,
        target: usize,
        rng: &mut R,
        geometry: &Geometry,
        config: &Config,
        mode: SpawnMode,
    ) -> PoolResize {
        let from = self.stars.len();
        if target < from {
            self.stars.truncate(target);
        } else {
            self.stars.reserve(target - from);
            for _ in from..target {
                let z = rng.gen::<f32>();
                self.stars.push(spawn(rng, geometry, config, mode, z));
            }
        }
        PoolResize { from, to: target }
    }

    /// Replaces the star at `index` with a fresh one at depth 1.
    pub fn respawn<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        rng: &mut R,
        geometry: &Geometry,
        config: &Config,
        mode: SpawnMode,
    ) {
        if let Some(slot) = self.stars.get_mut(index) {
            *slot = spawn(rng, geometry, config, mode, 1.0);
        }
    }

    /// Number of stars
    #[must_use]
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// True if the pool holds no stars
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// All stars
    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// All stars, mutably
    pub fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }

    /// Raw bytes of the pool, e.g. for snapshotting.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.stars)
    }
}
