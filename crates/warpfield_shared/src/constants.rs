//! # Engine Constants
//!
//! Tuning values baked into the tick. Changing any of these changes how the
//! field looks, so they are not exposed through [`Config`](crate::Config).

// =============================================================================
// POOL
// =============================================================================

/// Smallest pool the engine will ever run with, regardless of density.
pub const MIN_STARS: usize = 60;

/// Largest pool the engine will allocate, whatever the density or surface.
pub const MAX_STARS: usize = 100_000;

/// Highest accepted density (stars per megapixel).
pub const MAX_DENSITY: f32 = 10_000.0;

// =============================================================================
// TIMING
// =============================================================================

/// Largest `dt` a single tick may integrate (milliseconds).
pub const MAX_DT_MS: f64 = 50.0;

/// Minimum spacing between two `Perf` events (milliseconds).
pub const PERF_INTERVAL_MS: f64 = 500.0;

/// Smoothing factor kept from the previous FPS estimate.
pub const FPS_EMA_KEEP: f64 = 0.9;

/// FPS estimate a fresh session starts from.
pub const FPS_EMA_INITIAL: f64 = 60.0;

/// Default self-chaining tick interval (milliseconds).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;

// =============================================================================
// PHYSICS
// =============================================================================

/// Base term of the depth speed factor (`0.4 + (1 - z)`).
pub const DEPTH_SPEED_BASE: f32 = 0.4;

/// Multiplier on the `(1 - z)` term when reduced motion is requested.
pub const REDUCE_MOTION_DEPTH_SCALE: f32 = 0.3;

/// Streak length per unit of displacement.
pub const STREAK_FACTOR: f32 = 2.5;

/// Depth decay per second of (scaled) simulation time.
pub const Z_DECAY_PER_SEC: f32 = 0.25;

/// Out-of-bounds margin in CSS pixels (multiplied by the device-pixel ratio).
pub const RESPAWN_MARGIN_CSS: f32 = 40.0;

/// Largest spawn radius as a fraction of the minimum dimension.
pub const SPAWN_MAX_RADIUS_FRAC: f32 = 0.5;

/// Exponent of the spawn radius power curve (< 1 skews toward larger radii).
pub const SPAWN_RADIUS_EXPONENT: f32 = 0.55;

// =============================================================================
// RASTERIZER
// =============================================================================

/// Number of stroke width bins.
pub const WIDTH_BINS: usize = 6;

/// Number of stroke alpha bins.
pub const ALPHA_BINS: usize = 6;

/// Stroke width range quantized by the width bins (device pixels).
pub const WIDTH_RANGE: (f32, f32) = (0.6, 2.2);

/// Stroke alpha range quantized by the alpha bins.
pub const ALPHA_RANGE: (f32, f32) = (0.25, 0.85);

// =============================================================================
// REVEAL
// =============================================================================

/// Edge tolerance for coverage, as a fraction of the minimum dimension.
pub const COVERAGE_EDGE_FRAC: f32 = 0.04;
