//! Batch rasterizer.
//!
//! Stroke width and opacity both follow depth. Drawing each streak with its
//! own exact style would mean one state change per star, so both are
//! quantized into [`WIDTH_BINS`] × [`ALPHA_BINS`] buckets instead. Every
//! bucket is stroked as one path, bounding state changes at 36 per frame.

use warpfield_shared::constants::{ALPHA_BINS, ALPHA_RANGE, WIDTH_BINS, WIDTH_RANGE};
use warpfield_shared::lerp;

use crate::physics::Segment;
use crate::surface::{BlendMode, RasterSurface, StrokeStyle};
use crate::vignette::VignetteGradient;

const BIN_COUNT: usize = WIDTH_BINS * ALPHA_BINS;

/// Statistics from one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Segments stroked
    pub segments: u32,
    /// Paths stroked (non-empty bins)
    pub paths: u32,
}

impl RasterStats {
    /// Returns true if the frame stayed within the 36-path budget.
    #[must_use]
    pub const fn paths_ok(&self) -> bool {
        self.paths as usize <= BIN_COUNT
    }
}

/// Stroke width for a star at depth `z`.
#[inline]
#[must_use]
pub fn depth_width(z: f32) -> f32 {
    lerp(WIDTH_RANGE.0, WIDTH_RANGE.1, 1.0 - z.clamp(0.0, 1.0))
}

/// Stroke opacity for a star at depth `z`.
#[inline]
#[must_use]
pub fn depth_alpha(z: f32) -> f32 {
    lerp(ALPHA_RANGE.0, ALPHA_RANGE.1, 1.0 - z.clamp(0.0, 1.0))
}

/// Uniform linear bin of `value` over `range`, clamped to `[0, bins - 1]`.
#[inline]
#[must_use]
pub fn quantize(value: f32, range: (f32, f32), bins: usize) -> usize {
    let t = (value - range.0) / (range.1 - range.0);
    // NaN casts to 0
    let idx = (t * bins as f32).floor().max(0.0) as usize;
    idx.min(bins - 1)
}

/// Center value of bin `idx` over `range`.
#[inline]
#[must_use]
pub fn bin_center(idx: usize, range: (f32, f32), bins: usize) -> f32 {
    lerp(range.0, range.1, (idx as f32 + 0.5) / bins as f32)
}

/// Groups segments by style and flushes one path per group.
#[derive(Debug, Clone)]
pub struct BatchRasterizer {
    /// `[x0, y0, x1, y1]` per segment, indexed `width_bin * ALPHA_BINS + alpha_bin`
    bins: Vec<Vec<f32>>,
}

impl BatchRasterizer {
    /// Creates an empty rasterizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bins: vec![Vec::new(); BIN_COUNT],
        }
    }

    /// Drops any queued segments, keeping buffer capacity.
    pub fn begin(&mut self) {
        for bin in &mut self.bins {
            bin.clear();
        }
    }

    /// Queues a segment into its style bin.
    #[inline]
    pub fn push(&mut self, segment: &Segment) {
        let wi = quantize(depth_width(segment.z), WIDTH_RANGE, WIDTH_BINS);
        let ai = quantize(depth_alpha(segment.z), ALPHA_RANGE, ALPHA_BINS);
        self.bins[wi * ALPHA_BINS + ai].extend_from_slice(&[
            segment.tail.x,
            segment.tail.y,
            segment.head.x,
            segment.head.y,
        ]);
    }

    /// Segments currently queued in each bin.
    #[must_use]
    pub fn bin_counts(&self) -> [usize; BIN_COUNT] {
        let mut counts = [0; BIN_COUNT];
        for (count, bin) in counts.iter_mut().zip(&self.bins) {
            *count = bin.len() / 4;
        }
        counts
    }

    /// Total segments queued.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.bins.iter().map(|b| b.len() / 4).sum()
    }

    /// Clears the surface, strokes each non-empty bin as one path, then
    /// masks the frame with `vignette`.
    pub fn flush<S: RasterSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        vignette: &VignetteGradient,
    ) -> RasterStats {
        let mut stats = RasterStats::default();
        surface.clear();

        for (idx, coords) in self.bins.iter().enumerate() {
            if coords.is_empty() {
                continue;
            }
            let style = StrokeStyle {
                width: bin_center(idx / ALPHA_BINS, WIDTH_RANGE, WIDTH_BINS),
                alpha: bin_center(idx % ALPHA_BINS, ALPHA_RANGE, ALPHA_BINS),
            };
            surface.stroke_segments(style, coords);
            stats.paths += 1;
            stats.segments += (coords.len() / 4) as u32;
        }

        surface.composite_gradient(vignette, BlendMode::DestinationIn);
        stats
    }
}

impl Default for BatchRasterizer {
    fn default() -> Self {
        Self::new()
    }
}
