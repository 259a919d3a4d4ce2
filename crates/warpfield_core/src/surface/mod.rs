//! Raster surfaces.
//!
//! The engine only ever talks to a surface through [`RasterSurface`]: clear,
//! stroke a batch of segments as one path, composite a gradient. Anything
//! that can do those three things (a browser canvas behind FFI, a GPU
//! target, the software [`PixelSurface`], the test [`RecordingSurface`]) can
//! host a session.

mod pixel;
mod recording;

pub use pixel::PixelSurface;
pub use recording::{DrawCall, RecordingSurface};

use crate::vignette::VignetteGradient;

/// Stroke state shared by every segment in one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Line width in device pixels
    pub width: f32,
    /// Stroke opacity, `[0, 1]`
    pub alpha: f32,
}

/// How a composited layer combines with what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Paint over the destination
    SourceOver,
    /// Keep the destination only where the source is opaque
    DestinationIn,
}

/// A 2-D drawing target owned by one session.
pub trait RasterSurface {
    /// Current size in device pixels.
    fn size(&self) -> (u32, u32);

    /// Resizes the backing store. Contents are unspecified afterwards.
    fn resize(&mut self, width: u32, height: u32);

    /// Clears to fully transparent.
    fn clear(&mut self);

    /// Strokes every segment in `coords` as a single path.
    ///
    /// `coords` holds `[x0, y0, x1, y1]` per segment.
    fn stroke_segments(&mut self, style: StrokeStyle, coords: &[f32]);

    /// Fills the whole surface with `gradient` using `mode`.
    fn composite_gradient(&mut self, gradient: &VignetteGradient, mode: BlendMode);
}

impl<T: RasterSurface + ?Sized> RasterSurface for Box<T> {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn stroke_segments(&mut self, style: StrokeStyle, coords: &[f32]) {
        (**self).stroke_segments(style, coords);
    }

    fn composite_gradient(&mut self, gradient: &VignetteGradient, mode: BlendMode) {
        (**self).composite_gradient(gradient, mode);
    }
}
