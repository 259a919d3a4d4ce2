//! A surface that records calls instead of drawing.

use super::{BlendMode, RasterSurface, StrokeStyle};
use crate::vignette::VignetteGradient;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// `resize(width, height)`
    Resize {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },
    /// `clear()`
    Clear,
    /// `stroke_segments(style, coords)`
    Stroke {
        /// Style the path was stroked with
        style: StrokeStyle,
        /// Segments in the path
        segments: usize,
    },
    /// `composite_gradient(gradient, mode)`
    Composite {
        /// Blend mode used
        mode: BlendMode,
    },
}

/// Records every call for inspection. Used by tests and benchmarks.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Creates a recorder reporting `width × height`.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drains the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of stroked paths recorded.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Stroke { .. }))
            .count()
    }

    /// Total segments across all stroked paths.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.calls
            .iter()
            .map(|c| match c {
                DrawCall::Stroke { segments, .. } => *segments,
                _ => 0,
            })
            .sum()
    }
}

impl RasterSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.calls.push(DrawCall::Resize { width, height });
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn stroke_segments(&mut self, style: StrokeStyle, coords: &[f32]) {
        self.calls.push(DrawCall::Stroke {
            style,
            segments: coords.len() / 4,
        });
    }

    fn composite_gradient(&mut self, _gradient: &VignetteGradient, mode: BlendMode) {
        self.calls.push(DrawCall::Composite { mode });
    }
}
