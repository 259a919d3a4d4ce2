//! Software RGBA8 surface.
//!
//! Pixels are premultiplied white-on-transparent. Lines are rasterized by
//! distance-to-segment coverage inside each segment's padded bounding box,
//! which is plenty for short streaks.

use warpfield_shared::Vec2;

use super::{BlendMode, RasterSurface, StrokeStyle};
use crate::vignette::VignetteGradient;

/// CPU-side raster target.
#[derive(Debug, Clone, Default)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelSurface {
    /// Creates a transparent surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width as usize * height as usize],
        }
    }

    /// Premultiplied RGBA at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Number of pixels with any opacity.
    #[must_use]
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0).count()
    }

    /// Raw premultiplied RGBA bytes, row-major.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn blend_over(&mut self, x: usize, y: usize, alpha: f32) {
        let idx = y * self.width as usize + x;
        if let Some(px) = self.pixels.get_mut(idx) {
            let keep = 1.0 - alpha;
            let src = alpha * 255.0;
            for channel in px.iter_mut() {
                *channel = (src + f32::from(*channel) * keep).round().min(255.0) as u8;
            }
        }
    }

    fn stroke_one(&mut self, a: Vec2, b: Vec2, style: StrokeStyle) {
        let half = (style.width * 0.5).max(0.5);
        let pad = half + 1.0;
        let (w, h) = (self.width as f32, self.height as f32);

        let x0 = (a.x.min(b.x) - pad).floor().max(0.0);
        let y0 = (a.y.min(b.y) - pad).floor().max(0.0);
        let x1 = (a.x.max(b.x) + pad).ceil().min(w);
        let y1 = (a.y.max(b.y) + pad).ceil().min(h);
        if !(x0 < x1 && y0 < y1) {
            return;
        }

        let ab = b - a;
        let len2 = ab.length_squared();
        for py in y0 as usize..y1 as usize {
            for px in x0 as usize..x1 as usize {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let t = if len2 > 0.0 {
                    ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let d = p.distance(a + ab * t);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_over(px, py, style.alpha * coverage);
                }
            }
        }
    }
}

impl RasterSurface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, [0; 4]);
    }

    fn clear(&mut self) {
        self.pixels.fill([0; 4]);
    }

    fn stroke_segments(&mut self, style: StrokeStyle, coords: &[f32]) {
        let alpha = style.alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let style = StrokeStyle { alpha, ..style };
        for seg in coords.chunks_exact(4) {
            self.stroke_one(Vec2::new(seg[0], seg[1]), Vec2::new(seg[2], seg[3]), style);
        }
    }

    fn composite_gradient(&mut self, gradient: &VignetteGradient, mode: BlendMode) {
        let width = self.width as usize;
        for (idx, px) in self.pixels.iter_mut().enumerate() {
            let p = Vec2::new((idx % width) as f32 + 0.5, (idx / width) as f32 + 0.5);
            let a = gradient.alpha_at(p);
            match mode {
                BlendMode::DestinationIn => {
                    for channel in px.iter_mut() {
                        *channel = (f32::from(*channel) * a).round() as u8;
                    }
                }
                BlendMode::SourceOver => {
                    let keep = 1.0 - a;
                    for channel in px.iter_mut() {
                        let blended = a * 255.0 + f32::from(*channel) * keep;
                        *channel = blended.round().min(255.0) as u8;
                    }
                }
            }
        }
    }
}
