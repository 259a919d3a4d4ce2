//! Radial vignette gradient.
//!
//! Composited over the frame with destination-in, so it acts as an opacity
//! mask: transparent around the vanishing point, fully opaque through the
//! body of the field, easing off toward the farthest corner.

use warpfield_shared::{lerp, Config, Vec2};

use crate::geometry::Geometry;

/// One stop of the gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the radius, `[0, 1]`
    pub offset: f32,
    /// Opacity at this stop, `[0, 1]`
    pub alpha: f32,
}

/// A cached radial gradient. Rebuilt on resize and config updates only.
#[derive(Debug, Clone, PartialEq)]
pub struct VignetteGradient {
    /// Gradient origin in device pixels
    pub center: Vec2,
    /// Outer radius in device pixels
    pub radius: f32,
    /// Stops with non-decreasing offsets
    pub stops: [ColorStop; 5],
}

impl VignetteGradient {
    /// Builds the gradient for the current geometry and config.
    #[must_use]
    pub fn new(geometry: &Geometry, config: &Config) -> Self {
        let center_zero = config.center_zero;
        let center_full = config.center_full;
        let raw = [
            (0.0, 0.0),
            (center_zero, 0.0),
            (center_full, 1.0),
            ((center_full + 1.0) * 0.5, config.opacity_mid),
            (1.0, config.opacity_outer),
        ];

        let mut stops = [ColorStop {
            offset: 0.0,
            alpha: 0.0,
        }; 5];
        let mut floor = 0.0_f32;
        for (stop, (offset, alpha)) in stops.iter_mut().zip(raw) {
            let offset = sanitize(offset).max(floor);
            floor = offset;
            *stop = ColorStop {
                offset,
                alpha: sanitize(alpha),
            };
        }

        Self {
            center: geometry.center(),
            radius: geometry.max_corner_distance(),
            stops,
        }
    }

    /// Opacity at point `p`, interpolated linearly between stops.
    #[must_use]
    pub fn alpha_at(&self, p: Vec2) -> f32 {
        let t = if self.radius > 0.0 {
            (p.distance(self.center) / self.radius).clamp(0.0, 1.0)
        } else {
            1.0
        };

        if t <= self.stops[0].offset {
            return self.stops[0].alpha;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON {
                    return b.alpha;
                }
                return lerp(a.alpha, b.alpha, (t - a.offset) / span);
            }
        }
        self.stops[4].alpha
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
