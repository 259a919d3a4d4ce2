//! Session geometry in device pixels.
//!
//! Width, height, device-pixel ratio and center are derived together from a
//! host [`ResizeRequest`]. None of them is meaningful on its own, so there is
//! no way to change one without rebuilding the whole value.

use warpfield_shared::constants::{MAX_STARS, MIN_STARS, RESPAWN_MARGIN_CSS};
use warpfield_shared::{ResizeRequest, Vec2};

/// Device-pixel geometry of the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    width: u32,
    height: u32,
    dpr: f32,
    center: Vec2,
}

impl Geometry {
    /// Geometry of a surface of `width × height` device pixels at ratio 1,
    /// centered.
    #[must_use]
    pub fn from_surface(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            dpr: 1.0,
            center: Vec2::new(width as f32 * 0.5, height as f32 * 0.5),
        }
    }

    /// Converts a host request to device pixels.
    ///
    /// Returns `None` when the request would produce a zero-sized surface.
    /// A non-finite or non-positive ratio is treated as 1, and a non-finite
    /// center falls back to the middle of the surface.
    #[must_use]
    pub fn from_resize(req: &ResizeRequest) -> Option<Self> {
        let dpr = if req.dpr.is_finite() && req.dpr > 0.0 {
            req.dpr
        } else {
            1.0
        };

        let width = to_device(req.width_css, dpr)?;
        let height = to_device(req.height_css, dpr)?;

        let center = Vec2::new(req.center_x_css * dpr, req.center_y_css * dpr);
        let center = if center.x.is_finite() && center.y.is_finite() {
            center
        } else {
            Vec2::new(width as f32 * 0.5, height as f32 * 0.5)
        };

        Some(Self {
            width,
            height,
            dpr,
            center,
        })
    }

    /// Width in device pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in device pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Device-pixel ratio
    #[must_use]
    pub const fn dpr(&self) -> f32 {
        self.dpr
    }

    /// Vanishing point in device pixels
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// True if either dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Surface area in megapixels.
    #[must_use]
    pub fn megapixels(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height) / 1_000_000.0
    }

    /// Smaller of width and height.
    #[must_use]
    pub fn min_dim(&self) -> f32 {
        self.width.min(self.height) as f32
    }

    /// Distance a star may travel past an edge before it is respawned.
    #[must_use]
    pub fn margin(&self) -> f32 {
        RESPAWN_MARGIN_CSS * self.dpr
    }

    /// Pool size for `density` stars per megapixel, within
    /// [`MIN_STARS`]..=[`MAX_STARS`].
    #[must_use]
    pub fn target_pool_size(&self, density: f32) -> usize {
        // Float-to-int casts saturate: NaN or negative lands on 0, inf on usize::MAX.
        let wanted = (self.megapixels() * f64::from(density)).floor() as usize;
        wanted.clamp(MIN_STARS, MAX_STARS)
    }

    /// True if `p` lies more than [`Geometry::margin`] outside the surface.
    #[must_use]
    pub fn is_out_of_bounds(&self, p: Vec2) -> bool {
        let m = self.margin();
        p.x < -m || p.y < -m || p.x > self.width as f32 + m || p.y > self.height as f32 + m
    }

    /// Distance from the center to the farthest corner.
    #[must_use]
    pub fn max_corner_distance(&self) -> f32 {
        let (w, h) = (self.width as f32, self.height as f32);
        [
            Vec2::ZERO,
            Vec2::new(w, 0.0),
            Vec2::new(0.0, h),
            Vec2::new(w, h),
        ]
        .into_iter()
        .map(|corner| corner.distance(self.center))
        .fold(0.0, f32::max)
    }
}

fn to_device(css: f32, dpr: f32) -> Option<u32> {
    if !css.is_finite() || css <= 0.0 {
        return None;
    }
    let px = (css * dpr).round();
    (px >= 1.0).then_some(px as u32)
}
