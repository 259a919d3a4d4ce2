//! # Starfield Configuration
//!
//! [`Config`] is the full snapshot a session ticks with. Hosts either send a
//! complete config with `init`, or a [`ConfigPatch`] that is overlaid field by
//! field with [`Config::apply_partial`].
//!
//! Config files are TOML with the same camelCase keys as the wire format:
//!
//! ```toml
//! density = 180.0
//! speed = 260.0
//! holdUntilAnchor = true
//! startDelayMs = 400.0
//! ```
//!
//! Missing keys fall back to [`Config::default`].

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::MAX_DENSITY;
use crate::error::{WarpfieldError, WarpfieldResult};

/// Complete starfield configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Stars per megapixel of device surface.
    pub density: f32,
    /// Base speed in CSS pixels per second.
    pub speed: f32,
    /// Tail length factor.
    pub streak: f32,
    /// Vignette radius fraction where opacity is still zero.
    pub center_zero: f32,
    /// Vignette radius fraction where opacity reaches one.
    pub center_full: f32,
    /// Vignette opacity between `center_full` and the edge.
    pub opacity_mid: f32,
    /// Vignette opacity at the farthest corner.
    pub opacity_outer: f32,
    /// Hold drawing until the host reports the anchor is ready.
    pub hold_until_anchor: bool,
    /// Minimum time between readiness and reveal (milliseconds).
    pub start_delay_ms: f64,
    /// Reserved. Carried through updates but not read by the tick.
    pub fade_ms: f64,
    /// Time dilation applied to the simulation while holding.
    pub pre_sim_boost: f32,
    /// Fraction of the minimum dimension a star must pass to count as spread.
    pub reveal_radius_frac: f32,
    /// Fraction of stars that must be spread before reveal.
    pub min_reveal_spread_ratio: f32,
    /// Inner spawn radius fraction used while hidden. Defaults to `center_zero`.
    pub hidden_spawn_min_radius_frac: Option<f32>,
    /// Damp depth acceleration for users who prefer reduced motion.
    pub reduce_motion: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            density: 140.0,
            speed: 220.0,
            streak: 1.0,
            center_zero: 0.06,
            center_full: 0.32,
            opacity_mid: 0.9,
            opacity_outer: 0.55,
            hold_until_anchor: false,
            start_delay_ms: 300.0,
            fade_ms: 600.0,
            pre_sim_boost: 3.0,
            reveal_radius_frac: 0.35,
            min_reveal_spread_ratio: 0.35,
            hidden_spawn_min_radius_frac: None,
            reduce_motion: false,
        }
    }
}

impl Config {
    /// Parses a TOML document over the defaults and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`WarpfieldError::Toml`] for malformed input and
    /// [`WarpfieldError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> WarpfieldResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`WarpfieldError::Io`] if the file cannot be read, otherwise
    /// the errors of [`Config::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> WarpfieldResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Rejects negative or non-finite numeric fields, and densities above
    /// [`MAX_DENSITY`].
    ///
    /// # Errors
    ///
    /// Returns the first offending field as [`WarpfieldError::InvalidConfig`].
    pub fn validate(&self) -> WarpfieldResult<()> {
        let fields: [(&'static str, f64); 13] = [
            ("density", f64::from(self.density)),
            ("speed", f64::from(self.speed)),
            ("streak", f64::from(self.streak)),
            ("centerZero", f64::from(self.center_zero)),
            ("centerFull", f64::from(self.center_full)),
            ("opacityMid", f64::from(self.opacity_mid)),
            ("opacityOuter", f64::from(self.opacity_outer)),
            ("startDelayMs", self.start_delay_ms),
            ("fadeMs", self.fade_ms),
            ("preSimBoost", f64::from(self.pre_sim_boost)),
            ("revealRadiusFrac", f64::from(self.reveal_radius_frac)),
            ("minRevealSpreadRatio", f64::from(self.min_reveal_spread_ratio)),
            (
                "hiddenSpawnMinRadiusFrac",
                f64::from(self.hidden_spawn_min_radius_frac.unwrap_or(0.0)),
            ),
        ];

        if let Some(&(field, value)) = fields.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(WarpfieldError::InvalidConfig { field, value });
        }
        if self.density > MAX_DENSITY {
            return Err(WarpfieldError::InvalidConfig {
                field: "density",
                value: f64::from(self.density),
            });
        }
        Ok(())
    }

    /// Replaces every field [`Config::validate`] would reject with its
    /// default, and caps `density` at [`MAX_DENSITY`].
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        macro_rules! repair {
            ($($field:ident),* $(,)?) => {
                $(if !self.$field.is_finite() || self.$field < 0.0 {
                    self.$field = defaults.$field;
                })*
            };
        }

        repair!(
            density,
            speed,
            streak,
            center_zero,
            center_full,
            opacity_mid,
            opacity_outer,
            start_delay_ms,
            fade_ms,
            pre_sim_boost,
            reveal_radius_frac,
            min_reveal_spread_ratio,
        );

        self.density = self.density.min(MAX_DENSITY);
        if self
            .hidden_spawn_min_radius_frac
            .is_some_and(|v| !v.is_finite() || v < 0.0)
        {
            self.hidden_spawn_min_radius_frac = None;
        }
        self
    }

    /// Overlays every field present in `patch`.
    pub fn apply_partial(&mut self, patch: &ConfigPatch) {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = patch.$field { self.$field = v; })*
            };
        }

        overlay!(
            density,
            speed,
            streak,
            center_zero,
            center_full,
            opacity_mid,
            opacity_outer,
            hold_until_anchor,
            start_delay_ms,
            fade_ms,
            pre_sim_boost,
            reveal_radius_frac,
            min_reveal_spread_ratio,
            reduce_motion,
        );

        if let Some(v) = patch.hidden_spawn_min_radius_frac {
            self.hidden_spawn_min_radius_frac = v;
        }
    }

    /// Inner spawn radius fraction for stars spawned while hidden.
    #[must_use]
    pub fn hidden_spawn_min_frac(&self) -> f32 {
        self.hidden_spawn_min_radius_frac.unwrap_or(self.center_zero)
    }
}

/// A partial [`Config`]; `None` fields leave the live value untouched.
///
/// `hidden_spawn_min_radius_frac` has three states: absent (untouched),
/// `null` (cleared back to the `center_zero` fallback) and a number.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ConfigPatch {
    pub density: Option<f32>,
    pub speed: Option<f32>,
    pub streak: Option<f32>,
    pub center_zero: Option<f32>,
    pub center_full: Option<f32>,
    pub opacity_mid: Option<f32>,
    pub opacity_outer: Option<f32>,
    pub hold_until_anchor: Option<bool>,
    pub start_delay_ms: Option<f64>,
    pub fade_ms: Option<f64>,
    pub pre_sim_boost: Option<f32>,
    pub reveal_radius_frac: Option<f32>,
    pub min_reveal_spread_ratio: Option<f32>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub hidden_spawn_min_radius_frac: Option<Option<f32>>,
    pub reduce_motion: Option<bool>,
}

/// Maps a key that is present (even as `null`) to `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ConfigPatch {
    /// True if the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
