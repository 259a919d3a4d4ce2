//! Message protocol between the host and the starfield worker.
//!
//! Both directions are internally tagged by a `type` field with camelCase
//! kinds and field names, so the JSON form matches what a page script posts:
//!
//! ```json
//! {"type":"resize","widthCss":1280,"heightCss":720,"dpr":2,"centerXCss":640,"centerYCss":360}
//! ```
//!
//! Timestamps are milliseconds on the worker's clock.

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigPatch};
use crate::error::WarpfieldResult;

/// Surface dimensions as the host observes them (CSS pixels).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeRequest {
    /// Width in CSS pixels
    pub width_css: f32,
    /// Height in CSS pixels
    pub height_css: f32,
    /// Device-pixel ratio
    pub dpr: f32,
    /// Vanishing point X in CSS pixels
    pub center_x_css: f32,
    /// Vanishing point Y in CSS pixels
    pub center_y_css: f32,
}

impl ResizeRequest {
    /// A request centered on the surface.
    #[must_use]
    pub fn centered(width_css: f32, height_css: f32, dpr: f32) -> Self {
        Self {
            width_css,
            height_css,
            dpr,
            center_x_css: width_css * 0.5,
            center_y_css: height_css * 0.5,
        }
    }
}

/// Messages consumed by the worker (host → worker).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// Start a session. The surface itself travels alongside this message
    /// in-process; on the wire only the config is present.
    Init {
        /// Full configuration
        config: Config,
    },
    /// Surface dimensions changed
    Resize(ResizeRequest),
    /// Stop scheduling ticks
    Pause,
    /// Restart scheduling ticks immediately
    Resume,
    /// Anchor readiness changed
    #[serde(rename_all = "camelCase")]
    Ready {
        /// Whether the anchor condition holds
        is_ready: bool,
    },
    /// Merge a partial config into the live one
    ConfigUpdate {
        /// Fields to overlay
        config: ConfigPatch,
    },
    /// Any kind this worker does not understand. Ignored.
    #[serde(other)]
    Unknown,
}

impl HostMessage {
    /// Message kind as it appears in the `type` field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Resize(_) => "resize",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Ready { .. } => "ready",
            Self::ConfigUpdate { .. } => "configUpdate",
            Self::Unknown => "unknown",
        }
    }

    /// Decodes a JSON wire message.
    ///
    /// # Errors
    ///
    /// Returns [`WarpfieldError::Json`](crate::WarpfieldError::Json) if the
    /// text is not a JSON object with a string `type`, or if a known kind is
    /// missing fields. Unknown kinds decode to [`HostMessage::Unknown`].
    pub fn from_json(text: &str) -> WarpfieldResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encodes this message as JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures (non-finite floats are written as null
    /// by `serde_json`, so this is not expected in practice).
    pub fn to_json(&self) -> WarpfieldResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Messages emitted by the worker (worker → host).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerEvent {
    /// The reveal gate latched
    Visible {
        /// Transition timestamp
        at: f64,
    },
    /// Smoothed frame-rate sample
    Perf {
        /// Exponential moving average of FPS
        fps: f64,
        /// Sample timestamp
        at: f64,
    },
}

impl WorkerEvent {
    /// Timestamp carried by the event.
    #[must_use]
    pub const fn at(&self) -> f64 {
        match *self {
            Self::Visible { at } | Self::Perf { at, .. } => at,
        }
    }

    /// Decodes a JSON wire event.
    ///
    /// # Errors
    ///
    /// Returns [`WarpfieldError::Json`](crate::WarpfieldError::Json) on
    /// malformed input.
    pub fn from_json(text: &str) -> WarpfieldResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encodes this event as JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> WarpfieldResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_resize() {
        let msg = HostMessage::from_json(
            r#"{"type":"resize","widthCss":800,"heightCss":600,"dpr":2,"centerXCss":400,"centerYCss":300}"#,
        )
        .unwrap();

        assert_eq!(
            msg,
            HostMessage::Resize(ResizeRequest {
                width_css: 800.0,
                height_css: 600.0,
                dpr: 2.0,
                center_x_css: 400.0,
                center_y_css: 300.0,
            })
        );
    }

    #[test]
    fn test_decode_ready() {
        let msg = HostMessage::from_json(r#"{"type":"ready","isReady":true}"#).unwrap();
        assert_eq!(msg, HostMessage::Ready { is_ready: true });
    }

    #[test]
    fn test_decode_partial_config_update() {
        let msg =
            HostMessage::from_json(r#"{"type":"configUpdate","config":{"speed":90}}"#).unwrap();
        let HostMessage::ConfigUpdate { config } = msg else {
            panic!("expected configUpdate, got {msg:?}");
        };
        assert_eq!(config.speed, Some(90.0));
        assert_eq!(config.density, None);
    }

    #[test]
    fn test_init_without_config_fields_uses_defaults() {
        let msg = HostMessage::from_json(r#"{"type":"init","config":{}}"#).unwrap();
        assert_eq!(
            msg,
            HostMessage::Init {
                config: Config::default()
            }
        );
    }

    #[test]
    fn test_unknown_kind_is_not_an_error() {
        let msg = HostMessage::from_json(r#"{"type":"teleport","where":"mars"}"#).unwrap();
        assert_eq!(msg, HostMessage::Unknown);
        assert_eq!(msg.kind(), "unknown");
    }

    #[test]
    fn test_missing_type_is_an_error() {
        assert!(HostMessage::from_json(r#"{"widthCss":1}"#).is_err());
    }

    #[test]
    fn test_event_wire_shape() {
        let json = WorkerEvent::Perf { fps: 58.5, at: 1000.0 }.to_json().unwrap();
        assert_eq!(json, r#"{"type":"perf","fps":58.5,"at":1000.0}"#);

        let back = WorkerEvent::from_json(r#"{"type":"visible","at":12.0}"#).unwrap();
        assert_eq!(back, WorkerEvent::Visible { at: 12.0 });
        assert_eq!(back.at(), 12.0);
    }
}
