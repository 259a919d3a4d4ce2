//! # Warpfield Core
//!
//! Hyperspace starfield: simulate, batch, draw, reveal.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         TICK                                 │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Session → Physics Step → Batch Rasterizer → RasterSurface   │
//! │               ↓                   ↓                          │
//! │          Spread Stats        Vignette (destination-in)       │
//! │               ↓                                              │
//! │          Reveal Gate → Visible event                         │
//! │                                                              │
//! │  Telemetry (every ≥ 500 ms) → Perf event                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## MANDATE
//!
//! - At most 36 stroke state changes per frame
//! - Nothing drawn until the reveal gate latches
//! - The tick never fails: bad input is clamped or ignored

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod geometry;
pub mod physics;
pub mod pool;
pub mod raster;
pub mod reveal;
pub mod session;
pub mod star;
pub mod surface;
pub mod telemetry;
pub mod vignette;

pub use geometry::Geometry;
pub use physics::{Segment, SpreadStats, StepOutcome, StepParams};
pub use pool::{PoolResize, StarPool};
pub use raster::{BatchRasterizer, RasterStats};
pub use reveal::{RevealGate, RevealState};
pub use session::{Session, TickReport};
pub use star::{SpawnMode, Star};
pub use surface::{BlendMode, DrawCall, PixelSurface, RasterSurface, RecordingSurface, StrokeStyle};
pub use telemetry::Telemetry;
pub use vignette::{ColorStop, VignetteGradient};
