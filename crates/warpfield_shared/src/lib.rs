//! # Warpfield Shared
//!
//! Types used on both sides of the worker boundary.
//!
//! ## RULE
//!
//! This crate must NEVER depend on surfaces, rasterization or threads.
//! If you need those, put them in `warpfield_core` or `warpfield_worker`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod protocol;

pub use config::{Config, ConfigPatch};
pub use error::{WarpfieldError, WarpfieldResult};
pub use math::{lerp, Bounds, Vec2};
pub use protocol::{HostMessage, ResizeRequest, WorkerEvent};
