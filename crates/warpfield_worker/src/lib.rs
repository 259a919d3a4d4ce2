//! # Warpfield Worker
//!
//! Runs a starfield [`Session`](warpfield_core::Session) on its own thread.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  Inbound (init / resize / pause / ...)  ┌──────────────┐
//! │              │────────────────────────────────────────>│  Worker      │
//! │  HostHandle  │                                         │  ├ Cadence   │
//! │              │<────────────────────────────────────────│  └ Session   │
//! └──────────────┘  WorkerEvent (visible / perf)           └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use warpfield_core::PixelSurface;
//! use warpfield_shared::{Config, ResizeRequest};
//! use warpfield_worker::{spawn, WorkerOptions};
//!
//! let host = spawn::<PixelSurface>(WorkerOptions::default())?;
//! host.init(PixelSurface::new(0, 0), Config::default())?;
//! host.resize(ResizeRequest::centered(1280.0, 720.0, 2.0))?;
//! while let Some(event) = host.next_event(Duration::from_secs(1)) {
//!     println!("{event:?}");
//! }
//! let stats = host.shutdown()?;
//! # Ok::<(), warpfield_worker::WorkerError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod actor;
pub mod channel;
pub mod error;
pub mod handle;
pub mod scheduler;

pub use actor::{Worker, WorkerStats};
pub use channel::{EventBus, EventReceiver, EventSender, Inbound, SendOutcome};
pub use error::{WorkerError, WorkerResult};
pub use handle::{spawn, spawn_with_cadence, HostHandle, WorkerOptions};
pub use scheduler::{Cadence, FixedInterval, FixedRate, WorkerClock};
