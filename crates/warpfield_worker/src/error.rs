//! # Worker Error Types

use thiserror::Error;
use warpfield_shared::WarpfieldError;

/// Errors surfaced to the host by the worker boundary.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// The worker thread is gone; nothing more can be sent to it.
    #[error("worker disconnected")]
    Disconnected,

    /// The OS refused to start the worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A wire message could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] WarpfieldError),

    /// The worker thread panicked before it could report.
    #[error("worker thread panicked")]
    Panicked,
}

/// Result type for worker operations.
pub type WorkerResult<T> = Result<T, WorkerError>;
