//! # Shared Error Types
//!
//! Errors raised at the edges of the engine: decoding wire messages and
//! loading configuration. The tick loop itself never returns errors.

use thiserror::Error;

/// Errors that can occur while decoding messages or loading configuration.
#[derive(Error, Debug)]
pub enum WarpfieldError {
    /// A wire message was not valid JSON or did not match the protocol.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration file was not valid TOML.
    #[error("malformed config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration file could not be read.
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {field} = {value}")]
    InvalidConfig {
        /// Field name as it appears on the wire.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

/// Result type for shared operations.
pub type WarpfieldResult<T> = Result<T, WarpfieldError>;
