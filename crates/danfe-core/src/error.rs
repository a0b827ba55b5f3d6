//! Error types for the danfe-core library.
//!
//! The engine itself has no fatal failure modes: malformed lines become
//! [`crate::engine::SkipReason`] values and malformed documents yield empty
//! record sets. The errors here cover the surrounding concerns only
//! (configuration files, host I/O).

use thiserror::Error;

/// Main error type for the danfex libraries.
#[derive(Error, Debug)]
pub enum DanfeError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the danfex libraries.
pub type Result<T> = std::result::Result<T, DanfeError>;
