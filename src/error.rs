//! # Error Types
//!
//! This module defines error types used throughout the laurel library.
//!
//! Every variant is recoverable: callers surface the message to the user and
//! let them retry the action that failed.

use thiserror::Error;

/// Main error type for laurel operations
#[derive(Debug, Error)]
pub enum LaurelError {
    /// Rejected input (empty template name, malformed payload)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence service unreachable or failing
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Referenced template does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Capture attempted while nothing is mounted
    #[error("Render target unavailable: {0}")]
    RenderTargetUnavailable(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Output document assembly error
    #[error("Document error: {0}")]
    Document(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, LaurelError>;
