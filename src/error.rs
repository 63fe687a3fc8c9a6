//! # Error Types
//!
//! This module defines error types used throughout the etiqueta library.

use thiserror::Error;

/// Main error type for etiqueta operations
#[derive(Debug, Error)]
pub enum EtiquetaError {
    /// Invalid argument (negative padding, malformed address, unknown name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// QR encoding error (data does not fit any symbol version)
    #[error("QR encoding error: {0}")]
    Encoding(String),

    /// Font loading or parsing error
    #[error("Font error: {0}")]
    Font(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Raster conversion error, including warnings escalated to failures
    #[error("Raster error: {0}")]
    Raster(String),

    /// Transport-level errors (device discovery, connection, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, EtiquetaError>;
