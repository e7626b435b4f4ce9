//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while capturing or decoding a raster.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The raster could not be encoded.
    #[error("Failed to encode capture: {0}")]
    Encode(String),

    /// Captured bytes could not be decoded.
    #[error("Failed to decode capture: {0}")]
    Decode(String),

    /// A data URL was malformed.
    #[error("Invalid data URL: {0}")]
    DataUrl(String),
}
