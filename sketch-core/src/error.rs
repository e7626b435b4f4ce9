//! Error types for core operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
///
/// None of these cross the drawing or normalizing entry points; they surface
/// only from the small parsing helpers (colors, script steps) that callers
/// may use directly.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A color string was not `#rrggbb` hex.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A model reply did not match the result record schema.
    #[error("Reply does not match result schema: {0}")]
    Schema(String),
}
