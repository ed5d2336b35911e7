//! Streaming errors

use thiserror::Error;

/// Region construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamingError {
    /// The load radius must be strictly inside the unload radius
    #[error("Region {name}: load radius {load} must be less than unload radius {unload}")]
    InvalidRadii { name: String, load: f32, unload: f32 },

    /// Negative or NaN radius
    #[error("Region {name}: radius {radius} is not a positive number")]
    NegativeRadius { name: String, radius: f32 },

    /// Two regions with the same name
    #[error("Region already registered: {0}")]
    DuplicateRegion(String),
}

/// Result type for streaming operations
pub type Result<T> = std::result::Result<T, StreamingError>;
