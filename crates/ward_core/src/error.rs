//! Error types shared across the workspace

use thiserror::Error;

/// Core errors
///
/// Gameplay never fails through these; they are raised while building
/// things from configuration (key names, item names, bounds).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WardError {
    /// Key name that does not map to a physical key
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    /// Item name that does not map to an inventory item
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// Identity strings must not be empty
    #[error("Empty {0} identity")]
    EmptyId(&'static str),

    /// Box with min > max on some axis
    #[error("Inverted bounds: min {min:?} max {max:?}")]
    InvertedBounds { min: [f32; 3], max: [f32; 3] },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WardError>;
