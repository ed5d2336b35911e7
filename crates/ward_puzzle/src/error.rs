//! Error types for puzzle and lockable registration

use thiserror::Error;
use ward_core::{LockableId, PuzzleId};

/// Puzzle system errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PuzzleError {
    /// Two lockables share an identity
    #[error("Lockable already registered: {0}")]
    DuplicateLockable(LockableId),

    /// Two puzzles share an identity
    #[error("Puzzle already registered: {0}")]
    DuplicatePuzzle(PuzzleId),

    /// Lookup of a lockable that was never registered
    #[error("Unknown lockable: {0}")]
    UnknownLockable(LockableId),

    /// Lookup of a puzzle that was never registered
    #[error("Unknown puzzle: {0}")]
    UnknownPuzzle(PuzzleId),

    /// Lockable built without any animated geometry
    #[error("Lockable {0} has no leaves")]
    NoLeaves(LockableId),
}

/// Result type for puzzle operations
pub type Result<T> = std::result::Result<T, PuzzleError>;
