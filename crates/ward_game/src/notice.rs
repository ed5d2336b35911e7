//! Transient player-facing messages

use core::fmt;
use ward_core::ItemKind;
use ward_puzzle::{RETRY_MESSAGE, SUCCESS_MESSAGE};

/// A message the host shows briefly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Use key with no item-gated door in reach
    OutOfRange,
    /// A gated action needs an item the player lacks
    MissingItem(ItemKind),
    /// Picked a door that only opens with an item
    Locked(ItemKind),
    WrongAnswer,
    PuzzleSolved,
    ItemAcquired(ItemKind),
    /// A hidden item became visible
    ItemRevealed(ItemKind),
    /// Item used up opening a door
    ItemUsed(ItemKind),
    Escaped,
    TimeOver,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => f.write_str("There is nothing to open here."),
            Self::MissingItem(kind) => write!(f, "You need the {}.", kind),
            Self::Locked(kind) => write!(f, "It's locked. Maybe the {} opens it.", kind),
            Self::WrongAnswer => f.write_str(RETRY_MESSAGE),
            Self::PuzzleSolved => f.write_str(SUCCESS_MESSAGE),
            Self::ItemAcquired(kind) => write!(f, "You picked up the {}.", kind),
            Self::ItemRevealed(kind) => write!(f, "Something fell loose... the {}?", kind),
            Self::ItemUsed(kind) => write!(f, "You used the {}.", kind),
            Self::Escaped => f.write_str("You escaped the ward."),
            Self::TimeOver => f.write_str("Time is up."),
        }
    }
}
