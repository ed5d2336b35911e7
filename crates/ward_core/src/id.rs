//! Identities for engine objects and gameplay objects
//!
//! Engine-side objects (meshes, import requests, running animations) are
//! opaque numeric handles handed out by the engine. Gameplay objects
//! (lockables, puzzles) are named by the scene content and keep their
//! string identity so log lines stay readable.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WardError};

macro_rules! engine_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Create from a raw engine value
            #[inline]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw engine value
            #[inline]
            pub const fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

engine_handle!(
    /// A mesh (or transform node) living in the engine's scene graph
    MeshHandle,
    "Mesh"
);
engine_handle!(
    /// An asynchronous model import in flight
    ImportTicket,
    "Import"
);
engine_handle!(
    /// A running animation
    AnimationHandle,
    "Anim"
);

macro_rules! named_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identity, rejecting empty names
            pub fn new(name: impl Into<String>) -> Result<Self> {
                let name = name.into();
                if name.is_empty() {
                    return Err(WardError::EmptyId($what));
                }
                Ok(Self(name))
            }

            /// Identity from a name compiled into the binary
            pub fn from_static(name: &'static str) -> Self {
                Self(name.to_string())
            }

            /// Get the name
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

named_id!(
    /// Identity of a cupboard, door or vault
    LockableId,
    "lockable"
);
named_id!(
    /// Identity of a puzzle
    PuzzleId,
    "puzzle"
);

/// The items the player can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Key,
    Card,
    Flashlight,
    IdCard,
}

impl ItemKind {
    /// All item kinds, in inventory display order
    pub const ALL: [ItemKind; 4] = [Self::Key, Self::Card, Self::Flashlight, Self::IdCard];

    /// Human readable name for hints
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Card => "card",
            Self::Flashlight => "flashlight",
            Self::IdCard => "ID card",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = WardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "key" => Ok(Self::Key),
            "card" => Ok(Self::Card),
            "flashlight" | "torch" => Ok(Self::Flashlight),
            "id_card" | "idcard" | "id card" => Ok(Self::IdCard),
            _ => Err(WardError::UnknownItem(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_id_rejects_empty() {
        assert!(LockableId::new("vault_door").is_ok());
        assert_eq!(PuzzleId::new(""), Err(WardError::EmptyId("puzzle")));
    }

    #[test]
    fn test_item_kind_parse() {
        assert_eq!("Flashlight".parse::<ItemKind>(), Ok(ItemKind::Flashlight));
        assert_eq!("id_card".parse::<ItemKind>(), Ok(ItemKind::IdCard));
        assert!("scalpel".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_handle_debug() {
        assert_eq!(format!("{:?}", MeshHandle::new(7)), "Mesh(7)");
        assert_eq!(ImportTicket::new(3).raw(), 3);
    }
}
