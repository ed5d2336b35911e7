//! Ward Inventory - Held items and world pickups
//!
//! The player holds at most one of each [`ItemKind`]; holding is a flag,
//! not a stack. Items enter the inventory by picking their mesh in the
//! world or as a puzzle reward, and leave it when a door consumes them.
//!
//! # Example
//!
//! ```ignore
//! use ward_inventory::prelude::*;
//!
//! let mut inventory = Inventory::new();
//! let mut pickups = PickupTable::new();
//! pickups.insert(ItemPickup::new(ItemKind::Flashlight, flashlight_mesh));
//!
//! if let PickupOutcome::Collected(kind) = pickups.collect(flashlight_mesh) {
//!     inventory.grant(kind);
//! }
//! ```

pub mod inventory;
pub mod pickup;

pub mod prelude {
    pub use crate::inventory::{Inventory, InventoryEvent};
    pub use crate::pickup::{ItemPickup, PickupOutcome, PickupState, PickupTable};
    pub use ward_core::ItemKind;
}

pub use prelude::*;
