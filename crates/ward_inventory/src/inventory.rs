//! Inventory flags

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ward_core::ItemKind;

/// Inventory events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryEvent {
    /// Item entered the inventory
    ItemAdded(ItemKind),
    /// Item was used up
    ItemConsumed(ItemKind),
    /// Grant for an item already held (no state change)
    AlreadyHeld(ItemKind),
    /// Flashlight switched on/off
    FlashlightToggled { on: bool },
}

/// What the player is carrying
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Held items
    held: BTreeSet<ItemKind>,
    /// Flashlight beam status
    flashlight_on: bool,
    /// Events since the last drain
    #[serde(skip)]
    events: Vec<InventoryEvent>,
}

impl Inventory {
    /// Create an empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an item is held
    pub fn has(&self, kind: ItemKind) -> bool {
        self.held.contains(&kind)
    }

    /// Held items in display order
    pub fn held(&self) -> impl Iterator<Item = ItemKind> + '_ {
        self.held.iter().copied()
    }

    /// Whether the flashlight beam is on
    pub fn flashlight_on(&self) -> bool {
        self.flashlight_on
    }

    /// Give an item. Returns true only when the flag flips to held.
    pub fn grant(&mut self, kind: ItemKind) -> bool {
        if self.held.insert(kind) {
            log::info!("Acquired {}", kind);
            self.events.push(InventoryEvent::ItemAdded(kind));
            true
        } else {
            log::debug!("Already holding {}", kind);
            self.events.push(InventoryEvent::AlreadyHeld(kind));
            false
        }
    }

    /// Use up an item. Returns true if it was held.
    pub fn consume(&mut self, kind: ItemKind) -> bool {
        if !self.held.remove(&kind) {
            return false;
        }
        if kind == ItemKind::Flashlight {
            self.flashlight_on = false;
        }
        log::info!("Used {}", kind);
        self.events.push(InventoryEvent::ItemConsumed(kind));
        true
    }

    /// Toggle the beam. `None` when there is no flashlight to toggle.
    pub fn toggle_flashlight(&mut self) -> Option<bool> {
        if !self.has(ItemKind::Flashlight) {
            return None;
        }
        self.flashlight_on = !self.flashlight_on;
        self.events.push(InventoryEvent::FlashlightToggled {
            on: self.flashlight_on,
        });
        Some(self.flashlight_on)
    }

    /// Empty everything (restart)
    pub fn reset(&mut self) {
        self.held.clear();
        self.flashlight_on = false;
        self.events.clear();
    }

    /// Drain pending events
    pub fn drain_events(&mut self) -> Vec<InventoryEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_is_idempotent() {
        let mut inv = Inventory::new();

        assert!(inv.grant(ItemKind::Card));
        assert!(!inv.grant(ItemKind::Card));
        assert!(inv.has(ItemKind::Card));
        assert_eq!(
            inv.drain_events(),
            vec![
                InventoryEvent::ItemAdded(ItemKind::Card),
                InventoryEvent::AlreadyHeld(ItemKind::Card)
            ]
        );
    }

    #[test]
    fn test_consume() {
        let mut inv = Inventory::new();

        assert!(!inv.consume(ItemKind::Key));
        inv.grant(ItemKind::Key);
        assert!(inv.consume(ItemKind::Key));
        assert!(!inv.has(ItemKind::Key));
    }

    #[test]
    fn test_flashlight_needs_item() {
        let mut inv = Inventory::new();

        assert_eq!(inv.toggle_flashlight(), None);
        assert!(!inv.flashlight_on());

        inv.grant(ItemKind::Flashlight);
        assert_eq!(inv.toggle_flashlight(), Some(true));
        assert_eq!(inv.toggle_flashlight(), Some(false));
    }

    #[test]
    fn test_reset() {
        let mut inv = Inventory::new();
        inv.grant(ItemKind::Flashlight);
        inv.toggle_flashlight();

        inv.reset();
        assert_eq!(inv.held().count(), 0);
        assert!(!inv.flashlight_on());
        assert!(inv.drain_events().is_empty());
    }
}
