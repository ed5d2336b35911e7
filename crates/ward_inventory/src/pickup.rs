//! Item meshes placed in the world

use serde::{Deserialize, Serialize};
use ward_core::{ItemKind, MeshHandle};

/// Pickup visibility/collection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupState {
    /// Placed but not shown until something reveals it
    Hidden,
    /// Visible and pickable
    Available,
    /// Taken; the mesh stays disabled
    Collected,
}

/// Result of trying to pick up an item mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    /// Item taken; the caller grants it and hides the mesh
    Collected(ItemKind),
    /// Already taken earlier
    AlreadyCollected(ItemKind),
    /// Not revealed yet
    NotVisible(ItemKind),
    /// Mesh is not an item anchor
    NotAnItem,
}

/// One item in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPickup {
    /// Item granted on pickup
    pub kind: ItemKind,
    /// Anchor mesh; picks anywhere below it in the scene graph resolve here
    pub mesh: MeshHandle,
    initial: PickupState,
    state: PickupState,
}

impl ItemPickup {
    /// Create a visible pickup
    pub fn new(kind: ItemKind, mesh: MeshHandle) -> Self {
        Self {
            kind,
            mesh,
            initial: PickupState::Available,
            state: PickupState::Available,
        }
    }

    /// Create a pickup that stays hidden until revealed
    pub fn hidden(kind: ItemKind, mesh: MeshHandle) -> Self {
        Self {
            initial: PickupState::Hidden,
            state: PickupState::Hidden,
            ..Self::new(kind, mesh)
        }
    }

    /// Current state
    pub fn state(&self) -> PickupState {
        self.state
    }

    /// Whether the mesh should be shown
    pub fn is_visible(&self) -> bool {
        self.state == PickupState::Available
    }

    /// Show a hidden pickup. Returns true if it changed.
    pub fn reveal(&mut self) -> bool {
        if self.state == PickupState::Hidden {
            self.state = PickupState::Available;
            true
        } else {
            false
        }
    }

    /// Attempt to take the item
    pub fn collect(&mut self) -> PickupOutcome {
        match self.state {
            PickupState::Available => {
                self.state = PickupState::Collected;
                PickupOutcome::Collected(self.kind)
            }
            PickupState::Collected => PickupOutcome::AlreadyCollected(self.kind),
            PickupState::Hidden => PickupOutcome::NotVisible(self.kind),
        }
    }

    /// Back to the placed state
    pub fn reset(&mut self) {
        self.state = self.initial;
    }
}

/// All pickups registered in the scene
#[derive(Debug, Clone, Default)]
pub struct PickupTable {
    pickups: Vec<ItemPickup>,
}

impl PickupTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pickup
    pub fn insert(&mut self, pickup: ItemPickup) {
        self.pickups.push(pickup);
    }

    /// Number of registered pickups
    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    /// Whether a mesh is a pickup anchor
    pub fn contains_mesh(&self, mesh: MeshHandle) -> bool {
        self.pickups.iter().any(|p| p.mesh == mesh)
    }

    /// Look up by anchor mesh
    pub fn get(&self, mesh: MeshHandle) -> Option<&ItemPickup> {
        self.pickups.iter().find(|p| p.mesh == mesh)
    }

    /// All pickups
    pub fn iter(&self) -> impl Iterator<Item = &ItemPickup> {
        self.pickups.iter()
    }

    /// Take the item anchored at `mesh`
    pub fn collect(&mut self, mesh: MeshHandle) -> PickupOutcome {
        match self.pickups.iter_mut().find(|p| p.mesh == mesh) {
            Some(pickup) => pickup.collect(),
            None => PickupOutcome::NotAnItem,
        }
    }

    /// Reveal every hidden pickup of a kind; returns the meshes to enable
    pub fn reveal(&mut self, kind: ItemKind) -> Vec<MeshHandle> {
        self.pickups
            .iter_mut()
            .filter(|p| p.kind == kind)
            .filter_map(|p| p.reveal().then_some(p.mesh))
            .collect()
    }

    /// Reset every pickup; returns each mesh with its visibility
    pub fn reset(&mut self) -> Vec<(MeshHandle, bool)> {
        self.pickups
            .iter_mut()
            .map(|p| {
                p.reset();
                (p.mesh, p.is_visible())
            })
            .collect()
    }

    /// Drop everything (scene teardown)
    pub fn clear(&mut self) {
        self.pickups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_once() {
        let mut pickup = ItemPickup::new(ItemKind::Flashlight, MeshHandle::new(1));

        assert_eq!(pickup.collect(), PickupOutcome::Collected(ItemKind::Flashlight));
        assert_eq!(pickup.collect(), PickupOutcome::AlreadyCollected(ItemKind::Flashlight));
        assert!(!pickup.is_visible());
    }

    #[test]
    fn test_hidden_until_revealed() {
        let mut pickup = ItemPickup::hidden(ItemKind::IdCard, MeshHandle::new(2));

        assert_eq!(pickup.collect(), PickupOutcome::NotVisible(ItemKind::IdCard));
        assert!(pickup.reveal());
        assert!(!pickup.reveal());
        assert_eq!(pickup.collect(), PickupOutcome::Collected(ItemKind::IdCard));
    }

    #[test]
    fn test_table_reveal_and_reset() {
        let mut table = PickupTable::new();
        table.insert(ItemPickup::new(ItemKind::Key, MeshHandle::new(1)));
        table.insert(ItemPickup::hidden(ItemKind::IdCard, MeshHandle::new(2)));

        assert_eq!(table.reveal(ItemKind::IdCard), vec![MeshHandle::new(2)]);
        assert_eq!(table.reveal(ItemKind::IdCard), Vec::<MeshHandle>::new());
        table.collect(MeshHandle::new(1));

        let reset = table.reset();
        assert_eq!(reset, vec![(MeshHandle::new(1), true), (MeshHandle::new(2), false)]);
        assert_eq!(table.collect(MeshHandle::new(9)), PickupOutcome::NotAnItem);
    }
}
