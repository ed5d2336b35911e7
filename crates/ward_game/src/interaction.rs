//! Pointer picks, the use key and the light key

use glam::Vec3;
use ward_core::{ItemKind, LockableId, MeshHandle, SceneEngine};
use ward_inventory::{Inventory, PickupTable};
use ward_puzzle::{Gate, LockableRegistry, PuzzleError, ToggleOutcome};

/// Ownership chains deeper than this are treated as a miss
const MAX_PARENT_DEPTH: usize = 32;

/// What a pick landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickTarget {
    /// Anchor mesh of an item pickup
    Item(MeshHandle),
    Lockable(LockableId),
}

/// Walk up from the hit mesh until something registered is found
pub fn resolve_pick<E: SceneEngine + ?Sized>(
    engine: &E,
    hit: MeshHandle,
    pickups: &PickupTable,
    registry: &LockableRegistry,
) -> Option<PickTarget> {
    let mut current = hit;
    for _ in 0..MAX_PARENT_DEPTH {
        if pickups.contains_mesh(current) {
            return Some(PickTarget::Item(current));
        }
        if let Some(id) = registry.find_by_mesh(current) {
            return Some(PickTarget::Lockable(id.clone()));
        }
        current = engine.parent_of(current)?;
    }
    log::debug!("Pick on {:?}: ownership chain too deep", hit);
    None
}

/// Result of pressing the use key
#[derive(Debug, Clone, PartialEq)]
pub enum DoorUse {
    /// No item-gated door within range
    OutOfRange,
    /// Nearest door is locked and the item is not held
    MissingItem(ItemKind),
    /// Unlocked with `item` (now used up) and started opening
    Unlocked {
        door: LockableId,
        item: ItemKind,
        outcome: ToggleOutcome,
    },
    /// Already unlocked; toggled
    Toggled { door: LockableId, outcome: ToggleOutcome },
}

/// Open the nearest item-gated door in range, spending the item if it was locked
pub fn use_nearest_door<E: SceneEngine + ?Sized>(
    engine: &mut E,
    registry: &mut LockableRegistry,
    inventory: &mut Inventory,
    position: Vec3,
    range: f32,
) -> Result<DoorUse, PuzzleError> {
    let Some(door) = registry.nearest_item_gated(position, range).cloned() else {
        return Ok(DoorUse::OutOfRange);
    };
    let lockable = registry
        .get(&door)
        .ok_or_else(|| PuzzleError::UnknownLockable(door.clone()))?;
    let (Gate::Item(item), locked) = (lockable.gate().clone(), lockable.is_locked()) else {
        return Ok(DoorUse::OutOfRange);
    };

    if !locked {
        let outcome = registry.toggle(&door, engine)?;
        return Ok(DoorUse::Toggled { door, outcome });
    }
    if !inventory.has(item) {
        return Ok(DoorUse::MissingItem(item));
    }

    registry.unlock(&door)?;
    let lit = inventory.flashlight_on();
    inventory.consume(item);
    if lit && !inventory.flashlight_on() {
        engine.set_spot_light(false, 0.0);
    }
    let outcome = registry.toggle(&door, engine)?;
    Ok(DoorUse::Unlocked { door, item, outcome })
}

/// Flip the flashlight beam. `None` when the flashlight is not held.
pub fn toggle_flashlight<E: SceneEngine + ?Sized>(
    engine: &mut E,
    inventory: &mut Inventory,
    intensity: f32,
) -> Option<bool> {
    let on = inventory.toggle_flashlight()?;
    engine.set_spot_light(on, if on { intensity } else { 0.0 });
    Some(on)
}
