//! Ownership of every lockable in the scene

use glam::Vec3;
use std::collections::{BTreeMap, HashMap};
use ward_core::{horizontal_distance, AnimationHandle, LockableId, MeshHandle, SceneEngine};

use crate::error::{PuzzleError, Result};
use crate::lockable::{DoorEvent, Gate, Lockable, ToggleOutcome};

/// Owns all lockables and routes animation completions back to them
#[derive(Debug, Default)]
pub struct LockableRegistry {
    lockables: BTreeMap<LockableId, Box<dyn Lockable>>,
    /// Leaf mesh -> owner
    meshes: HashMap<MeshHandle, LockableId>,
    /// Running clip -> owner
    pending: HashMap<AnimationHandle, LockableId>,
}

impl LockableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lockable
    pub fn insert(&mut self, lockable: Box<dyn Lockable>) -> Result<()> {
        let id = lockable.id().clone();
        if self.lockables.contains_key(&id) {
            return Err(PuzzleError::DuplicateLockable(id));
        }
        if lockable.leaves().is_empty() {
            return Err(PuzzleError::NoLeaves(id));
        }
        for leaf in lockable.leaves() {
            self.meshes.insert(leaf.mesh, id.clone());
        }
        log::debug!("Registered lockable {}", id);
        self.lockables.insert(id, lockable);
        Ok(())
    }

    /// Look up a lockable
    pub fn get(&self, id: &LockableId) -> Option<&dyn Lockable> {
        self.lockables.get(id).map(|l| l.as_ref())
    }

    /// Look up a lockable mutably
    pub fn get_mut(&mut self, id: &LockableId) -> Option<&mut (dyn Lockable + 'static)> {
        self.lockables.get_mut(id).map(|l| l.as_mut())
    }

    /// Owner of a leaf mesh
    pub fn find_by_mesh(&self, mesh: MeshHandle) -> Option<&LockableId> {
        self.meshes.get(&mesh)
    }

    /// Iterate over all lockables
    pub fn iter(&self) -> impl Iterator<Item = &dyn Lockable> {
        self.lockables.values().map(|l| l.as_ref())
    }

    /// Number of lockables
    pub fn len(&self) -> usize {
        self.lockables.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.lockables.is_empty()
    }

    /// Number of clips still running
    pub fn pending_animations(&self) -> usize {
        self.pending.len()
    }

    /// Unlock a lockable. Returns true if it was locked.
    pub fn unlock(&mut self, id: &LockableId) -> Result<bool> {
        let lockable = self
            .lockables
            .get_mut(id)
            .ok_or_else(|| PuzzleError::UnknownLockable(id.clone()))?;
        Ok(lockable.unlock())
    }

    /// Toggle a lockable, starting its animations on the engine
    pub fn toggle<E: SceneEngine + ?Sized>(
        &mut self,
        id: &LockableId,
        engine: &mut E,
    ) -> Result<ToggleOutcome> {
        let lockable = self
            .lockables
            .get_mut(id)
            .ok_or_else(|| PuzzleError::UnknownLockable(id.clone()))?;

        let outcome = lockable.toggle_open();
        match &outcome {
            ToggleOutcome::Started { requests, .. } => {
                for request in requests {
                    let handle = engine.play_animation(request.target, &request.clip);
                    self.pending.insert(handle, id.clone());
                }
            }
            ignored => log::debug!("Toggle of {} ignored: {:?}", id, ignored),
        }
        Ok(outcome)
    }

    /// Record a finished clip. The owner settles once all its clips are done.
    pub fn on_animation_finished(&mut self, handle: AnimationHandle) -> Option<DoorEvent> {
        let id = self.pending.remove(&handle)?;
        if self.pending.values().any(|owner| *owner == id) {
            return None;
        }
        let event = self.lockables.get_mut(&id)?.finish_animation();
        if let Some(event) = &event {
            log::debug!("{:?}", event);
        }
        event
    }

    /// Nearest item-gated lockable strictly within `range` on the XZ plane
    pub fn nearest_item_gated(&self, position: Vec3, range: f32) -> Option<&LockableId> {
        self.lockables
            .values()
            .filter(|l| matches!(l.gate(), Gate::Item(_)))
            .map(|l| (l.id(), horizontal_distance(position, l.anchor())))
            .filter(|(_, distance)| *distance < range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Stop running swings, re-lock everything and restore closed orientations
    pub fn reset<E: SceneEngine + ?Sized>(&mut self, engine: &mut E) {
        for (handle, _) in self.pending.drain() {
            engine.stop_animation(handle);
        }
        for lockable in self.lockables.values_mut() {
            for leaf in lockable.lock() {
                engine.set_rotation(leaf.mesh, leaf.axis, leaf.closed_angle);
            }
        }
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.lockables.clear();
        self.meshes.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doors::{Cupboard, ExitDoor, SwingDoor};
    use crate::lockable::LockState;
    use ward_core::{
        AnimationClip, CollisionWorld, ImportTicket, ItemKind, PuzzleId, SceneSetup, Subscription,
        SubscriptionId,
    };

    #[derive(Default)]
    struct Animator {
        next: u64,
        played: Vec<(MeshHandle, AnimationHandle)>,
        stopped: Vec<AnimationHandle>,
        rotations: Vec<(MeshHandle, f32)>,
    }

    impl CollisionWorld for Animator {}

    impl SceneEngine for Animator {
        fn configure_scene(&mut self, _setup: &SceneSetup) {}
        fn import_model(&mut self, _path: &str) -> ImportTicket {
            ImportTicket::new(0)
        }
        fn find_mesh(&self, _name: &str) -> Option<MeshHandle> {
            None
        }
        fn parent_of(&self, _mesh: MeshHandle) -> Option<MeshHandle> {
            None
        }
        fn world_position(&self, _mesh: MeshHandle) -> Option<Vec3> {
            None
        }
        fn pick_at(&self, _x: f32, _y: f32) -> Option<MeshHandle> {
            None
        }
        fn play_animation(&mut self, target: MeshHandle, _clip: &AnimationClip) -> AnimationHandle {
            self.next += 1;
            let handle = AnimationHandle::new(self.next);
            self.played.push((target, handle));
            handle
        }
        fn stop_animation(&mut self, handle: AnimationHandle) {
            self.stopped.push(handle);
        }
        fn set_rotation(&mut self, mesh: MeshHandle, _axis: Vec3, angle: f32) {
            self.rotations.push((mesh, angle));
        }
        fn set_enabled(&mut self, _mesh: MeshHandle, _enabled: bool) {}
        fn attach(&mut self, _child: MeshHandle, _parent: MeshHandle, _offset: Vec3) {}
        fn dispose(&mut self, _mesh: MeshHandle) {}
        fn set_spot_light(&mut self, _enabled: bool, _intensity: f32) {}
        fn set_camera(&mut self, _position: Vec3, _pitch: f32, _yaw: f32) {}
        fn subscribe(&mut self, _kind: Subscription) -> SubscriptionId {
            SubscriptionId(0)
        }
        fn unsubscribe(&mut self, _id: SubscriptionId) {}
    }

    fn id(name: &str) -> LockableId {
        LockableId::new(name).unwrap()
    }

    fn registry() -> LockableRegistry {
        let mut registry = LockableRegistry::new();
        registry
            .insert(Box::new(Cupboard::new(
                id("cupboard"),
                Gate::Puzzle(PuzzleId::new("operating_room").unwrap()),
                Vec3::new(0.0, 0.0, 0.0),
                MeshHandle::new(1),
                MeshHandle::new(2),
            )))
            .unwrap();
        registry
            .insert(Box::new(SwingDoor::new(
                id("storage"),
                Gate::Item(ItemKind::Key),
                Vec3::new(5.0, 0.0, 0.0),
                MeshHandle::new(3),
            )))
            .unwrap();
        registry
            .insert(Box::new(ExitDoor::new(
                id("exit"),
                Gate::Item(ItemKind::IdCard),
                Vec3::new(20.0, 0.0, 0.0),
                MeshHandle::new(4),
            )))
            .unwrap();
        registry
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = registry();
        let dup = SwingDoor::new(id("storage"), Gate::Item(ItemKind::Key), Vec3::ZERO, MeshHandle::new(9));
        assert_eq!(
            registry.insert(Box::new(dup)),
            Err(PuzzleError::DuplicateLockable(id("storage")))
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_find_by_mesh() {
        let registry = registry();
        assert_eq!(registry.find_by_mesh(MeshHandle::new(2)), Some(&id("cupboard")));
        assert_eq!(registry.find_by_mesh(MeshHandle::new(99)), None);
    }

    #[test]
    fn test_finishes_after_every_leaf() {
        let mut registry = registry();
        let mut engine = Animator::default();
        registry.unlock(&id("cupboard")).unwrap();

        let outcome = registry.toggle(&id("cupboard"), &mut engine).unwrap();
        assert!(matches!(outcome, ToggleOutcome::Started { .. }));
        assert_eq!(engine.played.len(), 2);

        let (_, first) = engine.played[0];
        let (_, second) = engine.played[1];
        assert_eq!(registry.on_animation_finished(first), None);
        assert!(registry.get(&id("cupboard")).unwrap().is_animating());

        assert_eq!(
            registry.on_animation_finished(second),
            Some(DoorEvent::Opened(id("cupboard")))
        );
        assert_eq!(registry.pending_animations(), 0);
        // Stale handle
        assert_eq!(registry.on_animation_finished(second), None);
    }

    #[test]
    fn test_locked_toggle_plays_nothing() {
        let mut registry = registry();
        let mut engine = Animator::default();
        assert_eq!(
            registry.toggle(&id("storage"), &mut engine).unwrap(),
            ToggleOutcome::Locked
        );
        assert!(engine.played.is_empty());
        assert!(registry.toggle(&id("nowhere"), &mut engine).is_err());
    }

    #[test]
    fn test_nearest_item_gated_is_strict() {
        let registry = registry();
        // The cupboard is closer but puzzle-gated
        assert_eq!(
            registry.nearest_item_gated(Vec3::new(1.0, 0.0, 0.0), 10.0),
            Some(&id("storage"))
        );
        // Exactly at range is out
        assert_eq!(registry.nearest_item_gated(Vec3::new(15.0, 0.0, 0.0), 5.0), None);
        // Height is ignored
        assert_eq!(
            registry.nearest_item_gated(Vec3::new(19.0, 30.0, 0.0), 10.0),
            Some(&id("exit"))
        );
    }

    #[test]
    fn test_reset_relocks_and_restores() {
        let mut registry = registry();
        let mut engine = Animator::default();
        registry.unlock(&id("storage")).unwrap();
        registry.toggle(&id("storage"), &mut engine).unwrap();

        registry.reset(&mut engine);
        assert_eq!(registry.pending_animations(), 0);
        assert!(registry.iter().all(|l| l.state() == LockState::Locked));
        assert!(engine.rotations.contains(&(MeshHandle::new(3), 0.0)));
        assert_eq!(engine.rotations.len(), 4);
    }

    #[test]
    fn test_reset_stops_swings_in_flight() {
        let mut registry = registry();
        let mut engine = Animator::default();
        registry.unlock(&id("cupboard")).unwrap();
        registry.toggle(&id("cupboard"), &mut engine).unwrap();
        let (_, first) = engine.played[0];
        let (_, second) = engine.played[1];

        registry.reset(&mut engine);
        engine.stopped.sort();
        let mut expected = vec![first, second];
        expected.sort();
        assert_eq!(engine.stopped, expected);

        // A completion that slips through afterwards settles nothing
        assert_eq!(registry.on_animation_finished(first), None);
        assert!(registry.get(&id("cupboard")).unwrap().is_locked());
    }
}
