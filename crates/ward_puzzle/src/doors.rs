//! Concrete lockables: cupboards, swing doors and the exit door

use glam::Vec3;
use std::f32::consts::FRAC_PI_2;
use ward_core::{LockableId, MeshHandle, ANIMATION_FPS};

use crate::lockable::{DoorEvent, Gate, Leaf, LockCore, LockState, Lockable, ToggleOutcome};

/// Length of every door swing (one second at the animation rate)
pub const DOOR_FRAMES: u32 = ANIMATION_FPS;

macro_rules! delegate_core {
    () => {
        fn id(&self) -> &LockableId {
            &self.core.id
        }

        fn gate(&self) -> &Gate {
            &self.core.gate
        }

        fn anchor(&self) -> Vec3 {
            self.core.anchor
        }

        fn leaves(&self) -> &[Leaf] {
            &self.core.leaves
        }

        fn state(&self) -> LockState {
            self.core.state
        }

        fn lock(&mut self) -> Vec<Leaf> {
            self.core.lock()
        }

        fn unlock(&mut self) -> bool {
            self.core.unlock()
        }

        fn finish_animation(&mut self) -> Option<DoorEvent> {
            self.core.finish()
        }
    };
}

/// Open when closed, close when open
fn toggle_two_way(core: &mut LockCore) -> ToggleOutcome {
    match core.state {
        LockState::Locked => ToggleOutcome::Locked,
        LockState::Animating { .. } => ToggleOutcome::Busy,
        LockState::Closed => ToggleOutcome::Started {
            requests: core.start(true),
            escape: false,
        },
        LockState::Open => ToggleOutcome::Started {
            requests: core.start(false),
            escape: false,
        },
    }
}

/// Two-leaf cupboard; the leaves swing apart about vertical hinges
#[derive(Debug, Clone)]
pub struct Cupboard {
    core: LockCore,
}

impl Cupboard {
    pub fn new(id: LockableId, gate: Gate, anchor: Vec3, left: MeshHandle, right: MeshHandle) -> Self {
        let leaves = vec![
            Leaf::new(left, Vec3::Y, 0.0, -FRAC_PI_2),
            Leaf::new(right, Vec3::Y, 0.0, FRAC_PI_2),
        ];
        Self {
            core: LockCore::new(id, gate, anchor, leaves, DOOR_FRAMES),
        }
    }
}

impl Lockable for Cupboard {
    delegate_core!();

    fn toggle_open(&mut self) -> ToggleOutcome {
        toggle_two_way(&mut self.core)
    }
}

/// Single hinged door
#[derive(Debug, Clone)]
pub struct SwingDoor {
    core: LockCore,
}

impl SwingDoor {
    pub fn new(id: LockableId, gate: Gate, anchor: Vec3, leaf: MeshHandle) -> Self {
        Self {
            core: LockCore::new(
                id,
                gate,
                anchor,
                vec![Leaf::new(leaf, Vec3::Y, 0.0, FRAC_PI_2)],
                DOOR_FRAMES,
            ),
        }
    }

    /// Override the opening angle (negative swings the other way)
    pub fn with_swing(mut self, open_angle: f32) -> Self {
        for leaf in &mut self.core.leaves {
            leaf.open_angle = leaf.closed_angle + open_angle;
        }
        self
    }
}

impl Lockable for SwingDoor {
    delegate_core!();

    fn toggle_open(&mut self) -> ToggleOutcome {
        toggle_two_way(&mut self.core)
    }
}

/// The massive exit door. It only ever opens, and opening it wins the game.
#[derive(Debug, Clone)]
pub struct ExitDoor {
    core: LockCore,
}

impl ExitDoor {
    pub fn new(id: LockableId, gate: Gate, anchor: Vec3, leaf: MeshHandle) -> Self {
        Self {
            core: LockCore::new(
                id,
                gate,
                anchor,
                vec![Leaf::new(leaf, Vec3::Y, 0.0, FRAC_PI_2)],
                DOOR_FRAMES,
            ),
        }
    }
}

impl Lockable for ExitDoor {
    delegate_core!();

    fn toggle_open(&mut self) -> ToggleOutcome {
        match self.core.state {
            LockState::Locked => ToggleOutcome::Locked,
            LockState::Animating { .. } => ToggleOutcome::Busy,
            LockState::Open => ToggleOutcome::AlreadyOpen,
            LockState::Closed => ToggleOutcome::Started {
                requests: self.core.start(true),
                escape: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ward_core::{ItemKind, PuzzleId};

    fn id(name: &str) -> LockableId {
        LockableId::new(name).unwrap()
    }

    #[test]
    fn test_cupboard_leaves_swing_apart() {
        let mut cupboard = Cupboard::new(
            id("cupboard"),
            Gate::Puzzle(PuzzleId::new("operating_room").unwrap()),
            Vec3::ZERO,
            MeshHandle::new(1),
            MeshHandle::new(2),
        );
        assert_eq!(cupboard.toggle_open(), ToggleOutcome::Locked);

        cupboard.unlock();
        let ToggleOutcome::Started { requests, escape } = cupboard.toggle_open() else {
            panic!("cupboard should start opening");
        };
        assert!(!escape);
        assert_eq!(requests.len(), 2);
        assert_relative_eq!(requests[0].clip.final_angle(), -requests[1].clip.final_angle());
        assert_eq!(requests[0].clip.last_frame(), DOOR_FRAMES);
    }

    #[test]
    fn test_pick_while_animating_is_ignored() {
        let mut door = SwingDoor::new(id("door"), Gate::Item(ItemKind::Key), Vec3::ZERO, MeshHandle::new(3));
        door.unlock();
        assert!(matches!(door.toggle_open(), ToggleOutcome::Started { .. }));
        assert_eq!(door.toggle_open(), ToggleOutcome::Busy);

        assert_eq!(door.finish_animation(), Some(DoorEvent::Opened(id("door"))));
        assert!(door.is_open());

        assert!(matches!(door.toggle_open(), ToggleOutcome::Started { .. }));
        assert_eq!(door.finish_animation(), Some(DoorEvent::Closed(id("door"))));
        assert_eq!(door.state(), LockState::Closed);
    }

    #[test]
    fn test_with_swing() {
        let door = SwingDoor::new(id("door"), Gate::Item(ItemKind::Key), Vec3::ZERO, MeshHandle::new(3))
            .with_swing(-1.0);
        assert_relative_eq!(door.leaves()[0].open_angle, -1.0);
    }

    #[test]
    fn test_exit_door_is_one_shot() {
        let mut exit = ExitDoor::new(id("exit"), Gate::Item(ItemKind::IdCard), Vec3::ZERO, MeshHandle::new(4));
        exit.unlock();

        let ToggleOutcome::Started { escape, .. } = exit.toggle_open() else {
            panic!("exit door should open");
        };
        assert!(escape);
        exit.finish_animation();
        assert_eq!(exit.toggle_open(), ToggleOutcome::AlreadyOpen);
        assert!(exit.is_open());
    }

    #[test]
    fn test_lock_restores_closed_pose() {
        let mut door = SwingDoor::new(id("door"), Gate::Item(ItemKind::Key), Vec3::ZERO, MeshHandle::new(3));
        door.unlock();
        door.toggle_open();
        door.finish_animation();

        let restored = door.lock();
        assert!(door.is_locked());
        assert_eq!(restored.len(), 1);
        assert_relative_eq!(restored[0].closed_angle, 0.0);
    }
}
