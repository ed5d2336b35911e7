//! The lockable object contract and the state machine shared by every door

use glam::Vec3;
use serde::{Deserialize, Serialize};
use ward_core::{AnimationClip, ItemKind, LockableId, MeshHandle, PuzzleId};

/// What keeps a lockable locked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    /// Solving the puzzle unlocks it
    Puzzle(PuzzleId),
    /// Using the item near it unlocks it (and uses the item up)
    Item(ItemKind),
}

/// Lock/open state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockState {
    Locked,
    /// Unlocked and closed
    Closed,
    /// Unlocked and open
    Open,
    /// Swinging; `opening` tells which way
    Animating { opening: bool },
}

/// A hinged piece of geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub mesh: MeshHandle,
    /// Hinge axis in mesh space
    pub axis: Vec3,
    /// Rotation when closed; restored on lock
    pub closed_angle: f32,
    /// Rotation when fully open
    pub open_angle: f32,
}

impl Leaf {
    /// Leaf hinged about `axis`, closed at `closed_angle`
    pub fn new(mesh: MeshHandle, axis: Vec3, closed_angle: f32, open_angle: f32) -> Self {
        Self {
            mesh,
            axis,
            closed_angle,
            open_angle,
        }
    }

    /// Clip swinging this leaf open or shut over `frames`
    pub fn swing(&self, opening: bool, frames: u32) -> AnimationClip {
        let (from, to) = if opening {
            (self.closed_angle, self.open_angle)
        } else {
            (self.open_angle, self.closed_angle)
        };
        AnimationClip::rotation(self.axis, from, to, frames)
    }
}

/// An animation the registry must hand to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRequest {
    pub target: MeshHandle,
    pub clip: AnimationClip,
}

/// Result of a toggle attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// Animations to play; `escape` when this opening wins the game
    Started {
        requests: Vec<AnimationRequest>,
        escape: bool,
    },
    /// Still locked
    Locked,
    /// Already swinging
    Busy,
    /// One-way door already open
    AlreadyOpen,
}

/// Emitted when an animation settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoorEvent {
    Opened(LockableId),
    Closed(LockableId),
}

/// Capability set of every cupboard, door and vault
pub trait Lockable: std::fmt::Debug {
    /// Identity
    fn id(&self) -> &LockableId;

    /// What unlocks it
    fn gate(&self) -> &Gate;

    /// Reference point for proximity checks
    fn anchor(&self) -> Vec3;

    /// Animated geometry
    fn leaves(&self) -> &[Leaf];

    /// Current state
    fn state(&self) -> LockState;

    /// Re-lock, snapping shut. Returns leaves to restore to their closed angle.
    fn lock(&mut self) -> Vec<Leaf>;

    /// Unlock. Returns true if it was locked.
    fn unlock(&mut self) -> bool;

    /// Start opening or closing
    fn toggle_open(&mut self) -> ToggleOutcome;

    /// All clips reported finished
    fn finish_animation(&mut self) -> Option<DoorEvent>;

    /// Whether fully open
    fn is_open(&self) -> bool {
        self.state() == LockState::Open
    }

    /// Whether locked
    fn is_locked(&self) -> bool {
        self.state() == LockState::Locked
    }

    /// Whether swinging
    fn is_animating(&self) -> bool {
        matches!(self.state(), LockState::Animating { .. })
    }
}

/// State machine and geometry shared by the concrete door types
#[derive(Debug, Clone)]
pub struct LockCore {
    pub id: LockableId,
    pub gate: Gate,
    pub anchor: Vec3,
    pub leaves: Vec<Leaf>,
    pub state: LockState,
    pub frames: u32,
}

impl LockCore {
    /// Create a locked core
    pub fn new(id: LockableId, gate: Gate, anchor: Vec3, leaves: Vec<Leaf>, frames: u32) -> Self {
        Self {
            id,
            gate,
            anchor,
            leaves,
            state: LockState::Locked,
            frames,
        }
    }

    pub fn lock(&mut self) -> Vec<Leaf> {
        self.state = LockState::Locked;
        self.leaves.clone()
    }

    pub fn unlock(&mut self) -> bool {
        if self.state != LockState::Locked {
            return false;
        }
        self.state = LockState::Closed;
        log::info!("{} unlocked", self.id);
        true
    }

    /// Begin a swing in the given direction
    pub fn start(&mut self, opening: bool) -> Vec<AnimationRequest> {
        self.state = LockState::Animating { opening };
        self.leaves
            .iter()
            .map(|leaf| AnimationRequest {
                target: leaf.mesh,
                clip: leaf.swing(opening, self.frames),
            })
            .collect()
    }

    pub fn finish(&mut self) -> Option<DoorEvent> {
        match self.state {
            LockState::Animating { opening: true } => {
                self.state = LockState::Open;
                Some(DoorEvent::Opened(self.id.clone()))
            }
            LockState::Animating { opening: false } => {
                self.state = LockState::Closed;
                Some(DoorEvent::Closed(self.id.clone()))
            }
            _ => None,
        }
    }
}
