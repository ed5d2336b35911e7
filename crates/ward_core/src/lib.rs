//! # ward_core - Hollow Ward Core
//!
//! Primitives shared by every gameplay crate:
//! - **Ids**: typed handles for engine meshes, import tickets and animations,
//!   plus string identities for lockables and puzzles
//! - **Engine seam**: the [`SceneEngine`] trait through which the core talks
//!   to the renderer/collision engine, and the [`EngineEvent`] queue it
//!   answers on
//! - **Input**: physical key identities and the per-frame keyboard state
//! - **Math**: an axis-aligned box and horizontal (XZ) distance
//!
//! Nothing in here knows about puzzles or doors.

pub mod animation;
pub mod engine;
pub mod error;
pub mod id;
pub mod input;
pub mod math;

pub use animation::*;
pub use engine::*;
pub use error::*;
pub use id::*;
pub use input::*;
pub use math::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::animation::{AnimationClip, Keyframe, ANIMATION_FPS};
    pub use crate::engine::{
        event_channel, CollisionWorld, EngineEvent, EventReceiver, EventSender, ImportError,
        ImportedModel, LightSetup, SceneEngine, SceneSetup, Subscription, SubscriptionId,
    };
    pub use crate::error::{Result, WardError};
    pub use crate::id::{AnimationHandle, ImportTicket, ItemKind, LockableId, MeshHandle, PuzzleId};
    pub use crate::input::{KeyCode, KeyboardState};
    pub use crate::math::{horizontal_distance, Aabb};
    pub use glam::Vec3;
}
