//! The seam between the gameplay core and the 3D engine
//!
//! The engine (renderer, collision, model parser) is a collaborator the
//! core never looks inside. Synchronous questions (what did this click hit,
//! where is this mesh) are trait calls. Anything asynchronous (a model
//! finished importing, an animation finished playing) comes back as an
//! [`EngineEvent`] on the channel created by [`event_channel`], drained by
//! the frame loop so it never blocks on a load.
//!
//! ```text
//!   ┌──────────────┐  import_model / play_animation   ┌──────────────┐
//!   │   ward core  │ ───────────────────────────────▶ │    engine    │
//!   │  (frame loop)│ ◀─────────────────────────────── │ (renderer,   │
//!   └──────────────┘   EngineEvent over crossbeam     │  collisions) │
//!                                                     └──────────────┘
//! ```

use crossbeam_channel::{Receiver, Sender};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::AnimationClip;
use crate::id::{AnimationHandle, ImportTicket, MeshHandle};

/// Why an import failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    /// Path does not resolve to a model
    #[error("Model not found: {0}")]
    NotFound(String),

    /// Model data could not be parsed
    #[error("Failed to parse model {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// What a successful import produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedModel {
    /// Root meshes of the imported model
    pub meshes: Vec<MeshHandle>,
    /// Names of the animation groups shipped with the model
    pub animation_groups: Vec<String>,
}

/// Asynchronous notifications from the engine
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Import progress, `loaded` of `total` bytes
    ImportProgress {
        ticket: ImportTicket,
        loaded: u64,
        total: u64,
    },
    /// Import finished (successfully or not)
    ModelImported {
        ticket: ImportTicket,
        result: std::result::Result<ImportedModel, ImportError>,
    },
    /// A clip started with `play_animation` reached its end
    AnimationFinished(AnimationHandle),
}

/// Sending half, owned by the engine
pub type EventSender = Sender<EngineEvent>;
/// Receiving half, owned by the game
pub type EventReceiver = Receiver<EngineEvent>;

/// Create the engine -> core event queue
pub fn event_channel() -> (EventSender, EventReceiver) {
    crossbeam_channel::unbounded()
}

/// A light placed at scene setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LightSetup {
    /// Dim fill light
    Hemispheric { direction: Vec3, intensity: f32 },
    /// Spot light that follows the camera (the flashlight beam)
    Spot {
        angle: f32,
        exponent: f32,
        intensity: f32,
        enabled: bool,
    },
}

/// Camera and lighting created once by the scene bootstrap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSetup {
    /// Camera spawn position
    pub camera_position: Vec3,
    /// Initial pitch and yaw (radians)
    pub camera_pitch: f32,
    pub camera_yaw: f32,
    /// Collision ellipsoid half-extents of the player
    pub ellipsoid: Vec3,
    /// Near clip plane
    pub min_z: f32,
    /// Lights to create
    pub lights: Vec<LightSetup>,
}

/// Host event kinds the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subscription {
    KeyDown,
    KeyUp,
    PointerDown,
    PointerMove,
    /// Per-frame render loop callback
    Frame,
}

/// Registration token returned by [`SceneEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Collision-constrained movement, provided by the engine
pub trait CollisionWorld {
    /// Move an ellipsoid from `from` by `delta`, sliding along geometry.
    /// Returns the resulting position.
    fn move_with_collisions(&self, from: Vec3, delta: Vec3, ellipsoid: Vec3) -> Vec3 {
        let _ = ellipsoid;
        from + delta
    }
}

/// Everything the core asks of the 3D engine
pub trait SceneEngine: CollisionWorld {
    /// Create camera and lights
    fn configure_scene(&mut self, setup: &SceneSetup);

    /// Start an asynchronous import; completion arrives as
    /// [`EngineEvent::ModelImported`] with the returned ticket
    fn import_model(&mut self, path: &str) -> ImportTicket;

    /// Look up a mesh by name
    fn find_mesh(&self, name: &str) -> Option<MeshHandle>;

    /// Parent of a mesh in the scene graph
    fn parent_of(&self, mesh: MeshHandle) -> Option<MeshHandle>;

    /// World-space position of a mesh
    fn world_position(&self, mesh: MeshHandle) -> Option<Vec3>;

    /// Ray-cast from screen coordinates into pickable geometry
    fn pick_at(&self, screen_x: f32, screen_y: f32) -> Option<MeshHandle>;

    /// Start a clip on a mesh; completion arrives as
    /// [`EngineEvent::AnimationFinished`]
    fn play_animation(&mut self, target: MeshHandle, clip: &AnimationClip) -> AnimationHandle;

    /// Stop a running clip where it is. No completion event follows.
    fn stop_animation(&mut self, handle: AnimationHandle);

    /// Set a mesh's rotation about a local axis directly
    fn set_rotation(&mut self, mesh: MeshHandle, axis: Vec3, angle: f32);

    /// Show/hide a mesh (hidden meshes are not pickable)
    fn set_enabled(&mut self, mesh: MeshHandle, enabled: bool);

    /// Parent `child` under `parent` at a local offset
    fn attach(&mut self, child: MeshHandle, parent: MeshHandle, offset: Vec3);

    /// Release a mesh and its resources
    fn dispose(&mut self, mesh: MeshHandle);

    /// Flashlight beam
    fn set_spot_light(&mut self, enabled: bool, intensity: f32);

    /// Write back the camera transform
    fn set_camera(&mut self, position: Vec3, pitch: f32, yaw: f32);

    /// Register a host listener
    fn subscribe(&mut self, kind: Subscription) -> SubscriptionId;

    /// Remove a host listener
    fn unsubscribe(&mut self, id: SubscriptionId);
}
