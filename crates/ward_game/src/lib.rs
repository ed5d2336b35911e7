//! Ward Game - Hollow Ward gameplay core
//!
//! Wires the gameplay crates into one [`Game`] driven by the host:
//!
//! ```text
//!            key/pointer events                 frame(dt)
//!   host ──────────────────────▶ ┌──────────┐ ◀──────────── host render loop
//!                                │   Game   │
//!   engine ─ EngineEvent queue ─▶│          │── SceneEngine calls ──▶ engine
//!                                └──────────┘
//!       ┌───────────┬───────────┬──────┴──────┬──────────────┬─────────────┐
//!    player     inventory     puzzles     lockables       streaming     session
//! ```
//!
//! Each frame runs in a fixed order: engine completions, deferred actions,
//! countdown, player and ladder, streaming, camera write-back.

pub mod bootstrap;
pub mod config;
pub mod game;
pub mod headless;
pub mod interaction;
pub mod notice;

pub mod prelude {
    pub use crate::bootstrap::BootstrapReport;
    pub use crate::config::{
        Bindings, ConfigError, EnvironmentConfig, GameConfig, InteractionConfig, ItemPlacement,
        LightingConfig, LockableKind, LockableSpec, PuzzleSpec, SessionConfig,
    };
    pub use crate::game::{DeferredAction, Game};
    pub use crate::headless::{HeadlessEngine, ModelMesh};
    pub use crate::interaction::{DoorUse, PickTarget};
    pub use crate::notice::Notice;
}

pub use prelude::*;
