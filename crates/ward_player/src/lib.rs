//! Ward Player - First-person movement
//!
//! This crate owns the camera body: position, look angles, walk/run speed,
//! gravity and the ladder that overrides all of them while climbing.
//!
//! # Features
//!
//! - WASD movement relative to yaw, collision resolved by the engine
//! - Run modifier
//! - Gravity with free-float zones that suspend it (stairwells)
//! - Vertical bounds clamp
//! - Ladder state machine with top/bottom dismount snapping
//!
//! # Example
//!
//! ```ignore
//! use ward_player::prelude::*;
//!
//! let mut player = PlayerController::new(PlayerConfig::default())
//!     .with_ladder(LadderConfig::default());
//!
//! // once per frame
//! player.update(&engine, &keys, dt);
//! engine.set_camera(player.state().position, player.state().pitch, player.state().yaw);
//! ```

pub mod config;
pub mod controller;
pub mod ladder;

pub mod prelude {
    pub use crate::config::{FreeFloatZone, LadderConfig, MovementKeys, PlayerConfig};
    pub use crate::controller::{MovementMode, PlayerController, PlayerState};
    pub use crate::ladder::{ClimbBody, LadderFsm, LadderState, LadderTransition};
}

pub use prelude::*;
