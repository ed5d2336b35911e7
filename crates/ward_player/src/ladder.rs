//! Ladder climbing state machine
//!
//! ```text
//!            enter shaft volume
//!   ┌─────┐ ───────────────────▶ ┌──────────┐
//!   │ Off │                      │ Climbing │  up/down: Y ± step, forced look
//!   └─────┘ ◀─────────────────── └──────────┘  at a threshold: snap to exit
//!            leave shaft volume
//! ```
//!
//! While climbing the ladder owns the body: X/Z are pinned to the
//! centerline, gravity is off and horizontal speed is zero.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use ward_core::KeyboardState;

use crate::config::LadderConfig;

/// Ladder state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LadderState {
    Off,
    Climbing,
}

impl Default for LadderState {
    fn default() -> Self {
        Self::Off
    }
}

/// What changed during one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderTransition {
    Mounted,
    DismountedTop,
    DismountedBottom,
    /// Left the volume without using a threshold
    Left,
}

/// Body fields the ladder reads and overrides
#[derive(Debug)]
pub struct ClimbBody<'a> {
    pub position: &'a mut Vec3,
    pub pitch: &'a mut f32,
    pub yaw: &'a mut f32,
}

/// The ladder state machine
#[derive(Debug, Clone)]
pub struct LadderFsm {
    config: LadderConfig,
    state: LadderState,
}

impl LadderFsm {
    /// Create a ladder, initially not climbing
    pub fn new(config: LadderConfig) -> Self {
        Self {
            config,
            state: LadderState::Off,
        }
    }

    /// Current state
    pub fn state(&self) -> LadderState {
        self.state
    }

    /// Whether the player is on the ladder
    pub fn is_on_ladder(&self) -> bool {
        self.state == LadderState::Climbing
    }

    /// Ladder definition
    pub fn config(&self) -> &LadderConfig {
        &self.config
    }

    /// Force back to `Off` (restart)
    pub fn reset(&mut self) {
        self.state = LadderState::Off;
    }

    /// Run one frame. Returns the transition that happened, if any.
    pub fn update(&mut self, mut body: ClimbBody<'_>, keys: &KeyboardState) -> Option<LadderTransition> {
        let inside = self.config.bounds.contains_point(*body.position);

        let mut transition = None;
        match (self.state, inside) {
            (LadderState::Off, false) => return None,
            (LadderState::Off, true) => {
                self.state = LadderState::Climbing;
                transition = Some(LadderTransition::Mounted);
                log::debug!("Mounted ladder at {:?}", body.position);
            }
            (LadderState::Climbing, false) => {
                self.state = LadderState::Off;
                return Some(LadderTransition::Left);
            }
            (LadderState::Climbing, true) => {}
        }

        self.pin(body.position);

        let up = keys.any_pressed(&self.config.up_keys);
        let down = keys.any_pressed(&self.config.down_keys);

        let dismount = if up && !down {
            *body.pitch = self.config.climb_pitch;
            *body.yaw = self.config.climb_yaw;
            body.position.y = (body.position.y + self.config.climb_step).min(self.config.top_threshold);
            (body.position.y >= self.config.top_threshold).then(|| {
                *body.position = self.config.top_exit();
                LadderTransition::DismountedTop
            })
        } else if down && !up {
            *body.pitch = self.config.climb_pitch;
            *body.yaw = self.config.climb_yaw;
            body.position.y = (body.position.y - self.config.climb_step).max(self.config.bottom_threshold);
            (body.position.y <= self.config.bottom_threshold).then(|| {
                *body.position = self.config.bottom_exit();
                LadderTransition::DismountedBottom
            })
        } else {
            None
        };

        if let Some(exit) = dismount {
            *body.pitch = self.config.neutral_pitch;
            *body.yaw = self.config.neutral_yaw;
            log::debug!("{:?} at {:?}", exit, body.position);

            // An exit inside the shaft would remount next frame
            if !self.config.bounds.contains_point(*body.position) {
                self.state = LadderState::Off;
            } else {
                self.pin(body.position);
            }
            return Some(exit);
        }

        transition
    }

    fn pin(&self, position: &mut Vec3) {
        position.x = self.config.centerline_x;
        position.z = self.config.centerline_z;
    }
}
