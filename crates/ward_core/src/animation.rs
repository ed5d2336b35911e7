//! Keyframed rotation clips handed to the engine

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Playback rate for every gameplay clip
pub const ANIMATION_FPS: u32 = 30;

/// A single keyframe: rotation angle (radians) about the clip axis at a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: u32,
    pub angle: f32,
}

/// Rotation of a mesh about a local axis, sampled from keyframes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Rotation axis in the mesh's local space
    pub axis: Vec3,
    /// Keyframes, sorted by frame
    pub keyframes: Vec<Keyframe>,
    /// Frames per second
    pub fps: u32,
    /// Whether the clip loops
    pub looping: bool,
}

impl AnimationClip {
    /// Two-key rotation from `from` to `to` over `frames` frames
    pub fn rotation(axis: Vec3, from: f32, to: f32, frames: u32) -> Self {
        Self {
            axis,
            keyframes: vec![
                Keyframe { frame: 0, angle: from },
                Keyframe { frame: frames, angle: to },
            ],
            fps: ANIMATION_FPS,
            looping: false,
        }
    }

    /// Last keyframe index
    pub fn last_frame(&self) -> u32 {
        self.keyframes.last().map(|k| k.frame).unwrap_or(0)
    }

    /// Length in seconds
    pub fn duration(&self) -> f32 {
        if self.fps == 0 {
            return 0.0;
        }
        self.last_frame() as f32 / self.fps as f32
    }

    /// Angle at the end of the clip
    pub fn final_angle(&self) -> f32 {
        self.keyframes.last().map(|k| k.angle).unwrap_or(0.0)
    }

    /// Linearly interpolated angle at a (fractional) frame
    pub fn sample(&self, frame: f32) -> f32 {
        let Some(first) = self.keyframes.first() else {
            return 0.0;
        };
        if frame <= first.frame as f32 {
            return first.angle;
        }
        for pair in self.keyframes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if frame <= b.frame as f32 {
                let span = b.frame.saturating_sub(a.frame).max(1) as f32;
                let t = (frame - a.frame as f32) / span;
                return a.angle + (b.angle - a.angle) * t;
            }
        }
        self.final_angle()
    }
}
