//! Player and ladder configuration

use glam::Vec3;
use serde::{Deserialize, Serialize};
use ward_core::{Aabb, KeyCode};

/// Keys driving normal (non-ladder) movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementKeys {
    pub forward: Vec<KeyCode>,
    pub back: Vec<KeyCode>,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    /// Held to switch from walk to run speed
    pub run: Vec<KeyCode>,
}

impl Default for MovementKeys {
    fn default() -> Self {
        Self {
            forward: vec![KeyCode::letter('w')],
            back: vec![KeyCode::letter('s')],
            left: vec![KeyCode::letter('a')],
            right: vec![KeyCode::letter('d')],
            run: vec![KeyCode::ShiftLeft, KeyCode::ShiftRight],
        }
    }
}

/// A sphere in which gravity is suspended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeFloatZone {
    pub center: Vec3,
    pub radius: f32,
}

impl FreeFloatZone {
    /// Create a zone
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Strictly-inside test
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance(self.center) < self.radius
    }
}

/// Player controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Spawn position
    pub spawn: Vec3,
    /// Spawn look angles (radians)
    pub spawn_pitch: f32,
    pub spawn_yaw: f32,
    /// Walk speed (units per second)
    pub walk_speed: f32,
    /// Run speed (units per second)
    pub run_speed: f32,
    /// Fall speed while gravity is enabled (units per second)
    pub gravity: f32,
    /// Lowest allowed camera height
    pub floor: f32,
    /// Highest allowed camera height
    pub ceiling: f32,
    /// Collision ellipsoid half-extents
    pub ellipsoid: Vec3,
    /// Radians per pixel of pointer movement
    pub look_sensitivity: f32,
    /// Pitch clamp (radians, symmetric)
    pub max_pitch: f32,
    /// Movement key bindings
    pub keys: MovementKeys,
    /// Gravity-free spots (stairwells)
    pub free_float_zones: Vec<FreeFloatZone>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, 2.0, -10.0),
            spawn_pitch: 0.0,
            spawn_yaw: 0.0,
            walk_speed: 6.0,
            run_speed: 12.0,
            gravity: 9.0,
            floor: 0.0,
            ceiling: 50.0,
            ellipsoid: Vec3::new(1.0, 1.8, 1.0),
            look_sensitivity: 0.002,
            max_pitch: 1.4,
            keys: MovementKeys::default(),
            free_float_zones: vec![
                FreeFloatZone::new(Vec3::new(12.0, 5.0, -20.0), 4.0),
                FreeFloatZone::new(Vec3::new(12.0, 15.0, -20.0), 4.0),
            ],
        }
    }
}

impl PlayerConfig {
    /// Set spawn position
    pub fn with_spawn(mut self, spawn: Vec3) -> Self {
        self.spawn = spawn;
        self
    }

    /// Set walk and run speed
    pub fn with_speeds(mut self, walk: f32, run: f32) -> Self {
        self.walk_speed = walk;
        self.run_speed = run;
        self
    }

    /// Replace the free-float zones
    pub fn with_free_float_zones(mut self, zones: Vec<FreeFloatZone>) -> Self {
        self.free_float_zones = zones;
        self
    }
}

/// Ladder shaft definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    /// Shaft volume; entering it starts climbing
    pub bounds: Aabb,
    /// X/Z the climber is pinned to
    pub centerline_x: f32,
    pub centerline_z: f32,
    /// Height change per frame while a climb key is held
    pub climb_step: f32,
    /// Reaching this height dismounts at the top
    pub top_threshold: f32,
    /// Reaching this height dismounts at the bottom
    pub bottom_threshold: f32,
    pub top_anchor: Vec3,
    pub top_exit_offset: Vec3,
    pub bottom_anchor: Vec3,
    pub bottom_exit_offset: Vec3,
    /// Forced look angles while climbing
    pub climb_pitch: f32,
    pub climb_yaw: f32,
    /// Look angles after a dismount
    pub neutral_pitch: f32,
    pub neutral_yaw: f32,
    pub up_keys: Vec<KeyCode>,
    pub down_keys: Vec<KeyCode>,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            bounds: Aabb::from_center_half_extents(
                Vec3::new(-30.0, 10.0, 15.0),
                Vec3::new(1.0, 10.0, 1.0),
            ),
            centerline_x: -30.0,
            centerline_z: 15.0,
            climb_step: 0.15,
            top_threshold: 18.0,
            bottom_threshold: 0.5,
            top_anchor: Vec3::new(-30.0, 18.5, 15.0),
            top_exit_offset: Vec3::new(0.0, 1.5, 3.0),
            bottom_anchor: Vec3::new(-30.0, 0.0, 15.0),
            bottom_exit_offset: Vec3::new(0.0, 1.8, -3.0),
            climb_pitch: -0.6,
            climb_yaw: 0.0,
            neutral_pitch: 0.0,
            neutral_yaw: std::f32::consts::PI,
            up_keys: vec![KeyCode::ArrowUp],
            down_keys: vec![KeyCode::ArrowDown],
        }
    }
}

impl LadderConfig {
    /// Where a top dismount lands
    pub fn top_exit(&self) -> Vec3 {
        self.top_anchor + self.top_exit_offset
    }

    /// Where a bottom dismount lands
    pub fn bottom_exit(&self) -> Vec3 {
        self.bottom_anchor + self.bottom_exit_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exits_leave_the_shaft() {
        let ladder = LadderConfig::default();
        assert!(!ladder.bounds.contains_point(ladder.top_exit()));
        assert!(!ladder.bounds.contains_point(ladder.bottom_exit()));
        assert!(ladder.bottom_threshold < ladder.top_threshold);
    }

    #[test]
    fn test_free_float_zone_is_strict() {
        let zone = FreeFloatZone::new(Vec3::ZERO, 2.0);
        assert!(zone.contains(Vec3::new(1.9, 0.0, 0.0)));
        assert!(!zone.contains(Vec3::new(2.0, 0.0, 0.0)));
    }
}
