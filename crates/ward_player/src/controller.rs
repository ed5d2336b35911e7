//! First-person player controller

use glam::Vec3;
use serde::{Deserialize, Serialize};
use ward_core::{CollisionWorld, KeyboardState};

use crate::config::{LadderConfig, PlayerConfig};
use crate::ladder::{ClimbBody, LadderFsm, LadderTransition};

/// Movement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementMode {
    Walk,
    Run,
    Climb,
}

impl Default for MovementMode {
    fn default() -> Self {
        Self::Walk
    }
}

/// Player body state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Camera position
    pub position: Vec3,
    /// Look angles (radians)
    pub pitch: f32,
    pub yaw: f32,
    /// Current movement mode
    pub mode: MovementMode,
    /// Whether gravity applied this frame
    pub gravity_enabled: bool,
    /// Collision ellipsoid half-extents
    pub ellipsoid: Vec3,
}

/// Player controller
///
/// Runs once per frame from the game's dispatcher; never fails.
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: PlayerConfig,
    state: PlayerState,
    ladder: Option<LadderFsm>,
    readout: String,
}

impl PlayerController {
    /// Create a controller at the configured spawn
    pub fn new(config: PlayerConfig) -> Self {
        let state = Self::spawn_state(&config);
        let readout = format_readout(state.position);
        Self {
            config,
            state,
            ladder: None,
            readout,
        }
    }

    /// Attach a ladder shaft
    pub fn with_ladder(mut self, ladder: LadderConfig) -> Self {
        self.ladder = Some(LadderFsm::new(ladder));
        self
    }

    fn spawn_state(config: &PlayerConfig) -> PlayerState {
        PlayerState {
            position: config.spawn,
            pitch: config.spawn_pitch,
            yaw: config.spawn_yaw,
            mode: MovementMode::Walk,
            gravity_enabled: true,
            ellipsoid: config.ellipsoid,
        }
    }

    /// Current body state
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Ladder, if one is attached
    pub fn ladder(&self) -> Option<&LadderFsm> {
        self.ladder.as_ref()
    }

    /// Whether the ladder currently owns movement
    pub fn is_on_ladder(&self) -> bool {
        self.ladder.as_ref().map(|l| l.is_on_ladder()).unwrap_or(false)
    }

    /// Display-facing position text, refreshed every update
    pub fn position_readout(&self) -> &str {
        &self.readout
    }

    /// Teleport (used by tests and scripted sequences)
    pub fn set_position(&mut self, position: Vec3) {
        self.state.position = position;
        self.readout = format_readout(position);
    }

    /// Back to spawn, off the ladder
    pub fn reset(&mut self) {
        self.state = Self::spawn_state(&self.config);
        if let Some(ladder) = &mut self.ladder {
            ladder.reset();
        }
        self.readout = format_readout(self.state.position);
    }

    /// Whether the point is inside any free-float zone
    pub fn in_free_float_zone(&self, point: Vec3) -> bool {
        self.config.free_float_zones.iter().any(|z| z.contains(point))
    }

    /// Apply pointer movement to the look angles (ignored on the ladder)
    pub fn look(&mut self, delta_x: f32, delta_y: f32) {
        if self.is_on_ladder() {
            return;
        }
        let sensitivity = self.config.look_sensitivity;
        self.state.yaw += delta_x * sensitivity;
        self.state.pitch = (self.state.pitch + delta_y * sensitivity)
            .clamp(-self.config.max_pitch, self.config.max_pitch);
    }

    /// Run one frame of movement
    pub fn update<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        keys: &KeyboardState,
        delta_time: f32,
    ) -> Option<LadderTransition> {
        let transition = match &mut self.ladder {
            Some(ladder) => ladder.update(
                ClimbBody {
                    position: &mut self.state.position,
                    pitch: &mut self.state.pitch,
                    yaw: &mut self.state.yaw,
                },
                keys,
            ),
            None => None,
        };

        if self.is_on_ladder() {
            self.state.mode = MovementMode::Climb;
            self.state.gravity_enabled = false;
        } else {
            self.walk(world, keys, delta_time);
        }

        self.state.position.y = self.state.position.y.clamp(self.config.floor, self.config.ceiling);
        self.readout = format_readout(self.state.position);
        transition
    }

    fn walk<W: CollisionWorld + ?Sized>(&mut self, world: &W, keys: &KeyboardState, delta_time: f32) {
        let bindings = &self.config.keys;
        let running = keys.any_pressed(&bindings.run);
        self.state.mode = if running { MovementMode::Run } else { MovementMode::Walk };
        let speed = if running { self.config.run_speed } else { self.config.walk_speed };

        let axis = |positive: &[ward_core::KeyCode], negative: &[ward_core::KeyCode]| -> f32 {
            let p = if keys.any_pressed(positive) { 1.0 } else { 0.0 };
            let n = if keys.any_pressed(negative) { 1.0 } else { 0.0 };
            p - n
        };
        let forward_input = axis(&bindings.forward, &bindings.back);
        let strafe_input = axis(&bindings.right, &bindings.left);

        let (sin, cos) = self.state.yaw.sin_cos();
        let forward = Vec3::new(sin, 0.0, cos);
        let right = Vec3::new(cos, 0.0, -sin);
        let direction = (forward * forward_input + right * strafe_input).normalize_or_zero();

        let mut delta = direction * speed * delta_time;

        self.state.gravity_enabled = !self.in_free_float_zone(self.state.position);
        if self.state.gravity_enabled {
            delta.y -= self.config.gravity * delta_time;
        }

        if delta != Vec3::ZERO {
            self.state.position =
                world.move_with_collisions(self.state.position, delta, self.state.ellipsoid);
        }
    }
}

fn format_readout(position: Vec3) -> String {
    format!("X: {:.2} Y: {:.2} Z: {:.2}", position.x, position.y, position.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ward_core::KeyCode;

    use crate::config::FreeFloatZone;

    struct OpenSpace;
    impl CollisionWorld for OpenSpace {}

    /// Flat floor at a fixed height
    struct Floor(f32);
    impl CollisionWorld for Floor {
        fn move_with_collisions(&self, from: Vec3, delta: Vec3, ellipsoid: Vec3) -> Vec3 {
            let mut to = from + delta;
            to.y = to.y.max(self.0 + ellipsoid.y);
            to
        }
    }

    fn controller() -> PlayerController {
        PlayerController::new(
            PlayerConfig::default()
                .with_spawn(Vec3::new(0.0, 10.0, 0.0))
                .with_speeds(5.0, 10.0)
                .with_free_float_zones(Vec::new()),
        )
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut player = controller();
        let keys = KeyboardState::new();

        player.update(&OpenSpace, &keys, 1.0);
        assert!(player.state().gravity_enabled);
        assert_relative_eq!(player.state().position.y, 10.0 - player.config().gravity);
    }

    #[test]
    fn test_vertical_clamp() {
        let mut player = controller();
        let keys = KeyboardState::new();

        for _ in 0..10 {
            player.update(&OpenSpace, &keys, 1.0);
        }
        assert_relative_eq!(player.state().position.y, 0.0);

        player.set_position(Vec3::new(0.0, 80.0, 0.0));
        player.update(&Floor(0.0), &keys, 0.0);
        assert_relative_eq!(player.state().position.y, 50.0);
    }

    #[test]
    fn test_walk_and_run_speeds() {
        let mut player = controller();
        let mut keys = KeyboardState::new();
        keys.press(KeyCode::letter('w'));

        player.update(&Floor(8.2), &keys, 1.0);
        assert_eq!(player.state().mode, MovementMode::Walk);
        assert_relative_eq!(player.state().position.z, 5.0, epsilon = 1e-5);

        keys.press(KeyCode::ShiftLeft);
        player.update(&Floor(8.2), &keys, 1.0);
        assert_eq!(player.state().mode, MovementMode::Run);
        assert_relative_eq!(player.state().position.z, 15.0, epsilon = 1e-5);
    }

    #[test]
    fn test_free_float_zone_suspends_gravity() {
        let mut player = PlayerController::new(
            PlayerConfig::default()
                .with_spawn(Vec3::new(0.0, 10.0, 0.0))
                .with_free_float_zones(vec![FreeFloatZone::new(Vec3::new(0.0, 10.0, 0.0), 3.0)]),
        );
        let keys = KeyboardState::new();

        player.update(&OpenSpace, &keys, 1.0);
        assert!(!player.state().gravity_enabled);
        assert_relative_eq!(player.state().position.y, 10.0);
    }

    #[test]
    fn test_ladder_overrides_walking() {
        let ladder = LadderConfig::default();
        let mut player = controller().with_ladder(ladder.clone());
        player.set_position(Vec3::new(-29.2, 3.0, 14.5));

        let mut keys = KeyboardState::new();
        keys.press(KeyCode::letter('w'));
        keys.press(KeyCode::ArrowUp);

        player.update(&OpenSpace, &keys, 1.0);
        let state = player.state();
        assert_eq!(state.mode, MovementMode::Climb);
        assert!(!state.gravity_enabled);
        assert_relative_eq!(state.position.x, ladder.centerline_x);
        assert_relative_eq!(state.position.z, ladder.centerline_z);
        assert_relative_eq!(state.position.y, 3.0 + ladder.climb_step);
    }

    #[test]
    fn test_look_clamps_pitch() {
        let mut player = controller();
        player.look(100.0, 10_000.0);
        assert_relative_eq!(player.state().pitch, player.config().max_pitch);
        assert_relative_eq!(player.state().yaw, 0.2);
    }

    #[test]
    fn test_readout() {
        let mut player = controller();
        player.set_position(Vec3::new(1.0, 2.5, -3.0));
        assert_eq!(player.position_readout(), "X: 1.00 Y: 2.50 Z: -3.00");
    }
}
