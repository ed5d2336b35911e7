//! Game configuration
//!
//! Everything tunable lives in one TOML document. Every section is
//! optional; missing values fall back to the stock hospital.
//!
//! # Example
//!
//! ```toml
//! [player]
//! walk_speed = 5.0
//! run_speed = 10.0
//!
//! [bindings]
//! use_door = ["KeyE"]
//! light = ["KeyF"]
//!
//! [interaction]
//! door_range = 10.0
//!
//! [session]
//! time_limit = 600.0
//!
//! [environment]
//! model = "models/hospital.glb"
//! anchor = "Hospital"
//!
//! [[environment.puzzles]]
//! id = "operating_room"
//! text = "How many instruments are on the tray?"
//! answer = "410"
//! unlocks = "operating_cupboard"
//! reward = { type = "grant", item = "card" }
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;
use std::path::Path;
use thiserror::Error;
use ward_core::{Aabb, ItemKind, KeyCode, LightSetup, LockableId, PuzzleId, SceneSetup, WardError};
use ward_player::{LadderConfig, PlayerConfig};
use ward_puzzle::{Gate, PuzzleError, Reward};
use ward_streaming::{Placement, RegionConfig, StreamingError};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value out of range or a dangling reference
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Streamed region rejected
    #[error(transparent)]
    Streaming(#[from] StreamingError),

    /// Puzzle registration rejected
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    /// Malformed core value (bounds, names)
    #[error(transparent)]
    Core(#[from] WardError),
}

/// Result type for configuration
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Keys for the interaction actions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    /// Open the nearest item-gated door
    pub use_door: Vec<KeyCode>,
    /// Toggle the flashlight
    pub light: Vec<KeyCode>,
    /// Dismiss the puzzle prompt
    pub close_prompt: Vec<KeyCode>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            use_door: vec![KeyCode::letter('e')],
            light: vec![KeyCode::letter('f')],
            close_prompt: vec![KeyCode::Escape],
        }
    }
}

/// Interaction tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Horizontal reach of the use key
    pub door_range: f32,
    /// Seconds the prompt stays up after a correct answer
    pub prompt_close_delay: f32,
    /// Seconds between the exit door starting to open and the escape
    pub escape_delay: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            door_range: 10.0,
            prompt_close_delay: 3.0,
            escape_delay: 14.0,
        }
    }
}

/// Session tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Countdown length in seconds
    pub time_limit: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { time_limit: 900.0 }
    }
}

/// Camera and lights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_intensity: f32,
    pub spot_angle: f32,
    pub spot_exponent: f32,
    /// Flashlight beam intensity when on
    pub spot_intensity: f32,
    /// Camera near clip
    pub min_z: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.05,
            spot_angle: FRAC_PI_2,
            spot_exponent: 2.0,
            spot_intensity: 1.5,
            min_z: 0.1,
        }
    }
}

/// A pickable item inside the environment model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPlacement {
    pub kind: ItemKind,
    /// Mesh name in the environment model
    pub mesh: String,
    /// Hidden until a puzzle reveals it
    #[serde(default)]
    pub hidden: bool,
}

/// Concrete lockable type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockableKind {
    /// Two leaves
    Cupboard,
    SwingDoor,
    /// One-shot; opening it wins
    ExitDoor,
}

/// A lockable inside the environment model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockableSpec {
    pub id: LockableId,
    pub kind: LockableKind,
    pub gate: Gate,
    /// Leaf mesh names (two for a cupboard)
    pub leaves: Vec<String>,
    /// Proximity anchor; the first leaf's position when omitted
    #[serde(default)]
    pub position: Option<Vec3>,
    /// Opening angle override for swing doors
    #[serde(default)]
    pub swing: Option<f32>,
}

fn no_reward() -> Reward {
    Reward::Nothing
}

/// A prompt/answer puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleSpec {
    pub id: PuzzleId,
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    pub answer: String,
    #[serde(default)]
    pub unlocks: Option<LockableId>,
    #[serde(default = "no_reward")]
    pub reward: Reward,
}

/// The scene content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Main model, imported once at startup
    pub model: String,
    /// Parent mesh every item and lockable hangs under
    pub anchor: String,
    pub lighting: LightingConfig,
    pub items: Vec<ItemPlacement>,
    pub lockables: Vec<LockableSpec>,
    pub puzzles: Vec<PuzzleSpec>,
    pub regions: Vec<RegionConfig>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let door = |id: &'static str, kind, gate, leaves: &[&str], position: Vec3| LockableSpec {
            id: LockableId::from_static(id),
            kind,
            gate,
            leaves: leaves.iter().map(|s| s.to_string()).collect(),
            position: Some(position),
            swing: None,
        };

        Self {
            model: "models/hospital.glb".to_string(),
            anchor: "Hospital".to_string(),
            lighting: LightingConfig::default(),
            items: vec![
                ItemPlacement {
                    kind: ItemKind::Flashlight,
                    mesh: "flashlight".to_string(),
                    hidden: false,
                },
                ItemPlacement {
                    kind: ItemKind::Key,
                    mesh: "key".to_string(),
                    hidden: true,
                },
                ItemPlacement {
                    kind: ItemKind::IdCard,
                    mesh: "id_card".to_string(),
                    hidden: true,
                },
            ],
            lockables: vec![
                door(
                    "operating_cupboard",
                    LockableKind::Cupboard,
                    Gate::Puzzle(PuzzleId::from_static("operating_room")),
                    &["cupboard_left", "cupboard_right"],
                    Vec3::new(25.0, 0.0, -30.0),
                ),
                door(
                    "problem_door",
                    LockableKind::SwingDoor,
                    Gate::Puzzle(PuzzleId::from_static("problem_door")),
                    &["problem_door"],
                    Vec3::new(10.0, 0.0, 5.0),
                ),
                door(
                    "vault_door",
                    LockableKind::SwingDoor,
                    Gate::Puzzle(PuzzleId::from_static("vault")),
                    &["vault_door"],
                    Vec3::new(-15.0, 0.0, 30.0),
                ),
                door(
                    "security_door",
                    LockableKind::SwingDoor,
                    Gate::Item(ItemKind::Card),
                    &["security_door"],
                    Vec3::new(0.0, 0.0, 20.0),
                ),
                door(
                    "storage_door",
                    LockableKind::SwingDoor,
                    Gate::Item(ItemKind::Key),
                    &["storage_door"],
                    Vec3::new(-20.0, 0.0, -5.0),
                ),
                door(
                    "exit_door",
                    LockableKind::ExitDoor,
                    Gate::Item(ItemKind::IdCard),
                    &["exit_door"],
                    Vec3::new(40.0, 0.0, 40.0),
                ),
            ],
            puzzles: vec![
                PuzzleSpec {
                    id: PuzzleId::from_static("operating_room"),
                    text: "The surgeon left a tally on the tray. What does it read?".to_string(),
                    image: Some("images/operating_tray.png".to_string()),
                    answer: "410".to_string(),
                    unlocks: Some(LockableId::from_static("operating_cupboard")),
                    reward: Reward::Grant(ItemKind::Card),
                },
                PuzzleSpec {
                    id: PuzzleId::from_static("problem_door"),
                    text: "The year the ward was sealed.".to_string(),
                    image: Some("images/plaque.png".to_string()),
                    answer: "1953".to_string(),
                    unlocks: Some(LockableId::from_static("problem_door")),
                    reward: Reward::Reveal(ItemKind::Key),
                },
                PuzzleSpec {
                    id: PuzzleId::from_static("vault"),
                    text: "Four digits are scratched into the patient chart.".to_string(),
                    image: Some("images/chart.png".to_string()),
                    answer: "0614".to_string(),
                    unlocks: Some(LockableId::from_static("vault_door")),
                    reward: Reward::Reveal(ItemKind::IdCard),
                },
            ],
            regions: vec![RegionConfig::new(
                "underground",
                Vec3::new(-30.0, 0.0, 40.0),
                25.0,
                35.0,
            )
            .with_placement(Placement::new("models/underground_props.glb").anchored("Hospital", Vec3::ZERO))
            .with_placement(Placement::new("models/underground_lights.glb"))],
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    /// `None` for a scene without a ladder shaft
    pub ladder: Option<LadderConfig>,
    pub bindings: Bindings,
    pub interaction: InteractionConfig,
    pub session: SessionConfig,
    pub environment: EnvironmentConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            ladder: Some(LadderConfig::default()),
            bindings: Bindings::default(),
            interaction: InteractionConfig::default(),
            session: SessionConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load from the first config file found, falling back to defaults
    pub fn load() -> Self {
        for path in ["ward.toml", "config/ward.toml"] {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path);
                    return config;
                }
                Err(err) => log::warn!("Ignoring {}: {}", path, err),
            }
        }
        log::info!("No config file found, using defaults");
        Self::default()
    }

    /// Load and validate a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges and cross references
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("player.walk_speed", self.player.walk_speed),
            ("player.run_speed", self.player.run_speed),
            ("interaction.door_range", self.interaction.door_range),
            ("session.time_limit", self.session.time_limit),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        if let Some(ladder) = &self.ladder {
            Aabb::new(ladder.bounds.min, ladder.bounds.max)?;
            if ladder.bottom_threshold >= ladder.top_threshold {
                return Err(ConfigError::Invalid(format!(
                    "ladder bottom threshold {} must be below the top {}",
                    ladder.bottom_threshold, ladder.top_threshold
                )));
            }
        }

        for region in &self.environment.regions {
            region.validate()?;
        }

        let env = &self.environment;
        let mut lockables = HashSet::new();
        for spec in &env.lockables {
            if spec.id.as_str().is_empty() {
                return Err(ConfigError::Invalid("lockable with empty id".to_string()));
            }
            if !lockables.insert(&spec.id) {
                return Err(PuzzleError::DuplicateLockable(spec.id.clone()).into());
            }
            let expected = match spec.kind {
                LockableKind::Cupboard => 2,
                LockableKind::SwingDoor | LockableKind::ExitDoor => 1,
            };
            if spec.leaves.len() != expected {
                return Err(ConfigError::Invalid(format!(
                    "{} needs {} leaves, has {}",
                    spec.id,
                    expected,
                    spec.leaves.len()
                )));
            }
        }

        let mut puzzles = HashSet::new();
        for spec in &env.puzzles {
            if spec.id.as_str().is_empty() {
                return Err(ConfigError::Invalid("puzzle with empty id".to_string()));
            }
            if !puzzles.insert(&spec.id) {
                return Err(PuzzleError::DuplicatePuzzle(spec.id.clone()).into());
            }
            if let Some(target) = &spec.unlocks {
                if !lockables.contains(target) {
                    return Err(PuzzleError::UnknownLockable(target.clone()).into());
                }
            }
        }

        for spec in &env.lockables {
            let Gate::Puzzle(puzzle) = &spec.gate else {
                continue;
            };
            let Some(gate) = env.puzzles.iter().find(|p| &p.id == puzzle) else {
                return Err(PuzzleError::UnknownPuzzle(puzzle.clone()).into());
            };
            // Solving the gate must be what opens the lock
            if gate.unlocks.as_ref() != Some(&spec.id) {
                return Err(ConfigError::Invalid(format!(
                    "{} is gated by puzzle {} which unlocks {}",
                    spec.id,
                    puzzle,
                    gate.unlocks.as_ref().map_or("nothing", |id| id.as_str())
                )));
            }
        }
        Ok(())
    }

    /// Camera and lights for the scene bootstrap
    pub fn scene_setup(&self) -> SceneSetup {
        let lighting = &self.environment.lighting;
        SceneSetup {
            camera_position: self.player.spawn,
            camera_pitch: self.player.spawn_pitch,
            camera_yaw: self.player.spawn_yaw,
            ellipsoid: self.player.ellipsoid,
            min_z: lighting.min_z,
            lights: vec![
                LightSetup::Hemispheric {
                    direction: Vec3::Y,
                    intensity: lighting.ambient_intensity,
                },
                LightSetup::Spot {
                    angle: lighting.spot_angle,
                    exponent: lighting.spot_exponent,
                    intensity: 0.0,
                    enabled: false,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_config_is_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert!(config.ladder.is_some());
        assert_eq!(config.environment.lockables.len(), 6);
        assert_eq!(config.environment.puzzles.len(), 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [player]
            walk_speed = 4.0

            [session]
            time_limit = 60.0
            "#,
        )
        .unwrap();
        assert_eq!(config.player.walk_speed, 4.0);
        assert_eq!(config.player.run_speed, 12.0);
        assert_eq!(config.session.time_limit, 60.0);
        assert_eq!(config.interaction.door_range, 10.0);
        assert_eq!(config.environment.anchor, "Hospital");
    }

    #[test]
    fn test_custom_content() {
        let config = GameConfig::from_toml_str(
            r#"
            [bindings]
            use_door = ["KeyG"]

            [environment]
            model = "models/clinic.glb"
            anchor = "Clinic"

            [[environment.items]]
            kind = "id_card"
            mesh = "badge"
            hidden = true

            [[environment.lockables]]
            id = "front"
            kind = "exit_door"
            gate = { item = "id_card" }
            leaves = ["front_door"]
            position = [1.0, 0.0, 2.0]

            [[environment.puzzles]]
            id = "riddle"
            text = "?"
            answer = "7"
            reward = { type = "reveal", item = "id_card" }
            "#,
        )
        .unwrap();
        assert_eq!(config.bindings.use_door, vec![KeyCode::letter('g')]);
        assert_eq!(config.environment.items[0].kind, ItemKind::IdCard);
        assert_eq!(config.environment.lockables[0].gate, Gate::Item(ItemKind::IdCard));
        assert_eq!(config.environment.lockables[0].position, Some(Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(config.environment.puzzles[0].reward, Reward::Reveal(ItemKind::IdCard));
        assert_eq!(config.environment.puzzles[0].unlocks, None);
    }

    #[test]
    fn test_rejects_inverted_radii() {
        let mut config = GameConfig::default();
        config.environment.regions[0].load_radius = 50.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Streaming(StreamingError::InvalidRadii { .. }))
        ));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let mut config = GameConfig::default();
        config.interaction.door_range = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::default();
        config.player.walk_speed = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_dangling_references() {
        let mut config = GameConfig::default();
        config.environment.puzzles[0].unlocks = Some(LockableId::new("nowhere").unwrap());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Puzzle(PuzzleError::UnknownLockable(_)))
        ));

        let mut config = GameConfig::default();
        config.environment.puzzles.remove(2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Puzzle(PuzzleError::UnknownPuzzle(_)))
        ));
    }

    #[test]
    fn test_rejects_gate_unlocking_something_else() {
        let mut config = GameConfig::default();
        let vault = config
            .environment
            .puzzles
            .iter_mut()
            .find(|p| p.id.as_str() == "vault")
            .unwrap();
        vault.unlocks = None;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::default();
        let vault = config
            .environment
            .puzzles
            .iter_mut()
            .find(|p| p.id.as_str() == "vault")
            .unwrap();
        vault.unlocks = Some(LockableId::new("problem_door").unwrap());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_inverted_ladder() {
        let mut config = GameConfig::default();
        if let Some(ladder) = &mut config.ladder {
            std::mem::swap(&mut ladder.bounds.min, &mut ladder.bounds.max);
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Core(WardError::InvertedBounds { .. }))
        ));

        let mut config = GameConfig::default();
        config.ladder = None;
        config.validate().unwrap();
    }

    #[test]
    fn test_cupboard_needs_two_leaves() {
        let mut config = GameConfig::default();
        config.environment.lockables[0].leaves.pop();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::load_from_file("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
