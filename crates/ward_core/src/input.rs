//! Keyboard input model
//!
//! Keys are identified by physical position (the browser `KeyboardEvent.code`
//! naming: `KeyW`, `ShiftLeft`, `ArrowUp`), not by the produced character,
//! so layouts do not change the controls.

use core::fmt;
use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, WardError};

/// Physical key identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// Letter key, stored uppercase (`KeyW` -> `Letter('W')`)
    Letter(char),
    /// Top-row digit key
    Digit(u8),
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl KeyCode {
    /// Letter key helper, case-insensitive
    pub fn letter(c: char) -> Self {
        Self::Letter(c.to_ascii_uppercase())
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(c) => write!(f, "Key{}", c),
            Self::Digit(d) => write!(f, "Digit{}", d),
            Self::Space => f.write_str("Space"),
            Self::Enter => f.write_str("Enter"),
            Self::Escape => f.write_str("Escape"),
            Self::Backspace => f.write_str("Backspace"),
            Self::Tab => f.write_str("Tab"),
            Self::ShiftLeft => f.write_str("ShiftLeft"),
            Self::ShiftRight => f.write_str("ShiftRight"),
            Self::ControlLeft => f.write_str("ControlLeft"),
            Self::ControlRight => f.write_str("ControlRight"),
            Self::ArrowUp => f.write_str("ArrowUp"),
            Self::ArrowDown => f.write_str("ArrowDown"),
            Self::ArrowLeft => f.write_str("ArrowLeft"),
            Self::ArrowRight => f.write_str("ArrowRight"),
        }
    }
}

impl std::str::FromStr for KeyCode {
    type Err = WardError;

    fn from_str(s: &str) -> Result<Self> {
        let named = match s {
            "Space" => Some(Self::Space),
            "Enter" => Some(Self::Enter),
            "Escape" => Some(Self::Escape),
            "Backspace" => Some(Self::Backspace),
            "Tab" => Some(Self::Tab),
            "ShiftLeft" => Some(Self::ShiftLeft),
            "ShiftRight" => Some(Self::ShiftRight),
            "ControlLeft" => Some(Self::ControlLeft),
            "ControlRight" => Some(Self::ControlRight),
            "ArrowUp" => Some(Self::ArrowUp),
            "ArrowDown" => Some(Self::ArrowDown),
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            _ => None,
        };
        if let Some(key) = named {
            return Ok(key);
        }

        if let Some(rest) = s.strip_prefix("Key") {
            let mut chars = rest.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if c.is_ascii_alphabetic() {
                    return Ok(Self::letter(c));
                }
            }
        }

        if let Some(rest) = s.strip_prefix("Digit") {
            if let Ok(d) = rest.parse::<u8>() {
                if d <= 9 {
                    return Ok(Self::Digit(d));
                }
            }
        }

        Err(WardError::UnknownKey(s.to_string()))
    }
}

impl Serialize for KeyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Which keys are currently held
///
/// Written by raw key events between frames, read once per frame by the
/// player controller and ladder.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Create an empty keyboard state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; returns true if the key was not already held
    pub fn press(&mut self, key: KeyCode) -> bool {
        self.pressed.insert(key)
    }

    /// Record a key release
    pub fn release(&mut self, key: KeyCode) {
        self.pressed.remove(&key);
    }

    /// Check a single key
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Check whether any of the keys is held
    pub fn any_pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.pressed.contains(k))
    }

    /// Release everything (focus lost, restart)
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Number of held keys
    pub fn held_count(&self) -> usize {
        self.pressed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_codes() {
        assert_eq!("KeyW".parse::<KeyCode>(), Ok(KeyCode::Letter('W')));
        assert_eq!("Keyq".parse::<KeyCode>(), Ok(KeyCode::Letter('Q')));
        assert_eq!("ShiftLeft".parse::<KeyCode>(), Ok(KeyCode::ShiftLeft));
        assert_eq!("Digit4".parse::<KeyCode>(), Ok(KeyCode::Digit(4)));
        assert!("Digit12".parse::<KeyCode>().is_err());
        assert!("KeyWW".parse::<KeyCode>().is_err());
        assert!("Hyper".parse::<KeyCode>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for key in [KeyCode::letter('e'), KeyCode::Digit(0), KeyCode::ArrowDown] {
            assert_eq!(key.to_string().parse::<KeyCode>(), Ok(key));
        }
    }

    #[test]
    fn test_keyboard_state() {
        let mut keys = KeyboardState::new();
        assert!(keys.press(KeyCode::letter('w')));
        assert!(!keys.press(KeyCode::letter('w')));
        assert!(keys.is_pressed(KeyCode::Letter('W')));
        assert!(keys.any_pressed(&[KeyCode::ArrowUp, KeyCode::Letter('W')]));

        keys.release(KeyCode::Letter('W'));
        assert!(!keys.is_pressed(KeyCode::Letter('W')));
        assert_eq!(keys.held_count(), 0);
    }
}
