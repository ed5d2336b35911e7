//! Escape countdown

use serde::{Deserialize, Serialize};

/// Emitted by [`Countdown::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Reached zero. Emitted once per start.
    Expired,
}

/// A countdown that expires exactly once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
    running: bool,
    expired: bool,
}

impl Countdown {
    /// Create a stopped countdown of `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: duration,
            running: false,
            expired: false,
        }
    }

    /// Start from the full duration
    pub fn start(&mut self) {
        self.remaining = self.duration;
        self.running = true;
        self.expired = false;
    }

    /// Freeze where it is
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and rewind
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.running = false;
        self.expired = false;
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_expired(&self) -> bool {
        self.expired
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> Option<CountdownEvent> {
        if !self.running || self.expired {
            return None;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining > 0.0 {
            return None;
        }
        self.running = false;
        self.expired = true;
        Some(CountdownEvent::Expired)
    }

    /// Remaining time as `MM:SS`
    pub fn display(&self) -> String {
        let secs = self.remaining.ceil() as u32;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
