//! Session phases

use serde::{Deserialize, Serialize};

use crate::countdown::{Countdown, CountdownEvent};

/// Session phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start menu
    Menu,
    /// Environment importing
    Loading,
    /// Countdown running
    Playing,
    /// Escaped through the exit door
    Won,
    /// Countdown expired
    TimeOver,
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Menu
    }
}

impl GamePhase {
    /// Won or TimeOver
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::TimeOver)
    }

    /// Whether gameplay input is processed
    pub fn accepts_gameplay_input(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// A recorded phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: GamePhase,
    pub to: GamePhase,
}

/// Phase machine, loading progress and countdown for one game
#[derive(Debug, Clone)]
pub struct Session {
    phase: GamePhase,
    /// 0 to 100
    loading_progress: f32,
    countdown: Countdown,
    pending: Vec<PhaseTransition>,
    history: Vec<PhaseTransition>,
}

impl Session {
    /// Create a session in the menu with a countdown of `time_limit` seconds
    pub fn new(time_limit: f32) -> Self {
        Self {
            phase: GamePhase::Menu,
            loading_progress: 0.0,
            countdown: Countdown::new(time_limit),
            pending: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Loading progress in percent
    pub fn loading_progress(&self) -> f32 {
        self.loading_progress
    }

    fn transition(&mut self, to: GamePhase) {
        let transition = PhaseTransition {
            from: self.phase,
            to,
        };
        log::info!("Session {:?} -> {:?}", transition.from, transition.to);
        self.phase = to;
        self.history.push(transition);
        self.pending.push(transition);
    }

    /// Menu -> Loading
    pub fn begin_loading(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            log::debug!("begin_loading ignored in {:?}", self.phase);
            return false;
        }
        self.loading_progress = 0.0;
        self.transition(GamePhase::Loading);
        true
    }

    /// Record import progress of the main environment
    pub fn set_loading_progress(&mut self, loaded: u64, total: u64) {
        if self.phase != GamePhase::Loading || total == 0 {
            return;
        }
        let percent = (loaded as f64 / total as f64 * 100.0) as f32;
        self.loading_progress = percent.clamp(0.0, 100.0);
    }

    /// Loading -> Playing, starting the countdown
    pub fn finish_loading(&mut self) -> bool {
        if self.phase != GamePhase::Loading {
            log::debug!("finish_loading ignored in {:?}", self.phase);
            return false;
        }
        self.loading_progress = 100.0;
        self.countdown.start();
        self.transition(GamePhase::Playing);
        true
    }

    /// Advance the countdown; moves to TimeOver on expiry
    pub fn tick(&mut self, dt: f32) -> Option<CountdownEvent> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let event = self.countdown.tick(dt)?;
        log::info!("Time is up");
        self.transition(GamePhase::TimeOver);
        Some(event)
    }

    /// Playing -> Won
    pub fn escape(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            log::debug!("escape ignored in {:?}", self.phase);
            return false;
        }
        self.countdown.stop();
        self.transition(GamePhase::Won);
        true
    }

    /// Back to the menu from anywhere
    pub fn restart(&mut self) {
        self.countdown.reset();
        self.loading_progress = 0.0;
        if self.phase != GamePhase::Menu {
            self.transition(GamePhase::Menu);
        }
    }

    /// Drain transitions since the last call
    pub fn drain_transitions(&mut self) -> impl Iterator<Item = PhaseTransition> + '_ {
        self.pending.drain(..)
    }

    /// Every transition so far
    pub fn history(&self) -> &[PhaseTransition] {
        &self.history
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(900.0)
    }
}
