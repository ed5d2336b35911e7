//! Ward Puzzle - Puzzle gating and lockable objects
//!
//! Every cupboard, door and vault is a small state machine behind the
//! [`Lockable`] trait. A lockable is gated either by a puzzle (pick it to
//! see the prompt, answer correctly to unlock) or by an item (stand near it
//! holding the item and press use).
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐ submit ┌──────────────┐ Solved{reward, unlock} ┌──────────────────┐
//! │ PromptSession │ ─────▶ │  PuzzleBook  │ ─────────────────────▶ │ LockableRegistry │
//! └───────────────┘        └──────────────┘                        │  Box<dyn Lockable>│
//!                                                                  └────────┬─────────┘
//!                                              play_animation / finished    │
//!                                                                  ┌────────▼─────────┐
//!                                                                  │   SceneEngine    │
//!                                                                  └──────────────────┘
//! ```
//!
//! # States
//!
//! ```text
//! Locked ──unlock──▶ Closed ──toggle──▶ Animating ──finish──▶ Open
//!                      ▲                                       │
//!                      └──────finish◀── Animating ◀──toggle────┘
//! ```
//!
//! Picks while `Animating` are ignored. [`ExitDoor`] only ever goes forward.

pub mod doors;
pub mod error;
pub mod lockable;
pub mod prompt;
pub mod puzzle;
pub mod registry;

pub mod prelude {
    pub use crate::doors::{Cupboard, ExitDoor, SwingDoor, DOOR_FRAMES};
    pub use crate::error::{PuzzleError, Result};
    pub use crate::lockable::{
        AnimationRequest, DoorEvent, Gate, Leaf, LockState, Lockable, ToggleOutcome,
    };
    pub use crate::prompt::{PromptSession, RETRY_MESSAGE, SUCCESS_MESSAGE};
    pub use crate::puzzle::{Puzzle, PuzzleBook, PuzzlePrompt, Reward, SubmitOutcome};
    pub use crate::registry::LockableRegistry;
}

pub use prelude::*;
