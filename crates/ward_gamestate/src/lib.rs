//! Ward Gamestate - Session orchestration
//!
//! Provides:
//! - Session phases (menu, loading, playing, won, time over) with a
//!   drainable transition history
//! - The escape countdown
//! - A scheduler for deferred one-shot actions

pub mod countdown;
pub mod scheduler;
pub mod state;

pub mod prelude {
    pub use crate::countdown::{Countdown, CountdownEvent};
    pub use crate::scheduler::{Scheduler, TaskId};
    pub use crate::state::{GamePhase, PhaseTransition, Session};
}

pub use prelude::*;
