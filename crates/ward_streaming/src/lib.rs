//! Ward Streaming - Proximity-based content streaming
//!
//! Heavy rooms are split into [`StreamedRegion`]s. Each frame the camera
//! distance to every region center is checked:
//!
//! ```text
//!            distance <= load_radius                  all tickets settled
//! Unloaded ──────────────────────────▶ Loading ─────────────────────────▶ Loaded
//!    ▲                                    │ nothing attached                 │
//!    │                                    ▼                                  │
//!    └──────── distance > unload ───── Failed                                │
//!    └──────────────────────── distance > unload_radius (dispose all) ◀──────┘
//! ```
//!
//! `load_radius < unload_radius` is enforced at construction, so a camera
//! hovering at a boundary never thrashes.
//!
//! Imports are asynchronous. Completions come back through
//! [`RegionStreamer::on_import`]; completions nobody is waiting for any more
//! are disposed.

pub mod error;
pub mod region;
pub mod streamer;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude {
    pub use crate::error::{Result, StreamingError};
    pub use crate::region::{Placement, RegionConfig, RegionEvent, RegionState, StreamedRegion};
    pub use crate::streamer::RegionStreamer;
}

pub use prelude::*;
