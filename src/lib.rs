//! Roast Arena - a real-time aim-and-fire target engine for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, target motion, projectiles, timers)
//! - `arena`: The engine wired to one virtual clock behind the `Hook` lifecycle
//! - `session`: Session/password restore and persistence
//! - `scroll`: Bottom-pinned log hook
//! - `platform`: Browser/headless platform abstraction
//! - `persistence`: Stored session records
//! - `tuning`: Data-driven timing and hit-box balance
//!
//! The browser build adds `web` (the exported hook objects) and `audio`.

pub mod aim;
pub mod animator;
pub mod arena;
pub mod error;
pub mod feedback;
pub mod firing;
pub mod hook;
pub mod persistence;
pub mod platform;
pub mod protocol;
pub mod scroll;
pub mod session;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use arena::Arena;
pub use error::{PayloadError, StorageError};
pub use hook::Hook;
pub use protocol::{HitAttempt, Inbound, Outbound};
pub use scroll::ScrollPin;
pub use session::SessionKeeper;
pub use tuning::Tuning;
