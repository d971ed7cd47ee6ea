//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and the storage port.

pub mod game_service;
pub mod game_settings;

pub use game_service::{GameService, SpinOutcome};
pub use game_settings::{GameSettings, DEFAULT_LOCK_TIMEOUT, DEFAULT_PARTICIPANTS};
