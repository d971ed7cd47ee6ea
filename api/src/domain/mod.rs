//! Domain layer
//!
//! Contains the raffle rules with no knowledge of HTTP or storage.
//! - `entities`: Game, Winner and participant normalization
//! - `ports`: Trait definitions for persistence

pub mod entities;
pub mod ports;
