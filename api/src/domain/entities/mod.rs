//! Domain entities
//!
//! Pure domain models representing the raffle.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod game;
pub mod participants;

pub use game::{Game, GameId, GamePhase, NewGame, Winner};
pub use participants::{normalize_participants, validate_participants, DEFAULT_MAX_PARTICIPANTS};
