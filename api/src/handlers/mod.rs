//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod roulette;

pub use roulette::{
    clear_winners, create_game, get_game, get_participants, get_winners, reset_game, spin,
    update_participants, update_participants_text,
};
