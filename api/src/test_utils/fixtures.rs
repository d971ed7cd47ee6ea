//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::Utc;
use std::time::Duration;

use crate::app::GameSettings;
use crate::domain::entities::{Game, GameId};

/// Owned participant names from string literals
pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

/// Create a test game with the given participants and no winners
pub fn test_game(participants: &[&str]) -> Game {
    Game {
        id: GameId::new(),
        participants: names(participants),
        winners: vec![],
        version: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Settings with a small default pool and a short lock timeout
pub fn test_settings() -> GameSettings {
    GameSettings {
        default_participants: names(&["Default A", "Default B", "Default C"]),
        max_participants: 100,
        lock_timeout: Duration::from_millis(500),
    }
}
