//! Game configuration
//!
//! Defaults for the initial participant pool and store limits.

use std::time::Duration;

use crate::domain::entities::DEFAULT_MAX_PARTICIPANTS;

/// Participants a fresh or reset game starts with
pub const DEFAULT_PARTICIPANTS: [&str; 6] = [
    "Ana García",
    "Carlos Rodríguez",
    "María López",
    "José Martínez",
    "Laura González",
    "Pablo Sánchez",
];

/// How long a mutating call waits for the game lock before giving up
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(2000);

/// Tunables for `GameService`
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Pool used on first load and on reset. May be empty.
    pub default_participants: Vec<String>,
    pub max_participants: usize,
    pub lock_timeout: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            default_participants: DEFAULT_PARTICIPANTS.iter().map(|p| p.to_string()).collect(),
            max_participants: DEFAULT_MAX_PARTICIPANTS,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}
