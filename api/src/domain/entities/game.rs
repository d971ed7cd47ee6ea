//! Game domain entity
//!
//! A single raffle: the entrants still in the draw and the winners drawn so far.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Smallest pool a spin is allowed to draw from
pub const MIN_PARTICIPANTS_TO_SPIN: usize = 2;

/// Unique identifier for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for GameId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a game stands, derived from the size of the participant pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No participants left
    Empty,
    /// One participant left, spinning is not allowed
    SingleLeft,
    /// Two or more participants, ready to spin
    Ready,
}

impl GamePhase {
    pub fn for_pool_size(size: usize) -> Self {
        match size {
            0 => GamePhase::Empty,
            1 => GamePhase::SingleLeft,
            _ => GamePhase::Ready,
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::Empty => write!(f, "empty"),
            GamePhase::SingleLeft => write!(f, "single_left"),
            GamePhase::Ready => write!(f, "ready"),
        }
    }
}

/// A drawn participant. Never modified after the draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub name: String,
    /// 1-based draw sequence number
    pub position: usize,
    pub timestamp: DateTime<Utc>,
    /// Pool size right before this draw
    #[serde(rename = "totalParticipants")]
    pub total_participants: usize,
}

/// The aggregate root: one raffle with its entrants and history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub participants: Vec<String>,
    /// Oldest draw first
    pub winners: Vec<Winner>,
    /// Optimistic concurrency counter, bumped by the repository on each write
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    pub fn phase(&self) -> GamePhase {
        GamePhase::for_pool_size(self.participants.len())
    }

    pub fn can_spin(&self) -> bool {
        self.phase() == GamePhase::Ready
    }

    /// Swap in a new participant list. History is left alone.
    pub fn replace_participants(&mut self, participants: Vec<String>) {
        self.participants = participants;
    }

    /// Draw one participant uniformly at random.
    ///
    /// The drawn entry is removed by index so that only that instance of a
    /// duplicated name leaves the pool. On error the game is untouched.
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Winner, DomainError> {
        let available = self.participants.len();
        if available < MIN_PARTICIPANTS_TO_SPIN {
            return Err(DomainError::InsufficientParticipants {
                required: MIN_PARTICIPANTS_TO_SPIN,
                available,
            });
        }

        let index = rng.gen_range(0..available);
        let winner = Winner {
            name: self.participants[index].clone(),
            position: self.winners.len() + 1,
            timestamp: now,
            total_participants: available,
        };

        self.participants.remove(index);
        self.winners.push(winner.clone());

        Ok(winner)
    }

    /// Back to the initial pool with an empty history
    pub fn reset(&mut self, defaults: &[String]) {
        self.participants = defaults.to_vec();
        self.winners.clear();
    }

    /// Default pool and no history, i.e. what `reset` would produce
    pub fn is_pristine(&self, defaults: &[String]) -> bool {
        self.winners.is_empty() && self.participants == defaults
    }

    pub fn clear_winners(&mut self) {
        self.winners.clear();
    }
}

/// Data needed to create a new game
#[derive(Debug, Clone)]
pub struct NewGame {
    pub participants: Vec<String>,
}
