//! In-memory adapter for GameRepository

use async_trait::async_trait;
use chrono::Utc;
use std::sync::RwLock;

use crate::domain::entities::{Game, GameId, NewGame};
use crate::domain::ports::GameRepository;
use crate::error::DomainError;

/// In-memory implementation of GameRepository
#[derive(Default)]
pub struct InMemoryGameRepository {
    active: RwLock<Option<Game>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a game
    #[cfg(test)]
    pub fn with_game(self, game: Game) -> Self {
        if let Ok(mut active) = self.active.write() {
            *active = Some(game);
        }
        self
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::Storage("in-memory game store lock poisoned".to_string())
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn find_active(&self) -> Result<Option<Game>, DomainError> {
        let active = self.active.read().map_err(poisoned)?;
        Ok(active.clone())
    }

    async fn create(&self, game: &NewGame) -> Result<Game, DomainError> {
        let now = Utc::now();
        let created = Game {
            id: GameId::new(),
            participants: game.participants.clone(),
            winners: vec![],
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let mut active = self.active.write().map_err(poisoned)?;
        *active = Some(created.clone());
        Ok(created)
    }

    async fn save(&self, game: &Game) -> Result<Game, DomainError> {
        let mut active = self.active.write().map_err(poisoned)?;

        let stored = active
            .as_ref()
            .filter(|stored| stored.id == game.id)
            .ok_or_else(|| {
                DomainError::Retryable(format!("game {} is no longer active", game.id))
            })?;

        if stored.version != game.version {
            return Err(DomainError::Retryable(format!(
                "game {} was modified concurrently (expected version {}, found {})",
                game.id, game.version, stored.version
            )));
        }

        let mut saved = game.clone();
        saved.version += 1;
        saved.updated_at = Utc::now();
        *active = Some(saved.clone());
        Ok(saved)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
