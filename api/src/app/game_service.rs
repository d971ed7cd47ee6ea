//! Game service
//!
//! The store operations behind the roulette: load, replace participants,
//! spin, reset. Every write goes through a single lock so that a draw and
//! its history entry are persisted as one step.

use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, MutexGuard};

use super::game_settings::GameSettings;
use crate::domain::entities::{
    normalize_participants, validate_participants, Game, NewGame, Winner,
};
use crate::domain::ports::GameRepository;
use crate::error::{AppError, DomainError};

/// Result of a successful spin
#[derive(Debug, Clone)]
pub struct SpinOutcome {
    pub winner: Winner,
    pub remaining_participants: Vec<String>,
    pub total_winners: usize,
}

/// Service owning the active game
pub struct GameService<GR>
where
    GR: GameRepository + ?Sized,
{
    games: Arc<GR>,
    settings: GameSettings,
    /// Single-writer lock for the active game. It owns the draw RNG.
    writer: Mutex<StdRng>,
}

impl<GR> GameService<GR>
where
    GR: GameRepository + ?Sized,
{
    pub fn new(games: Arc<GR>, settings: GameSettings) -> Self {
        Self::with_rng(games, settings, StdRng::from_entropy())
    }

    /// Build with a specific generator, e.g. a seeded one
    pub fn with_rng(games: Arc<GR>, settings: GameSettings, rng: StdRng) -> Self {
        Self {
            games,
            settings,
            writer: Mutex::new(rng),
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Current participants and full winner history.
    ///
    /// The first call against empty storage creates a game from the default pool.
    pub async fn get_game(&self) -> Result<Game, AppError> {
        if let Some(game) = self.games.find_active().await? {
            return Ok(game);
        }

        let _writer = self.lock().await?;
        Ok(self.load_or_create().await?)
    }

    /// Replace the participant list wholesale. Winners are kept.
    pub async fn set_participants(&self, participants: Vec<String>) -> Result<Game, AppError> {
        let participants = validate_participants(participants, self.settings.max_participants)?;

        let _writer = self.lock().await?;
        let mut game = self.load_or_create().await?;
        game.replace_participants(participants);
        let saved = self.games.save(&game).await?;

        tracing::info!(
            game_id = %saved.id,
            participants = saved.participants.len(),
            phase = %saved.phase(),
            "Participants replaced"
        );
        Ok(saved)
    }

    /// Normalize editor text (one name per line) and replace the participant list
    pub async fn set_participants_text(&self, raw: &str) -> Result<Game, AppError> {
        let participants = normalize_participants(raw, self.settings.max_participants)?;
        self.set_participants(participants).await
    }

    /// Draw a winner, remove them from the pool and append them to the history
    pub async fn spin(&self) -> Result<SpinOutcome, AppError> {
        let mut rng = self.lock().await?;
        let mut game = self.load_or_create().await?;

        let winner = game.draw(&mut *rng, Utc::now())?;
        let saved = self.games.save(&game).await?;

        tracing::info!(
            game_id = %saved.id,
            winner = %winner.name,
            position = winner.position,
            pool = winner.total_participants,
            "Winner drawn"
        );

        Ok(SpinOutcome {
            winner,
            remaining_participants: saved.participants,
            total_winners: saved.winners.len(),
        })
    }

    /// Restore the default pool and clear the history.
    ///
    /// A game already in its initial state is returned as stored, without a write.
    pub async fn reset_game(&self) -> Result<Game, AppError> {
        let _writer = self.lock().await?;
        let mut game = self.load_or_create().await?;
        if game.is_pristine(&self.settings.default_participants) {
            return Ok(game);
        }

        game.reset(&self.settings.default_participants);
        let saved = self.games.save(&game).await?;

        tracing::info!(game_id = %saved.id, "Game reset");
        Ok(saved)
    }

    /// Start a new game with the given participants, retiring the current one
    pub async fn create_game(&self, participants: Vec<String>) -> Result<Game, AppError> {
        let participants = validate_participants(participants, self.settings.max_participants)?;

        let _writer = self.lock().await?;
        let game = self.games.create(&NewGame { participants }).await?;

        tracing::info!(
            game_id = %game.id,
            participants = game.participants.len(),
            "New game created"
        );
        Ok(game)
    }

    /// Drop the winner history, keep the participants
    pub async fn clear_winners(&self) -> Result<Game, AppError> {
        let _writer = self.lock().await?;
        let mut game = self.load_or_create().await?;
        game.clear_winners();
        Ok(self.games.save(&game).await?)
    }

    pub async fn list_winners(&self) -> Result<Vec<Winner>, AppError> {
        Ok(self
            .games
            .find_active()
            .await?
            .map(|game| game.winners)
            .unwrap_or_default())
    }

    pub async fn list_participants(&self) -> Result<Vec<String>, AppError> {
        Ok(self
            .games
            .find_active()
            .await?
            .map(|game| game.participants)
            .unwrap_or_default())
    }

    /// Check that storage answers
    pub async fn health(&self) -> Result<(), AppError> {
        Ok(self.games.ping().await?)
    }

    async fn lock(&self) -> Result<MutexGuard<'_, StdRng>, DomainError> {
        tokio::time::timeout(self.settings.lock_timeout, self.writer.lock())
            .await
            .map_err(|_| {
                tracing::warn!(
                    timeout_ms = self.settings.lock_timeout.as_millis() as u64,
                    "Timed out waiting for game lock"
                );
                DomainError::Retryable(format!(
                    "another operation is in progress; gave up after {} ms",
                    self.settings.lock_timeout.as_millis()
                ))
            })
    }

    /// Must be called with the writer lock held
    async fn load_or_create(&self) -> Result<Game, DomainError> {
        if let Some(game) = self.games.find_active().await? {
            return Ok(game);
        }

        let game = self
            .games
            .create(&NewGame {
                participants: self.settings.default_participants.clone(),
            })
            .await?;
        tracing::info!(game_id = %game.id, "Created initial game");
        Ok(game)
    }
}
