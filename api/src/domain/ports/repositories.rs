//! Repository port traits
//!
//! These traits define the interface for game persistence.
//! Implementations are provided by adapters (in-memory, JSON file, PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{Game, NewGame};
use crate::error::DomainError;

/// Repository for the active Game
///
/// Writes are compare-and-swap on `Game::version`: `save` only succeeds when
/// the stored version still equals the version the caller loaded.
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Load the active game, if one has been created
    async fn find_active(&self) -> Result<Option<Game>, DomainError>;

    /// Create a new active game with an empty history.
    /// Any previously active game is deactivated.
    async fn create(&self, game: &NewGame) -> Result<Game, DomainError>;

    /// Persist participants and winners of `game`.
    ///
    /// Fails with `DomainError::Retryable` if the stored version moved on
    /// since `game` was loaded. Returns the game with its new version.
    async fn save(&self, game: &Game) -> Result<Game, DomainError>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
