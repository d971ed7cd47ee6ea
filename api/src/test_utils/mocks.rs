//! Mock implementations of port traits
//!
//! These wrap or replace the in-memory repository to inject failures
//! and latency that tests can assert against.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub use crate::adapters::InMemoryGameRepository;
use crate::domain::entities::{Game, NewGame};
use crate::domain::ports::GameRepository;
use crate::error::DomainError;

// ============================================================================
// Failing Game Repository
// ============================================================================

/// Storage that is always down
pub struct FailingGameRepository;

fn offline() -> DomainError {
    DomainError::Storage("storage offline".to_string())
}

#[async_trait]
impl GameRepository for FailingGameRepository {
    async fn find_active(&self) -> Result<Option<Game>, DomainError> {
        Err(offline())
    }

    async fn create(&self, _game: &NewGame) -> Result<Game, DomainError> {
        Err(offline())
    }

    async fn save(&self, _game: &Game) -> Result<Game, DomainError> {
        Err(offline())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Err(offline())
    }
}

// ============================================================================
// Flaky Save Game Repository
// ============================================================================

/// In-memory storage whose first `save` fails
pub struct FlakySaveGameRepository {
    inner: InMemoryGameRepository,
    failures_left: AtomicUsize,
}

impl FlakySaveGameRepository {
    pub fn new(game: Game) -> Self {
        Self {
            inner: InMemoryGameRepository::new().with_game(game),
            failures_left: AtomicUsize::new(1),
        }
    }
}

#[async_trait]
impl GameRepository for FlakySaveGameRepository {
    async fn find_active(&self) -> Result<Option<Game>, DomainError> {
        self.inner.find_active().await
    }

    async fn create(&self, game: &NewGame) -> Result<Game, DomainError> {
        self.inner.create(game).await
    }

    async fn save(&self, game: &Game) -> Result<Game, DomainError> {
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(DomainError::Storage("write failed".to_string()));
        }
        self.inner.save(game).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.inner.ping().await
    }
}

// ============================================================================
// Slow Game Repository
// ============================================================================

/// In-memory storage that takes `delay` to answer every read
pub struct SlowGameRepository {
    inner: InMemoryGameRepository,
    delay: Duration,
}

impl SlowGameRepository {
    pub fn new(game: Game, delay: Duration) -> Self {
        Self {
            inner: InMemoryGameRepository::new().with_game(game),
            delay,
        }
    }
}

#[async_trait]
impl GameRepository for SlowGameRepository {
    async fn find_active(&self) -> Result<Option<Game>, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_active().await
    }

    async fn create(&self, game: &NewGame) -> Result<Game, DomainError> {
        self.inner.create(game).await
    }

    async fn save(&self, game: &Game) -> Result<Game, DomainError> {
        self.inner.save(game).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.inner.ping().await
    }
}
