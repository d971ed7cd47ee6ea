//! JSON file adapter for GameRepository
//!
//! The whole game lives in one document:
//!
//! ```json
//! { "schema_version": 1, "game": { "id": "...", "version": 3,
//!   "participants": ["Ana"], "winners": [{ "name": "Maria", ... }], ... } }
//! ```
//!
//! Writes go to a sibling temp file which is then renamed over the original,
//! so a reader never sees a half-written document.
//!
//! Single process only. The version check runs under an in-process lock, so
//! two API processes sharing one state file can both pass it and lose an
//! update. Use the postgres backend when running more than one instance.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::domain::entities::{Game, GameId, NewGame};
use crate::domain::ports::GameRepository;
use crate::error::DomainError;

/// Layout version written into every state file
pub const STATE_SCHEMA_VERSION: u32 = 1;

/// On-disk document
#[derive(Debug, Serialize, Deserialize)]
pub struct StateFile {
    pub schema_version: u32,
    pub game: Option<Game>,
}

/// JSON file implementation of GameRepository
pub struct JsonFileGameRepository {
    path: PathBuf,
    /// Serializes read-compare-write cycles within this process only
    io_lock: Mutex<()>,
}

impl JsonFileGameRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn read_state(&self) -> Result<Option<Game>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::Storage(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let state: StateFile = serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::Storage(format!("corrupt state file {}: {}", self.path.display(), e))
        })?;

        if state.schema_version > STATE_SCHEMA_VERSION {
            return Err(DomainError::Storage(format!(
                "state file schema version {} is newer than supported version {}",
                state.schema_version, STATE_SCHEMA_VERSION
            )));
        }

        Ok(state.game)
    }

    async fn write_state(&self, game: &Game) -> Result<(), DomainError> {
        let state = StateFile {
            schema_version: STATE_SCHEMA_VERSION,
            game: Some(game.clone()),
        };
        let bytes = serde_json::to_vec_pretty(&state)
            .map_err(|e| DomainError::Storage(format!("failed to encode game state: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Storage(e.to_string()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| DomainError::Storage(format!("failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            DomainError::Storage(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.path.display(), version = game.version, "Game state written");
        Ok(())
    }
}

#[async_trait]
impl GameRepository for JsonFileGameRepository {
    async fn find_active(&self) -> Result<Option<Game>, DomainError> {
        let _guard = self.io_lock.lock().await;
        self.read_state().await
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

        let _guard = self.io_lock.lock().await;
        self.write_state(&created).await?;
        Ok(created)
    }

    async fn save(&self, game: &Game) -> Result<Game, DomainError> {
        let _guard = self.io_lock.lock().await;

        let stored = self.read_state().await?;
        match stored {
            Some(stored) if stored.id == game.id && stored.version == game.version => {}
            Some(stored) => {
                return Err(DomainError::Retryable(format!(
                    "game {} was modified concurrently (expected version {}, found {} v{})",
                    game.id, game.version, stored.id, stored.version
                )))
            }
            None => {
                return Err(DomainError::Retryable(format!(
                    "game {} is no longer stored",
                    game.id
                )))
            }
        }

        let mut saved = game.clone();
        saved.version += 1;
        saved.updated_at = Utc::now();
        self.write_state(&saved).await?;
        Ok(saved)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let _guard = self.io_lock.lock().await;
        self.read_state().await.map(|_| ())
    }
}
