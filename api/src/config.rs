use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::app::{GameSettings, DEFAULT_LOCK_TIMEOUT, DEFAULT_PARTICIPANTS};
use crate::domain::entities::DEFAULT_MAX_PARTICIPANTS;

/// Where the active game is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File(PathBuf),
    Postgres(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub storage: StorageBackend,
    /// Pool used for new and reset games; empty is allowed
    pub default_participants: Vec<String>,
    pub max_participants: usize,
    pub lock_timeout: Duration,
    /// Per-IP requests per second on mutating routes, 0 disables limiting
    pub spin_rate_limit_per_second: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("STORAGE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "file" => StorageBackend::File(PathBuf::from(
                lookup("STATE_FILE").unwrap_or_else(|| "roulette_state.json".to_string()),
            )),
            "postgres" => StorageBackend::Postgres(
                lookup("DATABASE_URL")
                    .context("DATABASE_URL must be set when STORAGE_BACKEND=postgres")?,
            ),
            other => bail!(
                "Unknown STORAGE_BACKEND '{}' (expected memory, file or postgres)",
                other
            ),
        };

        let default_participants = match lookup("DEFAULT_PARTICIPANTS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_PARTICIPANTS.iter().map(|p| p.to_string()).collect(),
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", 8080)?,
            storage,
            default_participants,
            max_participants: parse_or(&lookup, "MAX_PARTICIPANTS", DEFAULT_MAX_PARTICIPANTS)?,
            lock_timeout: Duration::from_millis(parse_or(
                &lookup,
                "LOCK_TIMEOUT_MS",
                DEFAULT_LOCK_TIMEOUT.as_millis() as u64,
            )?),
            spin_rate_limit_per_second: parse_or(&lookup, "SPIN_RATE_LIMIT_PER_SECOND", 0)?,
        })
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            default_participants: self.default_participants.clone(),
            max_participants: self.max_participants,
            lock_timeout: self.lock_timeout,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}
