//! HTTP client for the Roulette API
//!
//! Thin typed wrapper over the `/api/roulette` endpoints. The client does not
//! retry game operations; only `health` retries, with exponential backoff.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the Roulette API client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        retryable: bool,
    },
}

impl ClientError {
    /// Whether repeating the same call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Request(e) => e.is_connect() || e.is_timeout(),
            ClientError::Api { retryable, .. } => *retryable,
        }
    }
}

/// Backoff policy for health checks
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

/// HTTP client for communicating with the Roulette API
#[derive(Clone)]
pub struct RouletteClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl RouletteClient {
    /// Create a new client from environment variables
    ///
    /// Optional env vars:
    /// - ROULETTE_API_URL: Base URL of the API (default http://localhost:8080)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("ROULETTE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Self::new(&base_url)
    }

    /// Create a new client with explicit configuration
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current participants and winner history
    pub async fn get_game(&self) -> Result<GameView, ClientError> {
        self.send(self.client.get(self.url("/api/roulette/game")))
            .await
    }

    /// Replace participants from editor text, one name per line
    pub async fn set_participants_text(&self, text: &str) -> Result<GameView, ClientError> {
        self.send(
            self.client
                .put(self.url("/api/roulette/game/participants/text"))
                .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(text.to_string()),
        )
        .await
    }

    /// Replace participants with an explicit list
    pub async fn set_participants(&self, participants: &[String]) -> Result<GameView, ClientError> {
        self.send(
            self.client
                .put(self.url("/api/roulette/game/participants"))
                .json(&ParticipantsRequest { participants }),
        )
        .await
    }

    pub async fn spin(&self) -> Result<SpinView, ClientError> {
        self.send(self.client.post(self.url("/api/roulette/spin")))
            .await
    }

    pub async fn reset_game(&self) -> Result<GameView, ClientError> {
        self.send(self.client.delete(self.url("/api/roulette/game/reset")))
            .await
    }

    pub async fn winners(&self) -> Result<Vec<WinnerView>, ClientError> {
        self.send(self.client.get(self.url("/api/roulette/winners")))
            .await
    }

    pub async fn clear_winners(&self) -> Result<GameView, ClientError> {
        self.send(self.client.delete(self.url("/api/roulette/winners")))
            .await
    }

    /// Liveness of the API and its storage, retried with exponential backoff
    pub async fn health(&self) -> Result<HealthView, ClientError> {
        retry_with_backoff(&self.retry, || {
            self.send::<HealthView>(self.client.get(self.url("/health")))
        })
        .await
    }

    // --- Internal helpers ---

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Turn a non-2xx response into a `ClientError::Api`
fn api_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => ClientError::Api {
            status,
            message: match parsed.details {
                Some(details) => format!("{}: {}", parsed.error, details),
                None => parsed.error,
            },
            retryable: parsed.retryable,
        },
        Err(_) => ClientError::Api {
            status,
            message: format!("API error ({}): {}", status, body),
            retryable: status >= 500,
        },
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of attempts
pub async fn retry_with_backoff<F, Fut, T>(config: &RetryConfig, mut operation: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 1;
    let mut delay = config.initial_delay;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < config.max_attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after error: {}",
                    e
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(config.max_delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

// --- Wire Types ---

#[derive(Debug, Serialize)]
struct ParticipantsRequest<'a> {
    participants: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    retryable: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WinnerView {
    pub name: String,
    pub position: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "totalParticipants")]
    pub total_participants: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameView {
    pub id: String,
    pub participants: Vec<String>,
    pub winners: Vec<WinnerView>,
    pub phase: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpinView {
    pub winner: WinnerView,
    pub remaining_participants: Vec<String>,
    pub total_winners: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthView {
    pub status: String,
    pub version: String,
    pub storage: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_retry(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    fn busy() -> ClientError {
        ClientError::Api {
            status: 409,
            message: "Game is busy".to_string(),
            retryable: true,
        }
    }

    #[test]
    fn test_client_new() {
        let client = RouletteClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = RouletteClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_api_error_with_details() {
        let err = api_error(
            400,
            r#"{"error":"Insufficient participants","details":"At least 2 participants required, 1 available"}"#,
        );
        assert_eq!(
            err.to_string(),
            "Insufficient participants: At least 2 participants required, 1 available"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_api_error_retryable_flag() {
        let err = api_error(503, r#"{"error":"Storage unavailable","retryable":true}"#);
        assert_eq!(err.to_string(), "Storage unavailable");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_api_error_unparseable_body() {
        let err = api_error(502, "Bad Gateway");
        assert!(err.to_string().contains("502"));
        assert!(err.is_retryable());

        assert!(!api_error(404, "not here").is_retryable());
    }

    #[test]
    fn test_participants_request_serialization() {
        let names = vec!["Ana".to_string(), "Carlos".to_string()];
        let json = serde_json::to_string(&ParticipantsRequest {
            participants: &names,
        })
        .unwrap();
        assert_eq!(json, r#"{"participants":["Ana","Carlos"]}"#);
    }

    #[test]
    fn test_spin_view_deserialize() {
        let json = r#"{
            "winner": {"name": "Maria", "position": 1, "timestamp": "2024-05-01T10:00:00Z", "totalParticipants": 3},
            "remaining_participants": ["Ana", "Carlos"],
            "total_winners": 1
        }"#;
        let spin: SpinView = serde_json::from_str(json).unwrap();
        assert_eq!(spin.winner.name, "Maria");
        assert_eq!(spin.winner.total_participants, 3);
        assert_eq!(spin.remaining_participants, vec!["Ana", "Carlos"]);
    }

    #[tokio::test]
    async fn test_retry_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(&fast_retry(4), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(busy())
            } else {
                Ok("up")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "up");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(&fast_retry(3), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(busy())
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retry_on_permanent_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(&fast_retry(5), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(api_error(400, r#"{"error":"Validation error"}"#))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
