//! Roulette API Server
//!
//! Raffle store: keeps a participant pool, draws winners at random and
//! records the draw history.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{delete, get, post, put, MethodRouter},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{InMemoryGameRepository, JsonFileGameRepository, PostgresGameRepository};
use app::GameService;
use config::{Config, StorageBackend};
use domain::ports::GameRepository;
use error::AppError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub game_service: Arc<GameService<dyn GameRepository>>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.game_service.health().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: "ok",
    }))
}

/// Pick the storage adapter named by the configuration
async fn connect_storage(config: &Config) -> Result<Arc<dyn GameRepository>> {
    let repo: Arc<dyn GameRepository> = match &config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; game state is lost on restart");
            Arc::new(InMemoryGameRepository::new())
        }
        StorageBackend::File(path) => {
            tracing::info!("Using JSON file storage at {}", path.display());
            tracing::warn!("File storage supports a single API process per state file");
            Arc::new(JsonFileGameRepository::new(path.clone()))
        }
        StorageBackend::Postgres(url) => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(url)
                .await
                .context("Failed to connect to database")?;
            let repo = PostgresGameRepository::new(db);
            repo.ensure_schema()
                .await
                .context("Failed to prepare games table")?;
            tracing::info!("Database connected");
            Arc::new(repo)
        }
    };
    Ok(repo)
}

/// Build the HTTP router over the given state
pub fn build_router(state: AppState) -> Result<Router> {
    // Optional per-IP limit on mutating routes (double-click spins, scripted clients).
    // PeerIpKeyExtractor needs the connect info supplied by `main`.
    let governor_config = match state.config.spin_rate_limit_per_second {
        0 => None,
        per_second => Some(Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(PeerIpKeyExtractor)
                .per_millisecond((1000 / per_second).max(1))
                .burst_size(5)
                .finish()
                .context("Failed to build governor config")?,
        )),
    };
    let limited = |route: MethodRouter<AppState>| match &governor_config {
        Some(config) => route.layer(GovernorLayer {
            config: config.clone(),
        }),
        None => route,
    };

    let app = Router::new()
        // Health check
        .route("/health", get(health))
        .route("/api/", get(health))
        // Game
        .route(
            "/api/roulette/game",
            get(handlers::get_game).merge(limited(post(handlers::create_game))),
        )
        .route(
            "/api/roulette/game/participants",
            limited(put(handlers::update_participants)),
        )
        .route(
            "/api/roulette/game/participants/text",
            limited(put(handlers::update_participants_text)),
        )
        .route(
            "/api/roulette/game/reset",
            limited(delete(handlers::reset_game)),
        )
        .route("/api/roulette/spin", limited(post(handlers::spin)))
        // History and pool views
        .route(
            "/api/roulette/winners",
            get(handlers::get_winners).merge(limited(delete(handlers::clear_winners))),
        )
        .route("/api/roulette/participants", get(handlers::get_participants))
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,roulette_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Roulette API...");

    // Load configuration
    let config = Config::from_env()?;

    // Create adapters and services
    let games = connect_storage(&config).await?;
    let game_service = Arc::new(GameService::new(games, config.game_settings()));

    // Make sure storage answers before accepting traffic
    game_service
        .health()
        .await
        .map_err(|e| anyhow::anyhow!("Storage health check failed: {}", e))?;

    let state = AppState {
        game_service,
        config: config.clone(),
    };
    let app = build_router(state)?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
