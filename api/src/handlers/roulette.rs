//! Roulette handlers
//!
//! Endpoints for reading and mutating the active game.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::SpinOutcome;
use crate::domain::entities::{Game, GamePhase, Winner};
use crate::error::AppError;
use crate::AppState;

/// Request body carrying a full participant list
#[derive(Debug, Deserialize)]
pub struct ParticipantsRequest {
    pub participants: Vec<String>,
}

/// Snapshot of the active game
#[derive(Debug, Serialize, Deserialize)]
pub struct GameResponse {
    pub id: String,
    pub participants: Vec<String>,
    /// Oldest draw first
    pub winners: Vec<Winner>,
    pub phase: GamePhase,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        let phase = game.phase();
        Self {
            id: game.id.to_string(),
            participants: game.participants,
            winners: game.winners,
            phase,
            version: game.version,
            created_at: game.created_at,
            updated_at: game.updated_at,
        }
    }
}

/// Response body for a spin
#[derive(Debug, Serialize, Deserialize)]
pub struct SpinResponse {
    pub winner: Winner,
    pub remaining_participants: Vec<String>,
    pub total_winners: usize,
}

impl From<SpinOutcome> for SpinResponse {
    fn from(outcome: SpinOutcome) -> Self {
        Self {
            winner: outcome.winner,
            remaining_participants: outcome.remaining_participants,
            total_winners: outcome.total_winners,
        }
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// GET /api/roulette/game
pub async fn get_game(State(state): State<AppState>) -> Result<Json<GameResponse>, AppError> {
    let game = state.game_service.get_game().await?;
    Ok(Json(game.into()))
}

/// POST /api/roulette/game
///
/// Start a new game with the given participants. The current game is retired.
pub async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<ParticipantsRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, AppError> {
    let request = json_body(payload)?;
    let game = state
        .game_service
        .create_game(request.participants)
        .await?;
    Ok(Json(game.into()))
}

/// PUT /api/roulette/game/participants
pub async fn update_participants(
    State(state): State<AppState>,
    payload: Result<Json<ParticipantsRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, AppError> {
    let request = json_body(payload)?;
    let game = state
        .game_service
        .set_participants(request.participants)
        .await?;
    Ok(Json(game.into()))
}

/// PUT /api/roulette/game/participants/text
///
/// Plain-text body, one participant per line. Blank lines are ignored.
pub async fn update_participants_text(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<GameResponse>, AppError> {
    let game = state.game_service.set_participants_text(&body).await?;
    Ok(Json(game.into()))
}

/// POST /api/roulette/spin
pub async fn spin(State(state): State<AppState>) -> Result<Json<SpinResponse>, AppError> {
    let outcome = state.game_service.spin().await?;
    Ok(Json(outcome.into()))
}

/// GET /api/roulette/winners
pub async fn get_winners(State(state): State<AppState>) -> Result<Json<Vec<Winner>>, AppError> {
    Ok(Json(state.game_service.list_winners().await?))
}

/// DELETE /api/roulette/winners
pub async fn clear_winners(
    State(state): State<AppState>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state.game_service.clear_winners().await?;
    Ok(Json(game.into()))
}

/// GET /api/roulette/participants
pub async fn get_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.game_service.list_participants().await?))
}

/// DELETE /api/roulette/game/reset
pub async fn reset_game(State(state): State<AppState>) -> Result<Json<GameResponse>, AppError> {
    let game = state.game_service.reset_game().await?;
    Ok(Json(game.into()))
}
