//! PostgreSQL adapter for GameRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::adapters::file::STATE_SCHEMA_VERSION;
use crate::domain::entities::{Game, GameId, NewGame, Winner};
use crate::domain::ports::GameRepository;
use crate::entity::games;
use crate::error::DomainError;

const CREATE_GAMES_TABLE: &str = include_str!("../../../migrations/001_create_games.sql");

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// PostgreSQL implementation of GameRepository
pub struct PostgresGameRepository {
    db: DatabaseConnection,
}

impl PostgresGameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the `games` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        self.db
            .execute_unprepared(CREATE_GAMES_TABLE)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl GameRepository for PostgresGameRepository {
    async fn find_active(&self) -> Result<Option<Game>, DomainError> {
        let result = games::Entity::find()
            .filter(games::Column::IsActive.eq(true))
            .order_by_desc(games::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        result.map(Game::try_from).transpose()
    }

    async fn create(&self, game: &NewGame) -> Result<Game, DomainError> {
        let now = Utc::now().fixed_offset();
        let participants = to_json(&game.participants)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        games::Entity::update_many()
            .col_expr(games::Column::IsActive, Expr::value(false))
            .col_expr(games::Column::UpdatedAt, Expr::value(now))
            .filter(games::Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let model = games::ActiveModel {
            id: Set(GameId::new().0),
            participants: Set(participants),
            winners: Set(serde_json::json!([])),
            version: Set(0),
            schema_version: Set(STATE_SCHEMA_VERSION as i32),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        Game::try_from(result)
    }

    async fn save(&self, game: &Game) -> Result<Game, DomainError> {
        let now = Utc::now();
        let next_version = game.version + 1;

        // Compare-and-swap on version: a concurrent writer makes this match zero rows
        let result = games::Entity::update_many()
            .col_expr(
                games::Column::Participants,
                Expr::value(to_json(&game.participants)?),
            )
            .col_expr(games::Column::Winners, Expr::value(to_json(&game.winners)?))
            .col_expr(games::Column::Version, Expr::value(next_version))
            .col_expr(games::Column::UpdatedAt, Expr::value(now.fixed_offset()))
            .filter(games::Column::Id.eq(game.id.0))
            .filter(games::Column::Version.eq(game.version))
            .filter(games::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::Retryable(format!(
                "game {} was modified concurrently (expected version {})",
                game.id, game.version
            )));
        }

        let mut saved = game.clone();
        saved.version = next_version;
        saved.updated_at = now;
        Ok(saved)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.db.ping().await.map_err(db_err)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value)
        .map_err(|e| DomainError::Storage(format!("failed to encode game column: {}", e)))
}

/// Convert SeaORM model to domain entity
impl TryFrom<games::Model> for Game {
    type Error = DomainError;

    fn try_from(model: games::Model) -> Result<Self, Self::Error> {
        let participants: Vec<String> = serde_json::from_value(model.participants)
            .map_err(|e| DomainError::Storage(format!("corrupt participants column: {}", e)))?;
        let winners: Vec<Winner> = serde_json::from_value(model.winners)
            .map_err(|e| DomainError::Storage(format!("corrupt winners column: {}", e)))?;

        Ok(Game {
            id: GameId(model.id),
            participants,
            winners,
            version: model.version,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}
