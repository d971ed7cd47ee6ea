//! PostgreSQL adapters
//!
//! Implementation of the game repository using SeaORM and PostgreSQL.

pub mod game_repo;

#[cfg(test)]
mod integration_tests;

pub use game_repo::PostgresGameRepository;
