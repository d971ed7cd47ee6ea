//! JSON file adapter
//!
//! Key-value style persistence of the active game in a single JSON document.

pub mod game_repo;

pub use game_repo::{JsonFileGameRepository, STATE_SCHEMA_VERSION};
