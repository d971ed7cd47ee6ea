//! In-memory adapter
//!
//! Process-local storage; state is lost on restart.

pub mod game_repo;

pub use game_repo::InMemoryGameRepository;
