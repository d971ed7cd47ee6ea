//! Adapters layer
//!
//! Implementations of port traits for the supported storage backends.

pub mod file;
pub mod memory;
pub mod postgres;

pub use file::JsonFileGameRepository;
pub use memory::InMemoryGameRepository;
pub use postgres::PostgresGameRepository;
