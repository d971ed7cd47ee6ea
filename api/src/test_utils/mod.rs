//! Test utilities
//!
//! Manual mock repositories and test fixtures for unit testing.
//!
//! The in-memory adapter doubles as the happy-path fake; the mocks here
//! simulate outages, failed writes and slow storage.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
