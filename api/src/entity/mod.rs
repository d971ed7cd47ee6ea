//! SeaORM entities
//!
//! Row models for the PostgreSQL adapter. Domain code never sees these.

pub mod games;
