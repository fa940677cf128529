//! dataserv store - SQLite persistence for farmer records
//!
//! Provides:
//! - Connection helpers
//! - Embedded, checksummed schema migrations
//! - `SqliteFarmerRepository`, the durable `FarmerRepository`

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use repo::SqliteFarmerRepository;
