//! Repository layer persisting farmer records to SQLite

pub mod sqlite_repo;

pub use sqlite_repo::SqliteFarmerRepository;
