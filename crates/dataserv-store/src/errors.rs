//! Error helpers for dataserv-store
//!
//! Store failures surface as `DataservError::Persistence` so the registry
//! sees one error type regardless of backend.

use dataserv_core::errors::DataservError;
pub use dataserv_core::errors::Result;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> DataservError {
    DataservError::Persistence {
        message: format!("Migration {} failed: {}", migration_id, reason),
    }
}

/// Create a checksum mismatch error for an already-applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> DataservError {
    DataservError::Persistence {
        message: format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ),
    }
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> DataservError {
    DataservError::Persistence {
        message: err.to_string(),
    }
}

/// Create an error for a row whose stored timestamp is out of range
pub fn corrupt_timestamp(address: &str, micros: i64) -> DataservError {
    DataservError::Persistence {
        message: format!(
            "Stored timestamp {} for farmer {} is out of range",
            micros, address
        ),
    }
}

/// Map a rusqlite result into the store Result
pub fn map_db<T>(result: std::result::Result<T, rusqlite::Error>) -> Result<T> {
    result.map_err(from_rusqlite)
}
