//! SQLite-backed farmer repository
//!
//! Timestamps are stored as integer microseconds since the Unix epoch, the
//! finest resolution `DateTime<Utc>` round-trips through without loss in
//! an INTEGER column. The address PRIMARY KEY is the uniqueness guarantee;
//! `insert_if_absent` reports a lost race through the affected-row count.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use dataserv_core::errors::{DataservError, Result};
use dataserv_core::model::Farmer;
use dataserv_core::ports::FarmerRepository;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::db;
use crate::errors::{corrupt_timestamp, from_rusqlite, map_db};
use crate::migrations::apply_migrations;

/// Durable `FarmerRepository` over one SQLite connection
///
/// The connection is serialized behind a mutex so the repository can be
/// shared across threads. Cross-process writers are arbitrated by SQLite's
/// own locking, bounded by the busy timeout set in [`db::configure`].
pub struct SqliteFarmerRepository {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteFarmerRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteFarmerRepository").finish_non_exhaustive()
    }
}

impl SqliteFarmerRepository {
    /// Wrap an already-migrated connection
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (or create) the database at `path` and bring its schema current
    ///
    /// # Errors
    ///
    /// Returns `Io` if the parent directory cannot be created, `Persistence`
    /// if the database cannot be opened or migrated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = db::open(path)?;
        apply_migrations(&mut conn)?;
        Ok(Self::new(conn))
    }

    /// Fresh migrated in-memory database
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if SQLite cannot allocate or migrate it.
    pub fn in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory()?;
        apply_migrations(&mut conn)?;
        Ok(Self::new(conn))
    }

    /// Number of registered farmers
    ///
    /// # Errors
    ///
    /// Returns `Persistence` on query failure.
    pub fn count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let n: i64 = map_db(conn.query_row("SELECT COUNT(*) FROM farmers", [], |row| {
            row.get(0)
        }))?;
        Ok(n.max(0) as u64)
    }

    /// Run a single-row timestamp `UPDATE … RETURNING` for `address`
    ///
    /// Each statement names only the columns it owns, so concurrent writers
    /// of different fields never overwrite each other.
    fn touch(&self, sql: &str, address: &str, at: DateTime<Utc>) -> Result<Farmer> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                sql,
                rusqlite::params![address, at.timestamp_micros()],
                FarmerRow::read,
            )
            .optional()
            .map_err(from_rusqlite)?;

        row.ok_or_else(|| DataservError::FarmerNotFound {
            address: address.to_string(),
        })?
        .into_farmer()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DataservError::Persistence {
            message: "connection lock poisoned".to_string(),
        })
    }
}

/// Raw row before timestamp conversion
struct FarmerRow {
    address: String,
    last_seen: i64,
    last_audit: i64,
}

impl FarmerRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            address: row.get(0)?,
            last_seen: row.get(1)?,
            last_audit: row.get(2)?,
        })
    }

    fn into_farmer(self) -> Result<Farmer> {
        let last_seen = from_micros(&self.address, self.last_seen)?;
        let last_audit = from_micros(&self.address, self.last_audit)?;
        Ok(Farmer::new(self.address, last_seen, last_audit))
    }
}

fn from_micros(address: &str, micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| corrupt_timestamp(address, micros))
}

impl FarmerRepository for SqliteFarmerRepository {
    fn insert_if_absent(&self, farmer: &Farmer) -> Result<bool> {
        let conn = self.lock()?;
        let inserted = conn
            .execute(
                "INSERT INTO farmers (address, last_seen, last_audit)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(address) DO NOTHING",
                rusqlite::params![
                    farmer.address(),
                    farmer.last_seen().timestamp_micros(),
                    farmer.last_audit().timestamp_micros(),
                ],
            )
            .map_err(from_rusqlite)?;

        Ok(inserted == 1)
    }

    fn find_by_address(&self, address: &str) -> Result<Option<Farmer>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT address, last_seen, last_audit FROM farmers WHERE address = ?",
                [address],
                FarmerRow::read,
            )
            .optional()
            .map_err(from_rusqlite)?;

        row.map(FarmerRow::into_farmer).transpose()
    }

    fn update(&self, farmer: &Farmer) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE farmers SET last_seen = ?2, last_audit = ?3 WHERE address = ?1",
                rusqlite::params![
                    farmer.address(),
                    farmer.last_seen().timestamp_micros(),
                    farmer.last_audit().timestamp_micros(),
                ],
            )
            .map_err(from_rusqlite)?;

        if changed == 0 {
            return Err(DataservError::FarmerNotFound {
                address: farmer.address().to_string(),
            });
        }
        Ok(())
    }

    fn touch_seen(&self, address: &str, at: DateTime<Utc>) -> Result<Farmer> {
        self.touch(
            "UPDATE farmers SET last_seen = ?2 WHERE address = ?1
             RETURNING address, last_seen, last_audit",
            address,
            at,
        )
    }

    fn touch_audit(&self, address: &str, at: DateTime<Utc>) -> Result<Farmer> {
        self.touch(
            "UPDATE farmers SET last_seen = ?2, last_audit = ?2 WHERE address = ?1
             RETURNING address, last_seen, last_audit",
            address,
            at,
        )
    }

    fn seen_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Farmer>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT address, last_seen, last_audit FROM farmers
                 WHERE last_seen > ? ORDER BY address",
            )
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([cutoff.timestamp_micros()], FarmerRow::read)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter().map(FarmerRow::into_farmer).collect()
    }
}
