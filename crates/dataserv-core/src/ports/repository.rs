use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::errors::{DataservError, Result};
use crate::model::Farmer;

/// Persistence boundary for farmer records
///
/// `insert_if_absent` must be atomic: of any number of concurrent inserts
/// for one address, exactly one returns `true`.
pub trait FarmerRepository: Send + Sync {
    /// Insert `farmer` unless its address is taken; `false` means taken
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the backing store fails.
    fn insert_if_absent(&self, farmer: &Farmer) -> Result<bool>;

    /// # Errors
    ///
    /// Returns `Persistence` when the backing store fails.
    fn find_by_address(&self, address: &str) -> Result<Option<Farmer>>;

    /// Overwrite the timestamps of an existing record
    ///
    /// # Errors
    ///
    /// Returns `FarmerNotFound` if no record exists, `Persistence` when the
    /// backing store fails.
    fn update(&self, farmer: &Farmer) -> Result<()>;

    /// Set `last_seen` alone and return the stored record
    ///
    /// Must not write `last_audit`, so an audit committed concurrently is
    /// never rolled back by a ping.
    ///
    /// # Errors
    ///
    /// Returns `FarmerNotFound` if no record exists, `Persistence` when the
    /// backing store fails.
    fn touch_seen(&self, address: &str, at: DateTime<Utc>) -> Result<Farmer>;

    /// Set `last_seen` and `last_audit` to `at` and return the stored record
    ///
    /// # Errors
    ///
    /// Returns `FarmerNotFound` if no record exists, `Persistence` when the
    /// backing store fails.
    fn touch_audit(&self, address: &str, at: DateTime<Utc>) -> Result<Farmer>;

    /// Farmers with `last_seen` strictly after `cutoff`, ordered by address
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the backing store fails.
    fn seen_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Farmer>>;
}

impl<R: FarmerRepository + ?Sized> FarmerRepository for std::sync::Arc<R> {
    fn insert_if_absent(&self, farmer: &Farmer) -> Result<bool> {
        (**self).insert_if_absent(farmer)
    }

    fn find_by_address(&self, address: &str) -> Result<Option<Farmer>> {
        (**self).find_by_address(address)
    }

    fn update(&self, farmer: &Farmer) -> Result<()> {
        (**self).update(farmer)
    }

    fn touch_seen(&self, address: &str, at: DateTime<Utc>) -> Result<Farmer> {
        (**self).touch_seen(address, at)
    }

    fn touch_audit(&self, address: &str, at: DateTime<Utc>) -> Result<Farmer> {
        (**self).touch_audit(address, at)
    }

    fn seen_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Farmer>> {
        (**self).seen_since(cutoff)
    }
}

/// Mutex-guarded in-process repository
///
/// Check and insert happen under one lock, which gives the atomic
/// insert-if-absent the registry relies on.
#[derive(Debug, Default)]
pub struct InMemoryFarmerRepository {
    farmers: Mutex<BTreeMap<String, Farmer>>,
}

impl InMemoryFarmerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `f` to the stored record under the lock
    fn modify(&self, address: &str, f: impl FnOnce(&mut Farmer)) -> Result<Farmer> {
        let mut farmers = self.lock()?;
        let farmer = farmers
            .get_mut(address)
            .ok_or_else(|| DataservError::FarmerNotFound {
                address: address.to_string(),
            })?;
        f(farmer);
        Ok(farmer.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Farmer>>> {
        self.farmers.lock().map_err(|_| DataservError::Persistence {
            message: "farmer map lock poisoned".to_string(),
        })
    }
}

impl FarmerRepository for InMemoryFarmerRepository {
    fn insert_if_absent(&self, farmer: &Farmer) -> Result<bool> {
        let mut farmers = self.lock()?;
        if farmers.contains_key(farmer.address()) {
            return Ok(false);
        }
        farmers.insert(farmer.address().to_string(), farmer.clone());
        Ok(true)
    }

    fn find_by_address(&self, address: &str) -> Result<Option<Farmer>> {
        Ok(self.lock()?.get(address).cloned())
    }

    fn update(&self, farmer: &Farmer) -> Result<()> {
        let mut farmers = self.lock()?;
        let slot = farmers
            .get_mut(farmer.address())
            .ok_or_else(|| DataservError::FarmerNotFound {
                address: farmer.address().to_string(),
            })?;
        *slot = farmer.clone();
        Ok(())
    }

    fn touch_seen(&self, address: &str, at: DateTime<Utc>) -> Result<Farmer> {
        self.modify(address, |farmer| farmer.mark_seen(at))
    }

    fn touch_audit(&self, address: &str, at: DateTime<Utc>) -> Result<Farmer> {
        self.modify(address, |farmer| farmer.mark_audited(at))
    }

    fn seen_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Farmer>> {
        Ok(self
            .lock()?
            .values()
            .filter(|f| f.seen_after(cutoff))
            .cloned()
            .collect())
    }
}
