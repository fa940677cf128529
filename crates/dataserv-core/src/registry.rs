//! Farmer registry: identity and liveness invariants.
//!
//! ## Invariants
//!
//! - A farmer can only be registered under an address the validator accepts;
//!   a rejected address never reaches the repository.
//! - Registration is decided by the repository's atomic insert-if-absent, so
//!   concurrent registrations of one address produce exactly one success.
//! - `record_audit` stamps `last_seen` and `last_audit` with the same instant.
//! - `record_ping` never writes `last_audit`; concurrent pings and audits
//!   are last-writer-wins per field.

use chrono::{DateTime, Duration, Utc};

use crate::errors::{DataservError, Result};
use crate::model::Farmer;
use crate::ports::{AddressValidator, Clock, FarmerRepository};
use crate::{log_op_end, log_op_error, log_op_start};

/// Registry over an injected repository, address validator, and clock
#[derive(Debug)]
pub struct FarmerRegistry<R, V, C> {
    repo: R,
    validator: V,
    clock: C,
}

impl<R, V, C> FarmerRegistry<R, V, C>
where
    R: FarmerRepository,
    V: AddressValidator,
    C: Clock,
{
    pub fn new(repo: R, validator: V, clock: C) -> Self {
        Self {
            repo,
            validator,
            clock,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Register a new farmer stamped with the current time
    ///
    /// # Errors
    ///
    /// - `InvalidAddress`: the validator rejected `address`
    /// - `DuplicateAddress`: a farmer with `address` already exists
    /// - `Persistence`: repository failure
    pub fn register(&self, address: &str) -> Result<Farmer> {
        let now = self.clock.now();
        self.register_with_times(address, now, now)
    }

    /// Register a farmer with caller-supplied timestamps (backfill, tests)
    ///
    /// # Errors
    ///
    /// Same as [`FarmerRegistry::register`].
    pub fn register_with_times(
        &self,
        address: &str,
        last_seen: DateTime<Utc>,
        last_audit: DateTime<Utc>,
    ) -> Result<Farmer> {
        self.boundary("register", address, || {
            self.ensure_valid(address)?;
            let farmer = Farmer::new(address, last_seen, last_audit);
            if !self.repo.insert_if_absent(&farmer)? {
                return Err(DataservError::DuplicateAddress {
                    address: address.to_string(),
                });
            }
            Ok(farmer)
        })
    }

    /// Fetch a registered farmer
    ///
    /// # Errors
    ///
    /// - `InvalidAddress`: `address` is malformed
    /// - `FarmerNotFound`: nothing is registered under `address`
    /// - `Persistence`: repository failure
    pub fn lookup(&self, address: &str) -> Result<Farmer> {
        self.boundary("lookup", address, || self.lookup_impl(address))
    }

    /// Liveness ping: advance `last_seen` only
    ///
    /// Writes the single field, so a concurrent audit is never undone.
    ///
    /// # Errors
    ///
    /// Same as [`FarmerRegistry::lookup`].
    pub fn record_ping(&self, address: &str) -> Result<Farmer> {
        self.boundary("ping", address, || {
            self.ensure_valid(address)?;
            self.repo.touch_seen(address, self.clock.now())
        })
    }

    /// Completed audit: set `last_seen` and `last_audit` to one instant
    ///
    /// No proof is checked here; the caller decides that an audit passed.
    ///
    /// # Errors
    ///
    /// Same as [`FarmerRegistry::lookup`].
    pub fn record_audit(&self, address: &str) -> Result<Farmer> {
        self.boundary("audit", address, || {
            self.ensure_valid(address)?;
            self.repo.touch_audit(address, self.clock.now())
        })
    }

    /// Farmers seen within `window` of now, ordered by address
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: `window` is negative or reaches past the
    ///   representable time range
    /// - `Persistence`: repository failure
    pub fn online(&self, window: Duration) -> Result<Vec<Farmer>> {
        log_op_start!("online", window_secs = window.num_seconds());
        let start = std::time::Instant::now();

        let result = self
            .online_cutoff(window)
            .and_then(|cutoff| self.repo.seen_since(cutoff));

        match result {
            Ok(farmers) => {
                log_op_end!(
                    "online",
                    duration_ms = start.elapsed().as_millis() as u64,
                    online_count = farmers.len() as u64
                );
                Ok(farmers)
            }
            Err(e) => {
                log_op_error!(
                    "online",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }

    fn online_cutoff(&self, window: Duration) -> Result<DateTime<Utc>> {
        if window < Duration::zero() {
            return Err(DataservError::InvalidInput {
                reason: "online window must not be negative".to_string(),
            });
        }
        let now = self.clock.now();
        now.checked_sub_signed(window)
            .ok_or_else(|| DataservError::InvalidInput {
                reason: "online window reaches before the earliest time".to_string(),
            })
    }

    fn lookup_impl(&self, address: &str) -> Result<Farmer> {
        self.ensure_valid(address)?;
        self.repo
            .find_by_address(address)?
            .ok_or_else(|| DataservError::FarmerNotFound {
                address: address.to_string(),
            })
    }

    fn ensure_valid(&self, address: &str) -> Result<()> {
        if self.validator.is_valid(address) {
            Ok(())
        } else {
            Err(DataservError::InvalidAddress {
                address: address.to_string(),
            })
        }
    }

    /// Wrap one operation in start/end/end_error events
    fn boundary<T>(
        &self,
        op: &'static str,
        address: &str,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        log_op_start!(op, address = address);
        let start = std::time::Instant::now();

        let value = f().map_err(|e| {
            log_op_error!(
                op,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                address = address
            );
            e
        })?;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            address = address
        );
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, InMemoryFarmerRepository};
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn starts_with_one(address: &str) -> bool {
        address.starts_with('1')
    }

    fn registry() -> FarmerRegistry<InMemoryFarmerRepository, fn(&str) -> bool, FixedClock> {
        FarmerRegistry::new(
            InMemoryFarmerRepository::new(),
            starts_with_one as fn(&str) -> bool,
            FixedClock::new(t(1_000)),
        )
    }

    #[test]
    fn test_register_stamps_both_timestamps() {
        let registry = registry();
        let farmer = registry.register("1abc").unwrap();
        assert_eq!(farmer.last_seen(), t(1_000));
        assert_eq!(farmer.last_audit(), t(1_000));
    }

    #[test]
    fn test_register_with_times_backfills() {
        let registry = registry();
        let farmer = registry.register_with_times("1abc", t(5), t(3)).unwrap();
        assert_eq!(registry.lookup("1abc").unwrap(), farmer);
        assert_eq!(farmer.last_audit(), t(3));
    }

    #[test]
    fn test_ping_and_audit_on_unknown_farmer() {
        let registry = registry();
        assert!(matches!(
            registry.record_ping("1nobody"),
            Err(DataservError::FarmerNotFound { .. })
        ));
        assert!(matches!(
            registry.record_audit("bad"),
            Err(DataservError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_negative_online_window_rejected() {
        let registry = registry();
        assert!(matches!(
            registry.online(Duration::seconds(-1)),
            Err(DataservError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_oversized_online_window_rejected() {
        let registry = registry();
        assert!(matches!(
            registry.online(Duration::MAX),
            Err(DataservError::InvalidInput { .. })
        ));
        // Wide but representable windows still work
        assert!(registry.online(Duration::days(365 * 1_000)).unwrap().is_empty());
    }
}
