use chrono::{DateTime, TimeZone, Utc};
use dataserv_core::{
    BtcAddressValidator, FarmerRegistry, FixedClock, InMemoryFarmerRepository,
};
use std::sync::Arc;

/// Valid mainnet addresses (P2PKH, P2PKH, P2SH)
#[allow(dead_code)]
pub const ADDR_A: &str = "1BoatSLRHtKNngkdXEeobR76b53LETtpyT";
#[allow(dead_code)]
pub const ADDR_B: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";
#[allow(dead_code)]
pub const ADDR_C: &str = "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy";

#[allow(dead_code)]
pub fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub type TestRegistry =
    FarmerRegistry<Arc<InMemoryFarmerRepository>, BtcAddressValidator, Arc<FixedClock>>;

/// Registry over a shared in-memory repository and a clock frozen at `t0`
///
/// The repository and clock handles are returned so tests can inspect the
/// store directly and move time forward.
#[allow(dead_code)]
pub fn new_registry(
    t0: DateTime<Utc>,
) -> (TestRegistry, Arc<InMemoryFarmerRepository>, Arc<FixedClock>) {
    let repo = Arc::new(InMemoryFarmerRepository::new());
    let clock = Arc::new(FixedClock::new(t0));
    let registry = FarmerRegistry::new(repo.clone(), BtcAddressValidator::mainnet(), clock.clone());
    (registry, repo, clock)
}
