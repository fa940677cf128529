// Integration tests for SqliteFarmerRepository behind FarmerRegistry

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{DateTime, Duration, TimeZone, Utc};
use dataserv_core::{
    BtcAddressValidator, DataservError, FarmerRegistry, FarmerRepository, FixedClock,
};
use dataserv_store::SqliteFarmerRepository;
use tempfile::TempDir;

const ADDR_A: &str = "1BoatSLRHtKNngkdXEeobR76b53LETtpyT";
const ADDR_B: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

type Registry = FarmerRegistry<Arc<SqliteFarmerRepository>, BtcAddressValidator, Arc<FixedClock>>;

fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn registry_over(repo: Arc<SqliteFarmerRepository>, clock: Arc<FixedClock>) -> Registry {
    FarmerRegistry::new(repo, BtcAddressValidator::mainnet(), clock)
}

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("farmers.db");
    let clock = Arc::new(FixedClock::new(t(1_700_000_000)));

    {
        let repo = Arc::new(SqliteFarmerRepository::open(&db_path).unwrap());
        let registry = registry_over(repo, clock.clone());
        registry.register(ADDR_A).unwrap();
        clock.advance(Duration::seconds(30));
        registry.record_audit(ADDR_A).unwrap();
    }

    let repo = Arc::new(SqliteFarmerRepository::open(&db_path).unwrap());
    let farmer = registry_over(repo, clock).lookup(ADDR_A).unwrap();
    assert_eq!(farmer.last_seen(), t(1_700_000_030));
    assert_eq!(farmer.last_audit(), t(1_700_000_030));
}

#[test]
fn test_sub_second_timestamps_round_trip() {
    let repo = SqliteFarmerRepository::in_memory().unwrap();
    let seen = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
    let farmer = dataserv_core::Farmer::new(ADDR_A, seen, t(1_600_000_000));

    repo.insert_if_absent(&farmer).unwrap();
    assert_eq!(repo.find_by_address(ADDR_A).unwrap(), Some(farmer));
}

#[test]
fn test_duplicate_registration_keeps_first_record() {
    let clock = Arc::new(FixedClock::new(t(100)));
    let repo = Arc::new(SqliteFarmerRepository::in_memory().unwrap());
    let registry = registry_over(repo.clone(), clock.clone());

    registry.register(ADDR_A).unwrap();
    clock.advance(Duration::seconds(50));
    let err = registry.register(ADDR_A).unwrap_err();

    assert_eq!(
        err,
        DataservError::DuplicateAddress {
            address: ADDR_A.to_string()
        }
    );
    assert_eq!(registry.lookup(ADDR_A).unwrap().last_seen(), t(100));
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn test_concurrent_registration_single_winner_on_disk() {
    const THREADS: usize = 8;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("farmers.db");
    SqliteFarmerRepository::open(&db_path).unwrap();

    let clock = Arc::new(FixedClock::new(t(1_000)));
    let barrier = Arc::new(Barrier::new(THREADS));

    // One connection per thread so SQLite itself arbitrates the race
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let repo = Arc::new(SqliteFarmerRepository::open(&db_path).unwrap());
            let registry = registry_over(repo, clock.clone());
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.register(ADDR_B)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let dups = results
        .iter()
        .filter(|r| matches!(r, Err(DataservError::DuplicateAddress { .. })))
        .count();

    assert_eq!(wins, 1);
    assert_eq!(dups, THREADS - 1);
    assert_eq!(SqliteFarmerRepository::open(&db_path).unwrap().count().unwrap(), 1);
}

#[test]
fn test_online_window_over_sqlite() {
    let clock = Arc::new(FixedClock::new(t(0)));
    let repo = Arc::new(SqliteFarmerRepository::in_memory().unwrap());
    let registry = registry_over(repo, clock.clone());

    registry.register(ADDR_B).unwrap();
    clock.set(t(600));
    registry.register(ADDR_A).unwrap();
    clock.set(t(900));

    let online: Vec<_> = registry
        .online(Duration::minutes(10))
        .unwrap()
        .into_iter()
        .map(|f| f.address().to_string())
        .collect();
    assert_eq!(online, vec![ADDR_A.to_string()]);

    let everyone = registry.online(Duration::minutes(15) + Duration::seconds(1)).unwrap();
    assert_eq!(everyone.len(), 2);
    // Ordered by address
    assert_eq!(everyone[0].address(), ADDR_B);
}
