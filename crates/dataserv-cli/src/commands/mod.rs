//! Subcommand implementations

pub mod contract;
pub mod farmer;
pub mod online;

use std::sync::Arc;

use dataserv_core::{BtcAddressValidator, FarmerRegistry, Result, SystemClock};
use dataserv_store::SqliteFarmerRepository;
use serde::Serialize;

use crate::config::Config;

pub type CliRegistry =
    FarmerRegistry<Arc<SqliteFarmerRepository>, BtcAddressValidator, SystemClock>;

/// Open the configured database and wrap it in a registry
pub fn open_registry(config: &Config) -> Result<CliRegistry> {
    let repo = Arc::new(SqliteFarmerRepository::open(&config.db_path)?);
    let validator = if config.allow_testnet {
        BtcAddressValidator::with_testnet()
    } else {
        BtcAddressValidator::mainnet()
    };
    Ok(FarmerRegistry::new(repo, validator, SystemClock))
}

/// Pretty-print `value` as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
