//! Farmer registry commands
//!
//! Usage:
//!   dataserv register <ADDR>
//!   dataserv lookup <ADDR>
//!   dataserv ping <ADDR>
//!   dataserv audit <ADDR>

use clap::Args;
use dataserv_core::Result;

use crate::commands::{open_registry, print_json};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct AddressArgs {
    /// Farmer payout address
    pub address: String,
}

/// Registry operation selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmerOp {
    Register,
    Lookup,
    Ping,
    Audit,
}

/// Execute one registry operation and print the resulting record
pub fn execute(op: FarmerOp, args: AddressArgs, config: &Config) -> Result<()> {
    let registry = open_registry(config)?;
    let address = args.address.as_str();

    let farmer = match op {
        FarmerOp::Register => registry.register(address)?,
        FarmerOp::Lookup => registry.lookup(address)?,
        FarmerOp::Ping => registry.record_ping(address)?,
        FarmerOp::Audit => registry.record_audit(address)?,
    };

    print_json(&farmer)
}
