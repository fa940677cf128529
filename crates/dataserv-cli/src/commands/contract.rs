//! Contract commands
//!
//! Usage:
//!   dataserv contract <ADDR> [--byte-size N]
//!   dataserv verify-contract --seed <HEX> --byte-size <N> --digest <HEX>

use clap::Args;
use dataserv_core::{
    recompute_digest, ContentDigest, ContractGenerator, DataservError, Result, Seed,
};
use serde::Serialize;

use crate::commands::{open_registry, print_json};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ContractArgs {
    /// Registered farmer the contract is issued to
    pub address: String,

    /// Virtual file size in bytes (defaults to the configured size)
    #[arg(long)]
    pub byte_size: Option<u64>,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Contract seed, hex encoded
    #[arg(long)]
    pub seed: String,

    #[arg(long)]
    pub byte_size: u64,

    /// Expected digest (file_hash), hex encoded
    #[arg(long)]
    pub digest: String,
}

#[derive(Debug, Serialize)]
struct VerifyOutcome {
    valid: bool,
    file_hash: ContentDigest,
}

/// Issue a contract to a registered farmer
pub fn execute(args: ContractArgs, config: &Config) -> Result<()> {
    let registry = open_registry(config)?;
    registry.lookup(&args.address)?;

    let generator = ContractGenerator::system().with_default_byte_size(config.byte_size)?;
    let contract = match args.byte_size {
        Some(size) => generator.generate_with_size(&args.address, size)?,
        None => generator.generate(&args.address)?,
    };

    print_json(&contract)
}

/// Regenerate the stream locally and compare against the expected digest
///
/// Prints the recomputed digest either way; a mismatch fails the command.
pub fn execute_verify(args: VerifyArgs) -> Result<()> {
    if args.byte_size == 0 {
        return Err(DataservError::InvalidInput {
            reason: "byte size must be positive".to_string(),
        });
    }
    let seed = Seed::from_hex(&args.seed)?;
    let expected = ContentDigest::from_hex(&args.digest)?;

    let actual = recompute_digest(&seed, args.byte_size);
    let valid = actual == expected;
    print_json(&VerifyOutcome {
        valid,
        file_hash: actual,
    })?;

    if !valid {
        return Err(DataservError::InvalidInput {
            reason: format!("digest mismatch: expected {}", expected),
        });
    }
    Ok(())
}
