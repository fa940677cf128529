//! Storage contract generation.
//!
//! A contract is a fresh random seed, a byte size, and the digest of the
//! deterministic stream derived from that seed. Generation touches no shared
//! state besides the entropy source, so it is safe to call concurrently,
//! including for the same farmer.
//!
//! Contracts are not recorded anywhere: listing outstanding contracts and
//! checking a farmer's answer are left to the layer that tracks them.

use crate::digest::recompute_digest;
use crate::errors::{DataservError, Result};
use crate::model::{Contract, DEFAULT_BYTE_SIZE};
use crate::ports::{EntropySource, SystemEntropy};
use crate::stream::{Seed, SEED_LEN};
use crate::{log_op_end, log_op_error, log_op_start};

/// Mints contracts from an injected entropy source
#[derive(Debug, Clone)]
pub struct ContractGenerator<E> {
    entropy: E,
    default_byte_size: u64,
}

impl ContractGenerator<SystemEntropy> {
    /// Generator backed by the OS CSPRNG with the 10 MiB default size
    pub fn system() -> Self {
        Self::new(SystemEntropy::new())
    }
}

impl<E: EntropySource> ContractGenerator<E> {
    pub fn new(entropy: E) -> Self {
        Self {
            entropy,
            default_byte_size: DEFAULT_BYTE_SIZE,
        }
    }

    /// Override the size used by `generate`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `byte_size` is zero.
    pub fn with_default_byte_size(mut self, byte_size: u64) -> Result<Self> {
        ensure_positive(byte_size)?;
        self.default_byte_size = byte_size;
        Ok(self)
    }

    pub fn default_byte_size(&self) -> u64 {
        self.default_byte_size
    }

    /// Mint a contract of the default size for `address`
    ///
    /// # Errors
    ///
    /// Returns `Generation` if the entropy source fails.
    pub fn generate(&self, address: &str) -> Result<Contract> {
        self.generate_with_size(address, self.default_byte_size)
    }

    /// Mint a contract of `byte_size` bytes for `address`
    ///
    /// The caller is expected to have looked the farmer up already; the
    /// generator does not consult or mutate the registry.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: `byte_size` is zero
    /// - `Generation`: the entropy source failed
    pub fn generate_with_size(&self, address: &str, byte_size: u64) -> Result<Contract> {
        log_op_start!("generate_contract", address = address, byte_size = byte_size);
        let start = std::time::Instant::now();

        let contract = self.generate_impl(address, byte_size).map_err(|e| {
            log_op_error!(
                "generate_contract",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                address = address
            );
            e
        })?;

        log_op_end!(
            "generate_contract",
            duration_ms = start.elapsed().as_millis() as u64,
            address = address,
            seed = %contract.seed(),
            digest = %contract.expected_digest()
        );

        Ok(contract)
    }

    fn generate_impl(&self, address: &str, byte_size: u64) -> Result<Contract> {
        ensure_positive(byte_size)?;

        let mut seed_bytes = [0u8; SEED_LEN];
        self.entropy.fill(&mut seed_bytes)?;
        let seed = Seed::from_bytes(seed_bytes);

        let digest = recompute_digest(&seed, byte_size);
        tracing::debug!(address, byte_size, seed = %seed, "hashed contract stream");

        Ok(Contract::new(address.to_string(), seed, byte_size, digest))
    }
}

fn ensure_positive(byte_size: u64) -> Result<()> {
    if byte_size == 0 {
        return Err(DataservError::InvalidInput {
            reason: "byte size must be positive".to_string(),
        });
    }
    Ok(())
}
