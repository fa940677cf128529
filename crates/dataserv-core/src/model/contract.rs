use serde::{Deserialize, Serialize};

use crate::digest::{recompute_digest, ContentDigest};
use crate::stream::{Seed, STREAM_VERSION};

/// Default virtual file size: 10 MiB
pub const DEFAULT_BYTE_SIZE: u64 = 10 * 1024 * 1024;

/// Kind of storage challenge
///
/// Serialized as its numeric code. Only the seeded-blob challenge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum ContractType {
    /// Regenerate a seeded pseudo-random blob and return its digest
    SeededBlob,
}

impl From<ContractType> for u32 {
    fn from(value: ContractType) -> Self {
        match value {
            ContractType::SeededBlob => 0,
        }
    }
}

impl TryFrom<u32> for ContractType {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ContractType::SeededBlob),
            other => Err(format!("unknown contract type {}", other)),
        }
    }
}

/// A storage challenge issued to one farmer
///
/// Immutable once minted. The expected digest is a pure function of
/// `(stream_version, seed, byte_size)`, which lets the farmer rebuild the
/// challenge data locally instead of receiving it over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(rename = "btc_addr")]
    address: String,

    contract_type: ContractType,

    #[serde(rename = "file_hash")]
    expected_digest: ContentDigest,

    byte_size: u64,

    seed: Seed,

    stream_version: u32,
}

impl Contract {
    pub(crate) fn new(
        address: String,
        seed: Seed,
        byte_size: u64,
        expected_digest: ContentDigest,
    ) -> Self {
        Self {
            address,
            contract_type: ContractType::SeededBlob,
            expected_digest,
            byte_size,
            seed,
            stream_version: STREAM_VERSION,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn contract_type(&self) -> ContractType {
        self.contract_type
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn expected_digest(&self) -> &ContentDigest {
        &self.expected_digest
    }

    pub fn stream_version(&self) -> u32 {
        self.stream_version
    }

    /// Re-derive the digest from this contract's own seed and size
    pub fn recompute_digest(&self) -> ContentDigest {
        recompute_digest(&self.seed, self.byte_size)
    }

    /// Whether the stored digest matches a fresh recomputation
    ///
    /// Contracts from an unknown stream version never match.
    pub fn is_consistent(&self) -> bool {
        self.stream_version == STREAM_VERSION && self.recompute_digest() == self.expected_digest
    }
}
