//! Content digests over deterministic streams.
//!
//! The network-wide digest is SHA-256. `digest_stream` hashes a stream in
//! fixed-size chunks so a multi-megabyte contract never sits in memory.

use crate::errors::{DataservError, Result};
use crate::stream::{DeterministicByteStream, Seed};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Name of the pinned digest algorithm
pub const DIGEST_ALGORITHM: &str = "sha256";

/// Digest output length in bytes
pub const DIGEST_LEN: usize = 32;

const HASH_CHUNK_LEN: usize = 64 * 1024;

/// A SHA-256 value, displayed and serialized as lowercase hex
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; DIGEST_LEN]);

impl ContentDigest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` for malformed hex or a length other than 64
    /// characters.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| DataservError::InvalidInput {
            reason: format!("digest is not valid hex: {}", e),
        })?;
        let arr: [u8; DIGEST_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| DataservError::InvalidInput {
                    reason: format!(
                        "digest must be {} bytes, got {}",
                        DIGEST_LEN,
                        bytes.len()
                    ),
                })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContentDigest::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Incremental SHA-256 accumulator
#[derive(Clone, Default)]
pub struct DigestAccumulator {
    hasher: Sha256,
    consumed: u64,
}

impl DigestAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
        self.consumed += bytes.len() as u64;
    }

    /// Bytes fed so far
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn finalize(self) -> ContentDigest {
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&self.hasher.finalize());
        ContentDigest(out)
    }
}

/// One-shot digest of an in-memory byte slice
pub fn hash_bytes(bytes: &[u8]) -> ContentDigest {
    let mut acc = DigestAccumulator::new();
    acc.update(bytes);
    acc.finalize()
}

/// Digest of the first `byte_size` bytes of `stream`, hashed in chunks
pub fn digest_stream(stream: &mut DeterministicByteStream, byte_size: u64) -> ContentDigest {
    let mut acc = DigestAccumulator::new();
    let mut chunk = vec![0u8; HASH_CHUNK_LEN];
    let mut remaining = byte_size;
    while remaining > 0 {
        let take = remaining.min(HASH_CHUNK_LEN as u64) as usize;
        stream.fill(&mut chunk[..take]);
        acc.update(&chunk[..take]);
        remaining -= take as u64;
    }
    acc.finalize()
}

/// Expected digest for a contract with `seed` and `byte_size`
///
/// Pure function of its inputs: the coordinating node and the farmer both
/// call this and must agree bit for bit.
pub fn recompute_digest(seed: &Seed, byte_size: u64) -> ContentDigest {
    let mut stream = DeterministicByteStream::from_seed(*seed);
    digest_stream(&mut stream, byte_size)
}
