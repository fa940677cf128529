//! Deterministic byte stream derived from a contract seed.
//!
//! The farmer regenerates exactly these bytes from the seed it receives, so
//! the algorithm is a permanent network contract. Version 1 emits the
//! concatenation of 32-byte blocks
//!
//! ```text
//! B_i = SHA-256("dataserv/stream/v1" || seed || u64_be(i))    i = 0, 1, 2, ...
//! ```
//!
//! Byte `k` of the stream is byte `k % 32` of block `k / 32`. Any change here
//! must ship as a new `STREAM_VERSION`, never as an edit of version 1.

use crate::errors::{DataservError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Canonical seed length in bytes
pub const SEED_LEN: usize = 12;

/// Frozen stream algorithm version
pub const STREAM_VERSION: u32 = 1;

const STREAM_DOMAIN_V1: &[u8] = b"dataserv/stream/v1";
const BLOCK_LEN: usize = 32;

/// Contract seed: the only randomness behind a challenge's content
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// # Errors
    ///
    /// Returns `InvalidSeed` unless `bytes` is exactly `SEED_LEN` long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; SEED_LEN] = bytes.try_into().map_err(|_| DataservError::InvalidSeed {
            expected: SEED_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Parse the lowercase or uppercase hex form
    ///
    /// # Errors
    ///
    /// Returns `InvalidSeed` for malformed hex or a wrong decoded length.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| DataservError::InvalidSeed {
            expected: SEED_LEN,
            actual: s.len() / 2,
        })?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", self.to_hex())
    }
}

impl Serialize for Seed {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Seed::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Reproducible pseudo-random byte stream keyed by a `Seed`
///
/// Reads are positional: any sequence of reads whose sizes sum to N yields
/// the same N bytes as a single read of N.
#[derive(Clone)]
pub struct DeterministicByteStream {
    seed: Seed,
    counter: u64,
    block: [u8; BLOCK_LEN],
    offset: usize,
}

impl DeterministicByteStream {
    /// Open a stream on raw seed bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidSeed` if `seed` is empty or not `SEED_LEN` bytes.
    pub fn open(seed: &[u8]) -> Result<Self> {
        Ok(Self::from_seed(Seed::from_slice(seed)?))
    }

    pub fn from_seed(seed: Seed) -> Self {
        Self {
            seed,
            counter: 0,
            block: [0u8; BLOCK_LEN],
            offset: BLOCK_LEN,
        }
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Number of bytes emitted so far
    pub fn position(&self) -> u64 {
        if self.counter == 0 {
            return 0;
        }
        (self.counter - 1) * BLOCK_LEN as u64 + self.offset as u64
    }

    /// Next `n` bytes of the stream
    pub fn read(&mut self, n: usize) -> Vec<u8> {
        let mut out = vec![0u8; n];
        self.fill(&mut out);
        out
    }

    /// Fill `buf` with the next `buf.len()` bytes of the stream
    pub fn fill(&mut self, buf: &mut [u8]) {
        let mut written = 0;
        while written < buf.len() {
            if self.offset == BLOCK_LEN {
                self.next_block();
            }
            let take = (BLOCK_LEN - self.offset).min(buf.len() - written);
            buf[written..written + take]
                .copy_from_slice(&self.block[self.offset..self.offset + take]);
            self.offset += take;
            written += take;
        }
    }

    fn next_block(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(STREAM_DOMAIN_V1);
        hasher.update(self.seed.as_bytes());
        hasher.update(self.counter.to_be_bytes());
        self.block.copy_from_slice(&hasher.finalize());
        self.counter += 1;
        self.offset = 0;
    }
}

impl std::io::Read for DeterministicByteStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.fill(buf);
        Ok(buf.len())
    }
}

impl fmt::Debug for DeterministicByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeterministicByteStream")
            .field("seed", &self.seed)
            .field("position", &self.position())
            .finish()
    }
}
