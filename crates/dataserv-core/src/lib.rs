//! dataserv core - farmer registry and storage contract generation
//!
//! - Farmer records with address validity, uniqueness, and liveness stamps
//! - Deterministic seeded byte streams (frozen, versioned algorithm)
//! - Streaming SHA-256 content digests
//! - Contract generation from fresh entropy
//! - Ports for the repository, address validator, clock, and entropy source
//! - Error and logging facilities shared by the other dataserv crates

pub mod digest;
pub mod errors;
pub mod generator;
pub mod logging_facility;
pub mod model;
pub mod ports;
pub mod registry;
pub mod status;
pub mod stream;

pub use dataserv_core_types::schema;

// Re-export commonly used types
pub use digest::{recompute_digest, ContentDigest, DigestAccumulator, DIGEST_ALGORITHM};
pub use errors::{DataservError, ExError, ExErrorKind, Result};
pub use generator::ContractGenerator;
pub use model::{Contract, ContractType, Farmer, DEFAULT_BYTE_SIZE};
pub use ports::{
    AddressValidator, BtcAddressValidator, Clock, EntropySource, FarmerRepository, FixedClock,
    InMemoryFarmerRepository, SystemClock, SystemEntropy,
};
pub use registry::FarmerRegistry;
pub use stream::{DeterministicByteStream, Seed, SEED_LEN, STREAM_VERSION};
