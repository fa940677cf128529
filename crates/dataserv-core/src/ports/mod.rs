//! Collaborators consumed by the registry and the contract generator
//!
//! Each port is a trait so callers inject the real implementation (system
//! clock, OS entropy, SQLite repository) or a test double.

pub mod address;
pub mod clock;
pub mod entropy;
pub mod repository;

pub use address::{AddressValidator, BtcAddressValidator};
pub use clock::{Clock, FixedClock, SystemClock};
pub use entropy::{EntropySource, SystemEntropy};
pub use repository::{FarmerRepository, InMemoryFarmerRepository};
