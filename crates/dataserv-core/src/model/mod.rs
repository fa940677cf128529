pub mod contract;
pub mod farmer;

pub use contract::{Contract, ContractType, DEFAULT_BYTE_SIZE};
pub use farmer::Farmer;
