//! Canonical field keys and event names for structured logging

// Envelope
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Farmer / contract identifiers
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_SEED: &str = "seed";
pub const FIELD_BYTE_SIZE: &str = "byte_size";
pub const FIELD_DIGEST: &str = "digest";
pub const FIELD_ONLINE_COUNT: &str = "online_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
