use dataserv_core_types::RequestId;
use thiserror::Error;

/// Result type alias using DataservError
pub type Result<T> = std::result::Result<T, DataservError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code that outer layers (CLI, HTTP API) use to
/// pick a distinct response. The codes are part of the public contract and
/// must not be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Farmer identity
    InvalidAddress,
    DuplicateAddress,
    NotFound,

    // Contract generation
    InvalidSeed,
    Generation,
    InvalidInput,

    // Integration/IO
    Persistence,
    Serialization,
    Io,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidAddress => "ERR_INVALID_ADDRESS",
            ExErrorKind::DuplicateAddress => "ERR_DUPLICATE_ADDRESS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidSeed => "ERR_INVALID_SEED",
            ExErrorKind::Generation => "ERR_GENERATION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// HTTP status an API layer should answer with for this kind
    pub fn http_status(&self) -> u16 {
        match self {
            ExErrorKind::InvalidAddress | ExErrorKind::InvalidInput => 400,
            ExErrorKind::NotFound => 404,
            ExErrorKind::DuplicateAddress => 409,
            ExErrorKind::InvalidSeed
            | ExErrorKind::Generation
            | ExErrorKind::Persistence
            | ExErrorKind::Serialization
            | ExErrorKind::Io
            | ExErrorKind::Config
            | ExErrorKind::Internal => 500,
        }
    }

    /// Whether a caller may retry the same call after a delay
    ///
    /// Only environment failures qualify; input and state conflicts never do.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExErrorKind::Generation | ExErrorKind::Persistence | ExErrorKind::Io
        )
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context for
/// debugging. Built from a `DataservError` at the boundary of an operation.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    address: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            address: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add farmer address context
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(address) = &self.address {
            write!(f, " (address: {})", address)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for registry and contract operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataservError {
    /// Address rejected by the address validator
    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    /// A farmer with this address is already registered
    #[error("Address already registered: {address}")]
    DuplicateAddress { address: String },

    /// No farmer is registered under this address
    #[error("Farmer not found: {address}")]
    FarmerNotFound { address: String },

    /// Stream seed has the wrong length
    #[error("Invalid seed: expected {expected} bytes, got {actual}")]
    InvalidSeed { expected: usize, actual: usize },

    /// The platform entropy source failed
    #[error("Contract generation failed: {reason}")]
    Generation { reason: String },

    /// Caller supplied an unusable argument
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Backing store failure
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DataservError {
    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            DataservError::InvalidAddress { .. } => ExErrorKind::InvalidAddress,
            DataservError::DuplicateAddress { .. } => ExErrorKind::DuplicateAddress,
            DataservError::FarmerNotFound { .. } => ExErrorKind::NotFound,
            DataservError::InvalidSeed { .. } => ExErrorKind::InvalidSeed,
            DataservError::Generation { .. } => ExErrorKind::Generation,
            DataservError::InvalidInput { .. } => ExErrorKind::InvalidInput,
            DataservError::Persistence { .. } => ExErrorKind::Persistence,
            DataservError::Serialization { .. } => ExErrorKind::Serialization,
            DataservError::Io { .. } => ExErrorKind::Io,
            DataservError::Config { .. } => ExErrorKind::Config,
            DataservError::Internal { .. } => ExErrorKind::Internal,
        }
    }
}

impl From<DataservError> for ExError {
    fn from(err: DataservError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            DataservError::InvalidAddress { address } => ExError::new(kind)
                .with_address(address)
                .with_message("Invalid address"),

            DataservError::DuplicateAddress { address } => ExError::new(kind)
                .with_address(address)
                .with_op("register")
                .with_message("Address already registered"),

            DataservError::FarmerNotFound { address } => ExError::new(kind)
                .with_address(address)
                .with_message("Farmer not found"),

            DataservError::InvalidSeed { .. } => {
                ExError::new(kind).with_op("open_stream").with_message(message)
            }

            DataservError::Generation { .. } => {
                ExError::new(kind).with_op("generate").with_message(message)
            }

            DataservError::InvalidInput { .. }
            | DataservError::Persistence { .. }
            | DataservError::Serialization { .. }
            | DataservError::Io { .. }
            | DataservError::Config { .. }
            | DataservError::Internal { .. } => ExError::new(kind).with_message(message),
        }
    }
}

impl From<serde_json::Error> for DataservError {
    fn from(err: serde_json::Error) -> Self {
        DataservError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for DataservError {
    fn from(err: std::io::Error) -> Self {
        DataservError::Io {
            message: err.to_string(),
        }
    }
}
