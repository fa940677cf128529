use dataserv_core::errors::{DataservError, ExError, ExErrorKind};

#[test]
fn test_every_kind_has_unique_code() {
    let kinds = [
        ExErrorKind::InvalidAddress,
        ExErrorKind::DuplicateAddress,
        ExErrorKind::NotFound,
        ExErrorKind::InvalidSeed,
        ExErrorKind::Generation,
        ExErrorKind::InvalidInput,
        ExErrorKind::Persistence,
        ExErrorKind::Serialization,
        ExErrorKind::Io,
        ExErrorKind::Config,
        ExErrorKind::Internal,
    ];
    let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), kinds.len());
}

#[test]
fn test_not_found_carries_address() {
    let ex: ExError = DataservError::FarmerNotFound {
        address: "1missing".to_string(),
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::NotFound);
    assert_eq!(ex.code(), "ERR_NOT_FOUND");
    assert_eq!(ex.address(), Some("1missing"));
}

#[test]
fn test_duplicate_distinct_from_invalid() {
    let dup: ExError = DataservError::DuplicateAddress {
        address: "1a".to_string(),
    }
    .into();
    let invalid: ExError = DataservError::InvalidAddress {
        address: "1a".to_string(),
    }
    .into();

    assert_ne!(dup.kind(), invalid.kind());
    assert_eq!(dup.kind().http_status(), 409);
    assert_eq!(invalid.kind().http_status(), 400);
    assert_eq!(dup.op(), Some("register"));
}

#[test]
fn test_invalid_seed_message() {
    let err = DataservError::InvalidSeed {
        expected: 12,
        actual: 0,
    };
    assert_eq!(err.to_string(), "Invalid seed: expected 12 bytes, got 0");

    let ex: ExError = err.into();
    assert_eq!(ex.code(), "ERR_INVALID_SEED");
    assert_eq!(ex.op(), Some("open_stream"));
    assert!(!ex.kind().is_transient());
}

#[test]
fn test_serde_error_converts_to_serialization() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: DataservError = parse_err.into();
    assert_eq!(err.kind(), ExErrorKind::Serialization);
}
