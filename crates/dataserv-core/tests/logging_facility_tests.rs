#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{new_registry, t, ADDR_A, ADDR_B, ADDR_C};
use dataserv_core::errors::DataservError;
use dataserv_core::logging_facility::test_capture::init_test_capture;
use chrono::Duration;
use dataserv_core::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_BYTE_SIZE, FIELD_COMPONENT, FIELD_DIGEST,
    FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND, FIELD_ONLINE_COUNT, FIELD_SEED,
};
use dataserv_core::{log_op_end, log_op_error, log_op_start, ContractGenerator};

// The capture buffer is global and tests run in parallel, so every test
// filters on an op name or address that no other test uses.

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_1";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 42);

    capture.assert_event_exists(op_name, EVENT_START);
    let ends = capture.find(op_name, EVENT_END);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].fields.get(FIELD_DURATION_MS), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_2";

    let err = DataservError::DuplicateAddress {
        address: "1dup".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 3);

    let errors = capture.find(op_name, EVENT_END_ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].fields.get(FIELD_ERR_CODE),
        Some(&"ERR_DUPLICATE_ADDRESS".to_string())
    );
    assert_eq!(
        errors[0].fields.get(FIELD_ERR_KIND),
        Some(&"DuplicateAddress".to_string())
    );
}

#[test]
fn test_register_emits_single_start_and_end() {
    let capture = init_test_capture();
    let (registry, _repo, _clock) = new_registry(t(0));

    registry.register(ADDR_C).unwrap();

    assert_eq!(capture.find_for_address("register", EVENT_START, ADDR_C).len(), 1);
    assert_eq!(capture.find_for_address("register", EVENT_END, ADDR_C).len(), 1);
    assert!(capture
        .find_for_address("register", EVENT_END_ERROR, ADDR_C)
        .is_empty());
}

#[test]
fn test_failed_lookup_emits_error_event_with_kind() {
    let capture = init_test_capture();
    let (registry, _repo, _clock) = new_registry(t(0));

    // ADDR_B is never registered by this registry
    assert!(registry.lookup(ADDR_B).is_err());

    let errors = capture.find_for_address("lookup", EVENT_END_ERROR, ADDR_B);
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .any(|e| e.fields.get(FIELD_ERR_CODE) == Some(&"ERR_NOT_FOUND".to_string())));
}

#[test]
fn test_generate_logs_seed_and_digest() {
    let capture = init_test_capture();
    let generator = ContractGenerator::system();
    let contract = generator.generate_with_size(ADDR_A, 256).unwrap();

    let ends = capture.find_for_address("generate_contract", EVENT_END, ADDR_A);
    let seed_hex = contract.seed().to_hex();
    let ours = ends
        .iter()
        .find(|e| e.fields.get(FIELD_SEED) == Some(&seed_hex))
        .expect("end event for this contract");
    assert_eq!(
        ours.fields.get(FIELD_DIGEST),
        Some(&contract.expected_digest().to_hex())
    );
}

#[test]
fn test_generate_start_records_size_and_component() {
    let capture = init_test_capture();
    let generator = ContractGenerator::system();
    generator.generate_with_size(ADDR_B, 777).unwrap();

    let starts = capture.find_for_address("generate_contract", EVENT_START, ADDR_B);
    let ours = starts
        .iter()
        .find(|e| e.fields.get(FIELD_BYTE_SIZE) == Some(&"777".to_string()))
        .expect("start event for this contract");
    assert_eq!(
        ours.fields.get(FIELD_COMPONENT).map(String::as_str),
        Some("dataserv_core::generator")
    );
}

#[test]
fn test_online_reports_count() {
    let capture = init_test_capture();
    let (registry, _repo, _clock) = new_registry(t(0));
    registry.register(ADDR_A).unwrap();
    registry.register(ADDR_C).unwrap();

    registry.online(Duration::seconds(4_321)).unwrap();

    let ends = capture.find("online", EVENT_END);
    assert!(ends
        .iter()
        .any(|e| e.fields.get(FIELD_ONLINE_COUNT) == Some(&"2".to_string())));
}
