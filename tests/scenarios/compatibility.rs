//! CPU, motherboard and memory compatibility.

use rackfit::config::EngineConfig;
use rackfit::{ComponentType, IssueKind, ValidationStatus};

use crate::common::*;

#[test]
fn socket_strings_normalize_before_comparison() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-z790")
        .set();
    let engine = engine_with(vec![build]);

    let result = engine.validate("cpu", "b1", "cpu-i9", None);

    assert!(!result.has_error(IssueKind::SocketMismatch));
    assert!(result.is_allowed());
}

#[test]
fn mismatched_socket_is_blocked_with_resolution() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .set();
    let engine = engine_with(vec![build]);

    let result = engine.validate("cpu", "b1", "cpu-i9", None);

    assert_eq!(result.status, ValidationStatus::Blocked);
    let entry = result.find(IssueKind::SocketMismatch).unwrap();
    assert!(entry.resolution.is_some());
}

#[test]
fn second_cpu_on_single_socket_board_is_blocked() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-z790")
        .with(ComponentType::Cpu, "cpu-i9")
        .set();
    let engine = engine_with(vec![build]);

    let result = engine.validate("cpu", "b1", "cpu-i9", None);

    assert_eq!(result.status, ValidationStatus::Blocked);
    let entry = result.find(IssueKind::CpuSocketLimitExceeded).unwrap();
    assert_eq!(entry.detail_u64("current"), Some(1));
    assert_eq!(entry.detail_u64("max"), Some(1));
}

#[test]
fn ecc_cpu_rejects_installed_non_ecc_memory() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .with(ComponentType::Ram, "ram-ecc")
        .with(ComponentType::Ram, "ram-plain")
        .with(ComponentType::Ram, "ram-plain")
        .set();
    let engine = engine_with(vec![build]);

    let result = engine.validate("cpu", "b1", "cpu-6338", None);

    assert_eq!(result.status, ValidationStatus::Blocked);
    let ecc_errors = result
        .errors
        .iter()
        .filter(|e| e.kind == IssueKind::EccRequired)
        .count();
    assert_eq!(ecc_errors, 1);
}

#[test]
fn every_ecc_offender_is_listed_when_configured() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Ram, "ram-plain")
        .with(ComponentType::Ram, "ram-plain")
        .set();
    let mut config = EngineConfig::default();
    config.validation.report_all_ecc_offenders = true;
    let engine = engine_with_config(vec![build], config);

    let result = engine.validate("cpu", "b1", "cpu-6338", None);

    let ecc_errors = result
        .errors
        .iter()
        .filter(|e| e.kind == IssueKind::EccRequired)
        .count();
    assert_eq!(ecc_errors, 2);
}

#[test]
fn validation_is_idempotent() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .with(ComponentType::Ram, "ram-plain")
        .set();
    let engine = engine_with(vec![build]);

    let first = engine.validate("cpu", "b1", "cpu-6338", None);
    let second = engine.validate("cpu", "b1", "cpu-6338", None);

    assert_eq!(first, second);
}

#[test]
fn caller_supplied_snapshot_overrides_the_store() {
    let engine = engine_with(vec![TestBuild::new("b1").set()]);
    let snapshot = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .set();

    let result = engine.validate("cpu", "b1", "cpu-i9", Some(snapshot));

    assert!(result.has_error(IssueKind::SocketMismatch));
}

#[test]
fn missing_candidate_is_blocked_and_cached_negatively() {
    let engine = engine_with(vec![TestBuild::new("b1").set()]);

    let first = engine.validate("ram", "b1", "ram-ghost", None);
    let second = engine.validate("ram", "b1", "ram-ghost", None);

    assert!(first.has_error(IssueKind::ComponentNotFound));
    assert_eq!(first, second);
    assert!(engine.cache_stats().hits >= 1);
}

#[test]
fn unknown_component_type_is_blocked() {
    let engine = engine_with(vec![TestBuild::new("b1").set()]);

    let result = engine.validate("flux-capacitor", "b1", "x", None);

    assert!(result.has_error(IssueKind::UnsupportedComponentType));
}
