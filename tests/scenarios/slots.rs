//! PCIe and riser slot allocation.

use rackfit::domain::services::{SlotError, SlotIssueKind};
use rackfit::config::{EngineConfig, UnknownLanes};
use rackfit::{ComponentType, EngineError, IssueKind, Severity, SlotSize, ValidationStatus};

use crate::common::*;

fn board_with_riser() -> rackfit::ExistingComponentSet {
    TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .with(ComponentType::PciCard, "riser-2x8")
        .set()
}

#[test]
fn narrow_card_prefers_smallest_riser_slot() {
    let engine = engine_with(vec![board_with_riser()]);

    let slot = engine.assign_slot("b1", SlotSize::X4).unwrap();

    assert_eq!(slot.as_deref(), Some("riser1_pcie_x8_slot_1"));
}

#[test]
fn wide_card_takes_native_slot() {
    let engine = engine_with(vec![board_with_riser()]);

    let slot = engine.assign_slot("b1", SlotSize::X16).unwrap();

    assert_eq!(slot.as_deref(), Some("pcie_x16_slot_1"));
}

#[test]
fn riser_adds_to_pcie_availability() {
    let engine = engine_with(vec![board_with_riser()]);

    let availability = engine.slot_availability("b1").unwrap();

    assert_eq!(availability.total_slots(), 4);
    assert_eq!(availability.available_of(SlotSize::X8), 2);
    assert_eq!(availability.available_of(SlotSize::X16), 2);
}

#[test]
fn installed_riser_occupies_its_connector() {
    let engine = engine_with(vec![board_with_riser()]);

    let risers = engine.riser_slot_availability("b1").unwrap();

    assert_eq!(risers.used_slots(), 1);
    assert_eq!(engine.assign_riser_slot("b1", SlotSize::X16).unwrap(), None);
}

#[test]
fn recorded_assignments_are_respected() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .with_assigned(ComponentType::Nic, "nic-25g", slot("pcie_x16_slot_1"))
        .set();
    let engine = engine_with(vec![build]);

    let slot = engine.assign_slot("b1", SlotSize::X16).unwrap();

    assert_eq!(slot.as_deref(), Some("pcie_x16_slot_2"));
}

#[test]
fn card_validation_reports_the_suggested_slot() {
    let engine = engine_with(vec![board_with_riser()]);

    let result = engine.validate("pciecard", "b1", "card-x4", None);

    assert!(result.is_allowed());
    let entry = result.find(IssueKind::SlotAssignment).unwrap();
    assert_eq!(
        entry.details.as_ref().unwrap()["slot_id"],
        "riser1_pcie_x8_slot_1"
    );
}

#[test]
fn full_board_blocks_another_card() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .with(ComponentType::Nic, "nic-25g")
        .with(ComponentType::Nic, "nic-quad-25g")
        .set();
    let engine = engine_with(vec![build]);

    let result = engine.validate("pciecard", "b1", "card-x4", None);

    assert!(result.has_error(IssueKind::PcieSlotUnavailable));
}

#[test]
fn slot_questions_without_motherboard_are_errors() {
    let engine = engine_with(vec![TestBuild::new("b1").set()]);

    assert!(matches!(
        engine.assign_slot("b1", SlotSize::X1),
        Err(EngineError::Slot(SlotError::NoMotherboard))
    ));
}

#[test]
fn integrity_check_flags_duplicates_and_unknown_slots() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .with_assigned(ComponentType::Nic, "nic-25g", slot("pcie_x16_slot_1"))
        .with_assigned(ComponentType::Nic, "nic-quad-25g", slot("pcie_x16_slot_1"))
        .with_assigned(ComponentType::PciCard, "card-x4", slot("pcie_x16_slot_9"))
        .set();
    let engine = engine_with(vec![build]);

    let report = engine.validate_all_slots("b1").unwrap();

    assert!(report.has_issue(SlotIssueKind::DuplicateAssignment));
    assert!(report.has_issue(SlotIssueKind::UnknownSlot));
    assert!(report.has_issue(SlotIssueKind::OverAssigned));
}

#[test]
fn card_of_unknown_width_is_flagged_when_no_slot_fits() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x8-only")
        .set();
    let engine = engine_with(vec![build]);

    let result = engine.validate("nic", "b1", "nic-unspecified", None);

    assert_eq!(result.status, ValidationStatus::Blocked);
    assert!(result.has_error(IssueKind::PcieSlotUnavailable));
    let assumed = result
        .warnings
        .iter()
        .find(|w| w.kind == IssueKind::LaneCountAssumed)
        .expect("assumed slot width should be reported");
    assert!(assumed.message.contains("x16"));
}

#[test]
fn assumed_width_is_info_when_configured() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x8-only")
        .set();
    let mut config = EngineConfig::default();
    config.validation.unknown_lanes = UnknownLanes::Assume;
    let engine = engine_with_config(vec![build], config);

    let result = engine.validate("nic", "b1", "nic-unspecified", None);

    assert!(result.has_info(IssueKind::LaneCountAssumed));
    assert!(result.warnings.iter().all(|w| w.kind != IssueKind::LaneCountAssumed));
    let entry = result.find(IssueKind::LaneCountAssumed).unwrap();
    assert_eq!(entry.severity, Severity::Info);
}

#[test]
fn stated_width_is_not_flagged() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .set();
    let engine = engine_with(vec![build]);

    let result = engine.validate("nic", "b1", "nic-25g", None);

    assert!(result.find(IssueKind::LaneCountAssumed).is_none());
}

#[test]
fn absurd_slot_count_is_a_malformed_spec() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-bogus-slots")
        .set();
    let engine = engine_with(vec![build]);

    assert!(matches!(
        engine.slot_availability("b1"),
        Err(EngineError::Spec(_))
    ));
    assert!(matches!(
        engine.assign_slot("b1", SlotSize::X4),
        Err(EngineError::Spec(_))
    ));
}
