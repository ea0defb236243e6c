//! Transceiver ports, batches and placement.

use rackfit::domain::services::{AssignOutcome, BatchError};
use rackfit::domain::value_objects::PortType;
use rackfit::{ComponentType, EngineError, IssueKind, ValidationStatus};

use crate::common::*;

#[test]
fn slower_module_fits_faster_cage_of_same_family() {
    let build = TestBuild::new("b1").with(ComponentType::Nic, "nic-25g").set();
    let engine = engine_with(vec![build]);

    let result = engine.validate("sfp", "b1", "sfp-10g", None);

    assert_eq!(result.status, ValidationStatus::Allowed);
    assert!(result.has_info(IssueKind::PortAvailable));
}

#[test]
fn copper_onboard_ports_take_no_modules() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .set();
    let engine = engine_with(vec![build]);

    let result = engine.validate("sfp", "b1", "sfp-25g", None);

    assert!(result.has_error(IssueKind::TransceiverIncompatible));
}

#[test]
fn mixed_batch_names_every_type() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Nic, "nic-quad-25g")
        .with_qty(ComponentType::Sfp, "sfp-10g", 2)
        .with_qty(ComponentType::Sfp, "sfp-25g", 2)
        .set();
    let engine = engine_with(vec![build]);

    match engine.validate_unassigned_modules("b1") {
        Err(EngineError::Batch(BatchError::Heterogeneous { types, .. })) => {
            assert!(types.contains(&PortType::SfpPlus));
            assert!(types.contains(&PortType::Sfp28));
        }
        other => panic!("expected a heterogeneous batch, got {:?}", other),
    }
}

#[test]
fn occupied_ports_are_skipped_during_placement() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Nic, "nic-quad-25g")
        .with_assigned(ComponentType::Sfp, "sfp-25g", port("nic-quad-25g", 1))
        .with_qty(ComponentType::Sfp, "sfp-25g", 2)
        .set();
    let engine = engine_with(vec![build]);

    match engine.auto_assign("b1", "nic-quad-25g").unwrap() {
        AssignOutcome::Assigned { placements, .. } => {
            let ports: Vec<u8> = placements.iter().map(|p| p.port_index).collect();
            assert_eq!(ports, vec![2, 3]);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn too_few_ports_suggests_a_larger_card() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Nic, "nic-25g")
        .with(ComponentType::Nic, "nic-quad-25g")
        .with_qty(ComponentType::Sfp, "sfp-25g", 3)
        .set();
    let engine = engine_with(vec![build]);

    match engine.auto_assign("b1", "nic-25g").unwrap() {
        AssignOutcome::Insufficient {
            needed,
            available,
            alternatives,
            ..
        } => {
            assert_eq!(needed, 3);
            assert_eq!(available, 2);
            assert_eq!(alternatives[0].nic_id, "nic-quad-25g");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn optimal_nic_prefers_add_on_card() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .with(ComponentType::Nic, "nic-quad-25g")
        .with(ComponentType::Sfp, "sfp-10g")
        .set();
    let engine = engine_with(vec![build]);

    let best = engine.choose_optimal_nic("b1").unwrap().unwrap();

    assert_eq!(best.nic_id, "nic-quad-25g");
}

#[test]
fn port_summary_counts_onboard_ports() {
    let build = TestBuild::new("b1")
        .with(ComponentType::Motherboard, "mb-x12dpi")
        .with(ComponentType::Nic, "nic-25g")
        .with_assigned(ComponentType::Sfp, "sfp-25g", port("nic-25g", 1))
        .set();
    let engine = engine_with(vec![build]);

    let summary = engine.port_summary("b1").unwrap();

    assert_eq!(summary.total_ports, 4);
    assert_eq!(summary.used_ports, 1);
    assert!(engine.validate_port_assignments("b1").unwrap().is_empty());
}
