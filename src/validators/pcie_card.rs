//! PCIe add-in card and HBA validators
//!
//! Risers are PCIe cards too, but they sit in the board's riser connectors
//! and draw no lanes; every other card needs a PCIe slot and lanes.

use std::sync::Arc;

use serde_json::json;

use super::base::{ComponentValidator, ResultBuilder, ValidationContext};
use super::cpu::wrong_variant;
use super::rules;
use crate::domain::entities::{ComponentSpec, HbaSpec, IssueKind, ValidationResult};
use crate::domain::policies::LaneBudget;
use crate::domain::value_objects::{ComponentType, StorageProtocol};
use crate::error::EngineResult;

pub struct PciCardValidator;

impl ComponentValidator for PciCardValidator {
    fn component_type(&self) -> ComponentType {
        ComponentType::PciCard
    }

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult> {
        let card = candidate
            .as_pci_card()
            .ok_or_else(|| wrong_variant(candidate))?;
        let mut b = ResultBuilder::new();

        if card.is_riser() {
            rules::riser_placement(&mut b, ctx.build, card);
            return Ok(b.build());
        }

        check_slot_card(&mut b, ctx, candidate);
        Ok(b.build())
    }
}

pub struct HbaValidator;

impl ComponentValidator for HbaValidator {
    fn component_type(&self) -> ComponentType {
        ComponentType::Hba
    }

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult> {
        let hba = candidate.as_hba().ok_or_else(|| wrong_variant(candidate))?;
        let mut b = ResultBuilder::new();

        check_slot_card(&mut b, ctx, candidate);
        self.check_drives(&mut b, ctx, hba);
        Ok(b.build())
    }
}

impl HbaValidator {
    fn check_drives(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, hba: &HbaSpec) {
        let mut hosted = 0u32;
        let mut unsupported: Vec<StorageProtocol> = Vec::new();

        for (component, spec) in ctx.build.resolved_of(ComponentType::Storage) {
            let Some(drive) = spec.as_storage() else {
                continue;
            };
            let protocol = drive.interface.protocol;
            if !matches!(protocol, StorageProtocol::Sata | StorageProtocol::Sas) {
                continue;
            }
            if hba.hosts(protocol) {
                hosted = hosted.saturating_add(component.quantity.max(1));
            } else if !unsupported.contains(&protocol) {
                unsupported.push(protocol);
            }
        }

        if !unsupported.is_empty() {
            let names: Vec<String> = unsupported.iter().map(|p| p.to_string()).collect();
            b.warning(
                IssueKind::InterfaceIncompatible,
                format!("HBA cannot drive the installed {} drives", names.join("/")),
            )
            .details(json!({ "unsupported": unsupported, "supported": hba.protocols }));
        }

        if let Some(max) = hba.max_devices {
            if hosted > max {
                b.error(
                    IssueKind::HbaCapacityExceeded,
                    format!("{} drives exceed the HBA limit of {} devices", hosted, max),
                )
                .details(json!({ "devices": hosted, "max_devices": max }))
                .resolution("Choose an HBA that supports more devices or add a second one");
            }
        }
    }
}

/// Slot, chassis bracket, lane budget and generation checks for a card
fn check_slot_card(b: &mut ResultBuilder, ctx: &ValidationContext<'_>, candidate: &ComponentSpec) {
    rules::card_placement(b, ctx, candidate);
    let with_card = ctx.build.with_candidate(Arc::new(candidate.clone()));
    rules::expansion_slots(b, &with_card);

    let mut budget = LaneBudget::from_build(ctx.build);
    if let Some(lanes) = candidate.lane_demand() {
        budget.add_consumer(candidate.uuid(), lanes, 1);
    }
    rules::lane_budget(b, ctx, &budget);
    rules::pcie_generation(b, ctx.build, candidate);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::entities::ValidationStatus;
    use crate::validators::testing::{spec, validate, Rig};

    fn riser() -> ComponentSpec {
        spec(
            ComponentType::PciCard,
            "riser-1",
            json!({"subtype": "riser", "slot_size": "x16", "provides_slots": {"x8": 2}}),
        )
    }

    fn board(doc: serde_json::Value) -> Rig {
        Rig::new().with(ComponentType::Motherboard, "mb-1", doc)
    }

    fn hba(max_devices: u32) -> ComponentSpec {
        spec(
            ComponentType::Hba,
            "hba-1",
            json!({"protocols": ["SAS", "SATA"], "pcie_lanes": 8, "max_devices": max_devices}),
        )
    }

    fn sas_drives(count: u32) -> Rig {
        Rig::new().with_qty(
            ComponentType::Storage,
            "ssd-1",
            count,
            json!({"interface": "SAS3", "form_factor": "2.5-inch"}),
        )
    }

    #[test]
    fn riser_on_board_without_connectors_is_blocked() {
        let rig = board(json!({"pcie_slots": {"x16": 2}}));

        let result = validate(&PciCardValidator, &rig, &riser());

        assert_eq!(result.status, ValidationStatus::Blocked);
        let entry = result.find(IssueKind::RiserUnsupported).unwrap();
        assert!(entry.resolution.is_some());
    }

    #[test]
    fn riser_takes_a_free_connector() {
        let rig = board(json!({"riser_slots": {"x16": 1}}));

        let result = validate(&PciCardValidator, &rig, &riser());

        assert_eq!(result.status, ValidationStatus::Allowed);
        let entry = result.find(IssueKind::SlotAssignment).unwrap();
        assert_eq!(entry.details.as_ref().unwrap()["slot_id"], "riser_x16_slot_1");
    }

    #[test]
    fn riser_with_every_connector_taken_is_blocked() {
        let rig = board(json!({"riser_slots": {"x16": 1}})).with(
            ComponentType::PciCard,
            "riser-0",
            json!({"subtype": "riser", "slot_size": "x16", "provides_slots": {"x8": 2}}),
        );

        let result = validate(&PciCardValidator, &rig, &riser());

        assert!(result.has_error(IssueKind::RiserSlotUnavailable));
        assert!(!result.has_error(IssueKind::RiserUnsupported));
    }

    #[test]
    fn card_of_unknown_width_reports_the_assumption_without_a_board() {
        let card = spec(ComponentType::PciCard, "card-1", json!({"subtype": "accelerator"}));

        let result = validate(&PciCardValidator, &Rig::new(), &card);

        assert_eq!(result.status, ValidationStatus::AllowedWithWarnings);
        assert!(result.has_warning(IssueKind::LaneCountAssumed));
        assert!(result.has_info(IssueKind::NoMotherboard));
    }

    #[test]
    fn hba_over_device_limit_is_blocked() {
        let result = validate(&HbaValidator, &sas_drives(5), &hba(4));

        assert_eq!(result.status, ValidationStatus::Blocked);
        let entry = result.find(IssueKind::HbaCapacityExceeded).unwrap();
        assert_eq!(entry.detail_u64("devices"), Some(5));
        assert_eq!(entry.detail_u64("max_devices"), Some(4));
    }

    #[test]
    fn hba_within_device_limit_is_allowed() {
        let result = validate(&HbaValidator, &sas_drives(4), &hba(4));

        assert!(!result.has_error(IssueKind::HbaCapacityExceeded));
        assert!(result.is_allowed());
    }

    #[test]
    fn hba_warns_about_drives_it_cannot_drive() {
        let rig = sas_drives(1);
        let sata_only = spec(
            ComponentType::Hba,
            "hba-2",
            json!({"protocols": ["SATA"], "pcie_lanes": 8}),
        );

        let result = validate(&HbaValidator, &rig, &sata_only);

        assert!(result.has_warning(IssueKind::InterfaceIncompatible));
    }
}
