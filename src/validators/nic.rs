//! Network card validator

use std::sync::Arc;

use serde_json::json;

use super::base::{ComponentValidator, ResultBuilder, ValidationContext};
use super::cpu::wrong_variant;
use super::rules;
use crate::domain::entities::{ComponentSpec, IssueKind, NicSpec, ValidationResult};
use crate::domain::policies::LaneBudget;
use crate::domain::services::check_module_fit;
use crate::domain::value_objects::ComponentType;
use crate::error::EngineResult;

pub struct NicValidator;

impl ComponentValidator for NicValidator {
    fn component_type(&self) -> ComponentType {
        ComponentType::Nic
    }

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult> {
        let nic = candidate.as_nic().ok_or_else(|| wrong_variant(candidate))?;
        let mut b = ResultBuilder::new();

        rules::card_placement(&mut b, ctx, candidate);
        let with_card = ctx.build.with_candidate(Arc::new(candidate.clone()));
        rules::expansion_slots(&mut b, &with_card);

        let mut budget = LaneBudget::from_build(ctx.build);
        budget.add_consumer(&nic.uuid, nic.lanes, 1);
        rules::lane_budget(&mut b, ctx, &budget);
        rules::pcie_generation(&mut b, ctx.build, candidate);

        self.check_unassigned_modules(&mut b, ctx, nic);
        Ok(b.build())
    }
}

impl NicValidator {
    /// Loose transceivers in the build that this card could not host
    fn check_unassigned_modules(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, nic: &NicSpec) {
        let mut rejected = Vec::new();
        for module in ctx.build.set.unassigned_modules() {
            let Some(sfp) = ctx.build.spec_of(module).and_then(|s| s.as_sfp()) else {
                continue;
            };
            if let Err(reason) = check_module_fit(&nic.port_type, nic.max_speed_mbps(), sfp) {
                rejected.push(json!({ "module": sfp.uuid, "reason": reason.to_string() }));
            }
        }
        if rejected.is_empty() {
            return;
        }
        b.warning(
            IssueKind::TransceiverIncompatible,
            format!(
                "{} unassigned transceiver(s) in the build do not fit this card's {} ports",
                rejected.len(),
                nic.port_type
            ),
        )
        .details(json!({ "modules": rejected }));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::{UnknownLanes, ValidationConfig};
    use crate::domain::entities::{Severity, ValidationStatus};
    use crate::validators::testing::{spec, validate, validate_with, Rig};

    fn unspecified_nic() -> ComponentSpec {
        spec(ComponentType::Nic, "nic-1", json!({"port_type": "SFP+", "ports": 2}))
    }

    fn gen4_nic() -> ComponentSpec {
        spec(
            ComponentType::Nic,
            "nic-25g",
            json!({"ports": 2, "port_type": "SFP28", "interface": "PCIe 4.0 x8"}),
        )
    }

    fn narrow_board() -> Rig {
        Rig::new().with(ComponentType::Motherboard, "mb-1", json!({"pcie_slots": {"x8": 2}}))
    }

    #[test]
    fn assumed_width_is_reported_when_no_slot_fits() {
        let result = validate(&NicValidator, &narrow_board(), &unspecified_nic());

        assert_eq!(result.status, ValidationStatus::Blocked);
        assert!(result.has_error(IssueKind::PcieSlotUnavailable));
        assert!(result.has_warning(IssueKind::LaneCountAssumed));
    }

    #[test]
    fn assumed_width_is_reported_without_a_cpu_or_board() {
        let result = validate(&NicValidator, &Rig::new(), &unspecified_nic());

        assert_eq!(result.status, ValidationStatus::AllowedWithWarnings);
        assert!(result.has_warning(IssueKind::LaneCountAssumed));
        assert!(result.has_info(IssueKind::NoMotherboard));
    }

    #[test]
    fn assumed_width_is_info_when_configured() {
        let config = ValidationConfig {
            unknown_lanes: UnknownLanes::Assume,
            ..ValidationConfig::default()
        };

        let result = validate_with(&NicValidator, &Rig::new(), &unspecified_nic(), &config);

        assert_eq!(result.status, ValidationStatus::Allowed);
        let entry = result.find(IssueKind::LaneCountAssumed).unwrap();
        assert_eq!(entry.severity, Severity::Info);
    }

    #[test]
    fn stated_width_fits_a_narrow_slot() {
        let result = validate(&NicValidator, &narrow_board(), &gen4_nic());

        assert!(result.find(IssueKind::LaneCountAssumed).is_none());
        let entry = result.find(IssueKind::SlotAssignment).unwrap();
        assert_eq!(entry.details.as_ref().unwrap()["slot_id"], "pcie_x8_slot_1");
        assert_eq!(result.status, ValidationStatus::Allowed);
    }

    #[test]
    fn newer_card_on_older_platform_is_bandwidth_limited() {
        let rig = Rig::new().with(
            ComponentType::Motherboard,
            "mb-1",
            json!({"pcie_slots": {"x16": 1}, "pcie_generation": 3}),
        );

        let result = validate(&NicValidator, &rig, &gen4_nic());

        assert_eq!(result.status, ValidationStatus::AllowedWithWarnings);
        let entry = result.find(IssueKind::PcieBandwidthLimited).unwrap();
        assert_eq!(entry.detail_u64("device_gen"), Some(4));
        assert_eq!(entry.detail_u64("platform_gen"), Some(3));
    }

    #[test]
    fn matching_platform_generation_is_not_limited() {
        let rig = Rig::new().with(
            ComponentType::Motherboard,
            "mb-1",
            json!({"pcie_slots": {"x16": 1}, "pcie_generation": 4}),
        );

        let result = validate(&NicValidator, &rig, &gen4_nic());

        assert!(result.find(IssueKind::PcieBandwidthLimited).is_none());
    }

    #[test]
    fn card_beyond_cpu_lanes_is_blocked() {
        let rig = Rig::new()
            .with(ComponentType::Motherboard, "mb-1", json!({"pcie_slots": {"x16": 2}}))
            .with(ComponentType::Cpu, "cpu-1", json!({"pcie_lanes": 4}));

        let result = validate(&NicValidator, &rig, &gen4_nic());

        let entry = result.find(IssueKind::PcieLanesExceeded).unwrap();
        assert_eq!(entry.detail_u64("deficit"), Some(4));
        assert!(result.is_blocked());
    }

    #[test]
    fn loose_modules_the_card_cannot_host_are_flagged() {
        let rig = Rig::new().with(
            ComponentType::Sfp,
            "qsfp-1",
            json!({"type": "QSFP28", "speed": "100G"}),
        );

        let result = validate(&NicValidator, &rig, &gen4_nic());

        assert!(result.has_warning(IssueKind::TransceiverIncompatible));
    }
}
