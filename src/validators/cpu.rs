//! CPU validator

use serde_json::json;

use super::base::{ComponentValidator, ResultBuilder, ValidationContext};
use super::rules::{self, MemoryHost, MemoryTotals};
use crate::domain::entities::{ComponentSpec, CpuSpec, IssueKind, ValidationResult};
use crate::domain::policies::LaneBudget;
use crate::domain::value_objects::ComponentType;
use crate::error::{EngineError, EngineResult};

pub struct CpuValidator;

impl ComponentValidator for CpuValidator {
    fn component_type(&self) -> ComponentType {
        ComponentType::Cpu
    }

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult> {
        let cpu = candidate.as_cpu().ok_or_else(|| wrong_variant(candidate))?;
        let mut b = ResultBuilder::new();

        self.check_motherboard(&mut b, ctx, candidate, cpu);
        self.check_installed_cpus(&mut b, ctx, cpu);
        self.check_memory(&mut b, ctx, cpu);

        let mut budget = LaneBudget::from_build(ctx.build);
        budget.add_cpu(cpu, 1);
        rules::lane_budget(&mut b, ctx, &budget);

        Ok(b.build())
    }
}

impl CpuValidator {
    fn check_motherboard(
        &self,
        b: &mut ResultBuilder,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
        cpu: &CpuSpec,
    ) {
        let Some((_, board)) = ctx.build.motherboard() else {
            b.info(
                IssueKind::NoMotherboard,
                "no motherboard yet; socket compatibility will be checked when one is added",
            );
            return;
        };

        rules::socket(b, cpu, board);
        let installed = ctx.build.set.count_of(ComponentType::Cpu);
        rules::cpu_count(b, board, installed, 1);
        rules::pcie_generation(b, ctx.build, candidate);
    }

    /// Multi-socket builds need identical CPUs
    fn check_installed_cpus(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, cpu: &CpuSpec) {
        let Some(model) = cpu.model.as_deref() else {
            return;
        };
        let other = rules::installed_cpus(ctx.build)
            .filter_map(|c| c.model.as_deref())
            .find(|m| *m != model);
        if let Some(installed) = other {
            b.error(
                IssueKind::CpuModelMismatch,
                format!("installed CPU is {}; all CPUs must be {}", installed, model),
            )
            .details(json!({ "installed": installed, "candidate": model }))
            .resolution("Use identical CPUs in every socket");
        }
    }

    fn check_memory(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, cpu: &CpuSpec) {
        let host = MemoryHost::cpu(cpu);
        for ram in rules::installed_ram(ctx.build) {
            rules::memory_type(b, &host, ram);
        }
        rules::ecc_required(b, ctx, cpu, rules::installed_ram(ctx.build));

        let totals = MemoryTotals::of(ctx.build);
        rules::memory_capacity(b, &host, totals.capacity_gb);
        rules::memory_speed(b, &host, totals.fastest_mhz);
    }
}

/// The factory hands each validator specs of its own type only
pub(crate) fn wrong_variant(candidate: &ComponentSpec) -> EngineError {
    EngineError::Internal {
        validator: candidate.component_type().to_string(),
        message: format!(
            "received a {} spec for {}",
            candidate.component_type(),
            candidate.uuid()
        ),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::entities::ValidationStatus;
    use crate::validators::testing::{spec, validate, Rig};

    fn cpu(doc: serde_json::Value) -> ComponentSpec {
        spec(ComponentType::Cpu, "cpu-1", doc)
    }

    fn ram_rig(modules: u32) -> Rig {
        Rig::new().with_qty(
            ComponentType::Ram,
            "ram-32",
            modules,
            json!({"memory_type": "DDR4-3200", "capacity": "32GB"}),
        )
    }

    #[test]
    fn installed_memory_over_cpu_limit_is_blocked() {
        let candidate = cpu(json!({"memory_types": ["DDR4"], "max_memory_capacity": "64GB"}));

        let result = validate(&CpuValidator, &ram_rig(3), &candidate);

        assert_eq!(result.status, ValidationStatus::Blocked);
        let entry = result.find(IssueKind::MemoryCapacityExceeded).unwrap();
        assert_eq!(entry.detail_u64("total_gb"), Some(96));
        assert_eq!(entry.detail_u64("excess_gb"), Some(32));
    }

    #[test]
    fn installed_memory_at_cpu_limit_is_allowed() {
        let candidate = cpu(json!({"memory_types": ["DDR4"], "max_memory_capacity": "64GB"}));

        let result = validate(&CpuValidator, &ram_rig(2), &candidate);

        assert!(!result.has_error(IssueKind::MemoryCapacityExceeded));
        assert!(result.is_allowed());
    }

    #[test]
    fn faster_memory_is_downclocked_with_a_warning() {
        let candidate = cpu(json!({"memory_types": ["DDR4"], "max_memory_speed": "2933MHz"}));

        let result = validate(&CpuValidator, &ram_rig(1), &candidate);

        assert_eq!(result.status, ValidationStatus::AllowedWithWarnings);
        let entry = result.find(IssueKind::MemorySpeedDowngrade).unwrap();
        assert_eq!(entry.details.as_ref().unwrap()["slowdown_percent"], json!(8.3));
        assert!(entry.message.contains("8.3% slower"));
    }

    #[test]
    fn memory_within_cpu_speed_has_no_downgrade() {
        let candidate = cpu(json!({"memory_types": ["DDR4"], "max_memory_speed": "3200MHz"}));

        let result = validate(&CpuValidator, &ram_rig(1), &candidate);

        assert!(result.find(IssueKind::MemorySpeedDowngrade).is_none());
    }

    #[test]
    fn too_few_lanes_for_installed_cards_is_blocked() {
        let rig = Rig::new().with_qty(
            ComponentType::Nic,
            "nic-x16",
            2,
            json!({"ports": 2, "port_type": "SFP28", "pcie_lanes": 16}),
        );

        let result = validate(&CpuValidator, &rig, &cpu(json!({"pcie_lanes": 20})));

        let entry = result.find(IssueKind::PcieLanesExceeded).unwrap();
        assert_eq!(entry.detail_u64("required"), Some(32));
        assert_eq!(entry.detail_u64("available"), Some(20));
        assert_eq!(entry.detail_u64("deficit"), Some(12));
        assert!(result.is_blocked());
    }

    #[test]
    fn enough_lanes_for_installed_cards_is_allowed() {
        let rig = Rig::new().with_qty(
            ComponentType::Nic,
            "nic-x16",
            2,
            json!({"ports": 2, "port_type": "SFP28", "pcie_lanes": 16}),
        );

        let result = validate(&CpuValidator, &rig, &cpu(json!({"pcie_lanes": 64})));

        assert!(!result.has_error(IssueKind::PcieLanesExceeded));
        assert!(result.find(IssueKind::LaneCountAssumed).is_none());
        assert_eq!(result.status, ValidationStatus::Allowed);
    }

    #[test]
    fn faster_cpu_on_older_board_is_bandwidth_limited() {
        let rig = Rig::new().with(
            ComponentType::Motherboard,
            "mb-1",
            json!({"socket": "LGA4189", "pcie_generation": 3}),
        );
        let candidate = cpu(json!({"socket": "LGA4189", "pcie_generation": 4}));

        let result = validate(&CpuValidator, &rig, &candidate);

        let entry = result.find(IssueKind::PcieBandwidthLimited).unwrap();
        assert_eq!(entry.detail_u64("device_gen"), Some(4));
        assert_eq!(entry.detail_u64("platform_gen"), Some(3));
        assert!(result.is_allowed());
    }

    #[test]
    fn different_model_in_second_socket_is_blocked() {
        let rig = Rig::new()
            .with(ComponentType::Motherboard, "mb-1", json!({"max_cpus": 2}))
            .with(ComponentType::Cpu, "cpu-a", json!({"model": "Xeon Gold 6338"}));

        let result = validate(&CpuValidator, &rig, &cpu(json!({"model": "Xeon Gold 6354"})));

        assert!(result.has_error(IssueKind::CpuModelMismatch));
    }
}
