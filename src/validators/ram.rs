//! Memory module validator

use serde_json::json;

use super::base::{ComponentValidator, ResultBuilder, ValidationContext};
use super::cpu::wrong_variant;
use super::motherboard::{ecc_support, memory_form_factor, memory_slots};
use super::rules::{self, MemoryHost, MemoryTotals};
use crate::domain::entities::{ComponentSpec, IssueKind, RamSpec, ValidationResult};
use crate::domain::value_objects::ComponentType;
use crate::error::EngineResult;

pub struct RamValidator;

impl ComponentValidator for RamValidator {
    fn component_type(&self) -> ComponentType {
        ComponentType::Ram
    }

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult> {
        let ram = candidate.as_ram().ok_or_else(|| wrong_variant(candidate))?;
        let mut b = ResultBuilder::new();

        let mut totals = MemoryTotals::of(ctx.build);
        totals.add(ram, 1);

        match ctx.build.motherboard() {
            Some((_, board)) => {
                let host = MemoryHost::board(board);
                rules::memory_type(&mut b, &host, ram);
                memory_slots(&mut b, board, totals.modules);
                rules::memory_capacity(&mut b, &host, totals.capacity_gb);
                rules::memory_speed(&mut b, &host, ram.speed_mhz);
                memory_form_factor(&mut b, board, ram);
                ecc_support(&mut b, board, ram);
            }
            None => {
                b.info(
                    IssueKind::NoMotherboard,
                    "no motherboard yet; slot and type checks will run when one is added",
                );
            }
        }

        for cpu in rules::installed_cpus(ctx.build) {
            let host = MemoryHost::cpu(cpu);
            rules::memory_type(&mut b, &host, ram);
            rules::ecc_required(&mut b, ctx, cpu, [ram]);
            rules::memory_capacity(&mut b, &host, totals.capacity_gb);
            rules::memory_speed(&mut b, &host, ram.speed_mhz);
        }

        self.check_installed_modules(&mut b, ctx, ram);
        Ok(b.build())
    }
}

impl RamValidator {
    /// Mixing rules against modules already in the build
    fn check_installed_modules(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, ram: &RamSpec) {
        let installed: Vec<&RamSpec> = rules::installed_ram(ctx.build).collect();

        if let Some(other) = installed
            .iter()
            .find(|m| m.generation != 0 && ram.generation != 0 && m.generation != ram.generation)
        {
            b.error(
                IssueKind::MemoryTypeMixed,
                format!(
                    "build already has DDR{} memory; cannot add DDR{}",
                    other.generation, ram.generation
                ),
            )
            .details(json!({ "installed": other.generation, "candidate": ram.generation }));
        }

        if let Some(module_type) = ram.module_type.as_deref() {
            if let Some(other) = installed
                .iter()
                .filter_map(|m| m.module_type.as_deref())
                .find(|t| *t != module_type)
            {
                b.error(
                    IssueKind::MemoryModuleTypeMixed,
                    format!("cannot mix {} and {} modules", other, module_type),
                )
                .details(json!({ "installed": other, "candidate": module_type }))
                .resolution(format!("Use {} modules only", other));
            }
        }

        if let Some(speed) = ram.speed_mhz {
            let slowest = installed.iter().filter_map(|m| m.speed_mhz).min();
            if let Some(other) = installed
                .iter()
                .filter_map(|m| m.speed_mhz)
                .find(|s| *s != speed)
            {
                let effective = slowest.map_or(speed, |s| s.min(speed));
                b.warning(
                    IssueKind::MemorySpeedMixed,
                    format!(
                        "mixed memory speeds ({} and {} MHz); all modules run at {} MHz",
                        other, speed, effective
                    ),
                )
                .details(json!({ "installed_mhz": other, "candidate_mhz": speed, "effective_mhz": effective }));
            }
        }

        if installed.iter().any(|m| m.ecc != ram.ecc) {
            b.warning(
                IssueKind::MemoryEccMixed,
                "mixing ECC and non-ECC modules disables error correction",
            );
        }
    }
}
