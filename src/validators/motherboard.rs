//! Motherboard validator
//!
//! The board is the hub most other rules hang off, so adding it late checks
//! everything already installed: CPUs, memory, chassis fit, cards and
//! board-mounted drives.

use std::sync::Arc;

use serde_json::json;

use super::base::{ComponentValidator, ResultBuilder, ValidationContext};
use super::cpu::wrong_variant;
use super::rules::{self, MemoryHost, MemoryTotals};
use crate::domain::entities::{
    ComponentSpec, IssueKind, MotherboardSpec, RamSpec, ResolvedBuild, ValidationResult,
};
use crate::domain::services::{SlotIssueKind, SlotTracker};
use crate::domain::value_objects::{ComponentType, DriveFormFactor};
use crate::error::EngineResult;

pub struct MotherboardValidator;

impl ComponentValidator for MotherboardValidator {
    fn component_type(&self) -> ComponentType {
        ComponentType::Motherboard
    }

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult> {
        let board = candidate
            .as_motherboard()
            .ok_or_else(|| wrong_variant(candidate))?;
        let mut b = ResultBuilder::new();

        if let Some((existing, _)) = ctx.build.motherboard() {
            b.error(
                IssueKind::MotherboardAlreadyPresent,
                format!("build already has motherboard {}", existing.uuid),
            )
            .details(json!({ "installed": existing.uuid }))
            .resolution("Remove the installed motherboard first");
            return Ok(b.build());
        }

        self.check_cpus(&mut b, ctx, board);
        self.check_memory(&mut b, ctx, board);
        self.check_chassis(&mut b, ctx, board);

        let with_board = ctx.build.with_candidate(Arc::new(candidate.clone()));
        self.check_cards(&mut b, &with_board);
        self.check_board_drives(&mut b, ctx, board);

        Ok(b.build())
    }
}

impl MotherboardValidator {
    fn check_cpus(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, board: &MotherboardSpec) {
        for cpu in rules::installed_cpus(ctx.build) {
            rules::socket(b, cpu, board);
            if let (Some(cpu_gen), Some(board_gen)) = (cpu.pcie_generation, board.pcie_generation) {
                if board_gen < cpu_gen {
                    b.warning(
                        IssueKind::PcieBandwidthLimited,
                        format!(
                            "board runs PCIe gen {} while the CPU supports gen {}",
                            board_gen, cpu_gen
                        ),
                    )
                    .details(json!({ "device_gen": cpu_gen, "platform_gen": board_gen }));
                }
            }
        }
        let installed = ctx.build.set.count_of(ComponentType::Cpu);
        let max = board.max_cpus.max(1);
        if installed > max {
            b.error(
                IssueKind::CpuSocketLimitExceeded,
                format!(
                    "{} CPUs installed but the motherboard has {} socket(s)",
                    installed, max
                ),
            )
            .details(json!({ "current": installed, "max": max }));
        }
    }

    fn check_memory(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, board: &MotherboardSpec) {
        let host = MemoryHost::board(board);
        let totals = MemoryTotals::of(ctx.build);

        for ram in rules::installed_ram(ctx.build) {
            rules::memory_type(b, &host, ram);
            memory_form_factor(b, board, ram);
            ecc_support(b, board, ram);
        }
        memory_slots(b, board, totals.modules);
        rules::memory_capacity(b, &host, totals.capacity_gb);
        rules::memory_speed(b, &host, totals.fastest_mhz);
    }

    fn check_chassis(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, board: &MotherboardSpec) {
        if let Some(chassis) = rules::chassis(ctx.build) {
            form_factor(b, &chassis.motherboard_form_factors, board);
        }
    }

    fn check_cards(&self, b: &mut ResultBuilder, with_board: &ResolvedBuild) {
        let tracker = SlotTracker::new(with_board);
        if let Ok(report) = tracker.validate_all_slots() {
            if report.has_issue(SlotIssueKind::OverAssigned) {
                b.error(
                    IssueKind::PcieSlotsExceeded,
                    format!(
                        "{} installed cards need a slot but the board provides {}",
                        report.consumers, report.total_slots
                    ),
                )
                .details(json!({ "cards": report.consumers, "slots": report.total_slots }));
            }
        }
        if let Ok(report) = tracker.validate_all_riser_slots() {
            if report.has_issue(SlotIssueKind::OverAssigned) {
                b.error(
                    IssueKind::RiserSlotUnavailable,
                    format!(
                        "{} risers installed but the board has {} riser slots",
                        report.consumers, report.total_slots
                    ),
                )
                .details(json!({ "risers": report.consumers, "slots": report.total_slots }));
            }
        }
    }

    fn check_board_drives(
        &self,
        b: &mut ResultBuilder,
        ctx: &ValidationContext<'_>,
        board: &MotherboardSpec,
    ) {
        let m2 = rules::drives_of(ctx.build, &DriveFormFactor::M2);
        if m2 > board.m2_slots {
            b.error(
                IssueKind::M2SlotsExceeded,
                format!("{} M.2 drives but the board has {} M.2 slots", m2, board.m2_slots),
            )
            .details(json!({ "drives": m2, "slots": board.m2_slots }));
        }
        let u2 = rules::drives_of(ctx.build, &DriveFormFactor::U2);
        if u2 > board.u2_slots {
            b.error(
                IssueKind::U2SlotsExceeded,
                format!("{} U.2 drives but the board has {} U.2 ports", u2, board.u2_slots),
            )
            .details(json!({ "drives": u2, "slots": board.u2_slots }));
        }
    }
}

pub(crate) fn memory_slots(b: &mut ResultBuilder, board: &MotherboardSpec, modules: u32) {
    let Some(slots) = board.memory_slots else {
        return;
    };
    if modules <= slots {
        return;
    }
    b.error(
        IssueKind::MemorySlotsExceeded,
        format!("{} memory modules but the board has {} DIMM slots", modules, slots),
    )
    .details(json!({ "modules": modules, "slots": slots }))
    .resolution("Use fewer, larger modules");
}

pub(crate) fn memory_form_factor(
    b: &mut ResultBuilder,
    board: &MotherboardSpec,
    ram: &RamSpec,
) {
    let Some(ff) = ram.form_factor.as_deref() else {
        return;
    };
    if board.memory_form_factors.is_empty() || board.memory_form_factors.iter().any(|f| f == ff) {
        return;
    }
    b.error(
        IssueKind::MemoryFormFactorMismatch,
        format!(
            "module {} is {} but the board takes {}",
            ram.uuid,
            ff,
            board.memory_form_factors.join("/")
        ),
    )
    .details(json!({ "module": ram.uuid, "form_factor": ff, "supported": board.memory_form_factors }));
}

/// ECC modules on a non-ECC board work, without error correction
pub(crate) fn ecc_support(
    b: &mut ResultBuilder,
    board: &MotherboardSpec,
    ram: &RamSpec,
) {
    if ram.ecc && board.ecc_supported == Some(false) {
        b.warning(
            IssueKind::EccUnsupported,
            format!(
                "board does not support ECC; module {} will run without error correction",
                ram.uuid
            ),
        )
        .details(json!({ "module": ram.uuid }));
    }
}

/// Chassis-accepted board form factors against the board's
pub(crate) fn form_factor(b: &mut ResultBuilder, accepted: &[String], board: &MotherboardSpec) {
    let Some(ff) = board.form_factor.as_deref() else {
        return;
    };
    if accepted.is_empty() || accepted.iter().any(|a| a == ff) {
        return;
    }
    b.error(
        IssueKind::FormFactorMismatch,
        format!(
            "chassis accepts {} boards; motherboard is {}",
            accepted.join("/"),
            ff
        ),
    )
    .details(json!({ "motherboard_form_factor": ff, "supported": accepted }));
}
