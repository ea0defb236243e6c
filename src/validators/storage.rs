//! Storage device validator
//!
//! Where a drive lands depends on its form factor: M.2 and U.2 drives use
//! board connectors, 2.5/3.5-inch drives use chassis bays (2.5-inch drives
//! may borrow a 3.5-inch bay through a caddy).

use std::sync::Arc;

use serde_json::json;

use super::base::{ComponentValidator, ResultBuilder, ValidationContext};
use super::cpu::wrong_variant;
use super::rules;
use crate::domain::entities::{
    ComponentSpec, IssueKind, MotherboardSpec, ResolvedBuild, StorageSpec, ValidationResult,
};
use crate::domain::policies::LaneBudget;
use crate::domain::value_objects::{ComponentType, DriveFormFactor, StorageProtocol};
use crate::error::EngineResult;

pub struct StorageValidator;

impl ComponentValidator for StorageValidator {
    fn component_type(&self) -> ComponentType {
        ComponentType::Storage
    }

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult> {
        let drive = candidate
            .as_storage()
            .ok_or_else(|| wrong_variant(candidate))?;
        let mut b = ResultBuilder::new();
        let with_drive = ctx.build.with_candidate(Arc::new(candidate.clone()));

        match &drive.form_factor {
            Some(DriveFormFactor::M2) => self.check_m2(&mut b, ctx, drive),
            Some(DriveFormFactor::U2) => self.check_u2(&mut b, ctx),
            Some(ff) if ff.uses_drive_bay() => self.check_bay(&mut b, ctx, &with_drive, drive),
            _ => {}
        }

        if drive.interface.protocol == StorageProtocol::Nvme {
            let mut budget = LaneBudget::from_build(ctx.build);
            if let Some(lanes) = candidate.lane_demand() {
                budget.add_consumer(&drive.uuid, lanes, 1);
            }
            rules::lane_budget(&mut b, ctx, &budget);
        }

        Ok(b.build())
    }
}

impl StorageValidator {
    fn board<'b>(
        &self,
        b: &mut ResultBuilder,
        ctx: &'b ValidationContext<'_>,
    ) -> Option<&'b MotherboardSpec> {
        let board = ctx.build.motherboard().map(|(_, mb)| mb);
        if board.is_none() {
            b.info(
                IssueKind::NoMotherboard,
                "no motherboard yet; drive connectors will be checked when one is added",
            );
        }
        board
    }

    fn check_m2(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, drive: &StorageSpec) {
        let Some(board) = self.board(b, ctx) else {
            return;
        };
        if board.m2_slots == 0 {
            b.error(IssueKind::M2Unsupported, "motherboard has no M.2 slots")
                .resolution("Use a PCIe M.2 adapter or a board with M.2 slots");
            return;
        }
        let used = rules::drives_of(ctx.build, &DriveFormFactor::M2);
        if used + 1 > board.m2_slots {
            b.error(
                IssueKind::M2SlotsExceeded,
                format!("all {} M.2 slots are in use", board.m2_slots),
            )
            .details(json!({ "used": used, "slots": board.m2_slots }));
        }
        let protocol = drive.interface.protocol;
        if protocol != StorageProtocol::Unknown
            && !board.m2_protocols.is_empty()
            && !board.m2_protocols.contains(&protocol)
        {
            b.error(
                IssueKind::M2ProtocolUnsupported,
                format!("the board's M.2 slots do not support {} drives", protocol),
            )
            .details(json!({ "protocol": protocol, "supported": board.m2_protocols }));
        }
    }

    fn check_u2(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>) {
        let Some(board) = self.board(b, ctx) else {
            return;
        };
        let used = rules::drives_of(ctx.build, &DriveFormFactor::U2);
        if used + 1 > board.u2_slots {
            b.error(
                IssueKind::U2SlotsExceeded,
                format!(
                    "{} U.2 ports available and {} already used",
                    board.u2_slots, used
                ),
            )
            .details(json!({ "used": used, "slots": board.u2_slots }));
        }
    }

    fn check_bay(
        &self,
        b: &mut ResultBuilder,
        ctx: &ValidationContext<'_>,
        with_drive: &ResolvedBuild,
        drive: &StorageSpec,
    ) {
        match rules::chassis(ctx.build) {
            Some(chassis) => {
                rules::drive_bays(b, chassis, with_drive);
                rules::backplane(b, chassis, drive);
                if !b.has_errors() {
                    b.info(
                        IssueKind::StoragePlacement,
                        format!(
                            "{} drive fits a chassis bay",
                            drive.form_factor.as_ref().map_or("bay", |ff| ff.label())
                        ),
                    );
                }
            }
            None => {
                b.info(
                    IssueKind::NoChassis,
                    "no chassis yet; drive bays will be checked when one is added",
                );
            }
        }

        let protocol = drive.interface.protocol;
        if matches!(protocol, StorageProtocol::Sata | StorageProtocol::Sas)
            && ctx.build.motherboard().is_some()
            && !rules::has_controller(ctx.build, protocol)
        {
            b.error(
                IssueKind::ControllerMissing,
                format!("nothing in the build can drive {} devices", protocol),
            )
            .resolution(format!("Add an HBA with {} support", protocol));
        }
    }
}
