//! Chassis validator

use std::sync::Arc;

use serde_json::json;

use super::base::{ComponentValidator, ResultBuilder, ValidationContext};
use super::cpu::wrong_variant;
use super::motherboard::form_factor;
use super::rules;
use crate::domain::entities::{ChassisSpec, ComponentSpec, IssueKind, ValidationResult};
use crate::domain::value_objects::ComponentType;
use crate::error::EngineResult;

pub struct ChassisValidator;

impl ComponentValidator for ChassisValidator {
    fn component_type(&self) -> ComponentType {
        ComponentType::Chassis
    }

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult> {
        let chassis = candidate
            .as_chassis()
            .ok_or_else(|| wrong_variant(candidate))?;
        let mut b = ResultBuilder::new();

        if let Some(existing) = ctx.build.set.chassis() {
            b.error(
                IssueKind::ChassisAlreadyPresent,
                format!("build already has chassis {}", existing.uuid),
            )
            .details(json!({ "installed": existing.uuid }))
            .resolution("Remove the installed chassis first");
            return Ok(b.build());
        }

        if let Some((_, board)) = ctx.build.motherboard() {
            form_factor(&mut b, &chassis.motherboard_form_factors, board);
        }

        rules::drive_bays(&mut b, chassis, ctx.build);
        for (_, spec) in ctx.build.resolved_of(ComponentType::Storage) {
            if let Some(drive) = spec.as_storage() {
                rules::backplane(&mut b, chassis, drive);
            }
        }

        let with_chassis = ctx.build.with_candidate(Arc::new(candidate.clone()));
        rules::expansion_slots(&mut b, &with_chassis);
        self.check_caddies(&mut b, ctx, chassis);

        Ok(b.build())
    }
}

impl ChassisValidator {
    /// Caddies already in the build that target a bay size this chassis lacks
    fn check_caddies(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, chassis: &ChassisSpec) {
        for (_, spec) in ctx.build.resolved_of(ComponentType::Caddy) {
            let Some(bay) = spec.as_caddy().and_then(|c| c.bay_form_factor.as_ref()) else {
                continue;
            };
            if chassis.bays_of(bay) == 0 {
                b.warning(
                    IssueKind::CaddyBayMismatch,
                    format!("chassis has no {} bays for caddy {}", bay, spec.uuid()),
                )
                .details(json!({ "caddy": spec.uuid(), "bay_form_factor": bay }));
            }
        }
    }
}
