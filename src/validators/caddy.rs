//! Drive caddy validator

use serde_json::json;

use super::base::{ComponentValidator, ResultBuilder, ValidationContext};
use super::cpu::wrong_variant;
use super::rules;
use crate::domain::entities::{ComponentSpec, IssueKind, ValidationResult};
use crate::domain::value_objects::ComponentType;
use crate::error::EngineResult;

pub struct CaddyValidator;

impl ComponentValidator for CaddyValidator {
    fn component_type(&self) -> ComponentType {
        ComponentType::Caddy
    }

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult> {
        let caddy = candidate.as_caddy().ok_or_else(|| wrong_variant(candidate))?;
        let mut b = ResultBuilder::new();

        let Some(chassis) = rules::chassis(ctx.build) else {
            b.info(
                IssueKind::NoChassis,
                "no chassis yet; bay fit will be checked when one is added",
            );
            return Ok(b.build());
        };
        let Some(bay) = caddy.bay_form_factor.as_ref() else {
            return Ok(b.build());
        };

        let bays = chassis.bays_of(bay);
        if bays == 0 {
            b.error(
                IssueKind::CaddyBayMismatch,
                format!("chassis has no {} bays", bay),
            )
            .details(json!({ "bay_form_factor": bay }));
            return Ok(b.build());
        }

        let installed: u32 = ctx
            .build
            .resolved_of(ComponentType::Caddy)
            .filter(|(_, spec)| {
                spec.as_caddy()
                    .is_some_and(|c| c.bay_form_factor.as_ref() == Some(bay))
            })
            .map(|(c, _)| c.quantity.max(1))
            .sum();
        if installed + 1 > bays {
            b.error(
                IssueKind::CaddyLimitExceeded,
                format!(
                    "{} caddies already fill the chassis' {} {} bays",
                    installed, bays, bay
                ),
            )
            .details(json!({ "installed": installed, "bays": bays }));
        }

        Ok(b.build())
    }
}
