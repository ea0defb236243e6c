//! Transceiver validator
//!
//! A module is addable when some NIC in the build (add-on or onboard) has a
//! free port that accepts its type at its speed.

use serde_json::json;

use super::base::{ComponentValidator, ResultBuilder, ValidationContext};
use super::cpu::wrong_variant;
use crate::domain::entities::{ComponentSpec, IssueKind, PortInventory, SfpSpec, ValidationResult};
use crate::domain::services::{
    check_module_fit, choose_optimal_nic, validate_unassigned_modules, BatchError,
    ModuleMismatch, PortTracker,
};
use crate::domain::value_objects::ComponentType;
use crate::error::EngineResult;

pub struct SfpValidator;

impl ComponentValidator for SfpValidator {
    fn component_type(&self) -> ComponentType {
        ComponentType::Sfp
    }

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult> {
        let sfp = candidate.as_sfp().ok_or_else(|| wrong_variant(candidate))?;
        let mut b = ResultBuilder::new();

        let inventories = PortTracker::new(ctx.build).inventories();
        if inventories.is_empty() {
            b.info(
                IssueKind::NoNic,
                "no network card yet; port compatibility will be checked when one is added",
            );
        } else {
            self.check_ports(&mut b, sfp, &inventories);
        }

        self.check_batch(&mut b, ctx, sfp);
        Ok(b.build())
    }
}

impl SfpValidator {
    fn check_ports(&self, b: &mut ResultBuilder, sfp: &SfpSpec, inventories: &[PortInventory]) {
        let mut compatible: Vec<PortInventory> = Vec::new();
        let mut reasons: Vec<(String, ModuleMismatch)> = Vec::new();
        for inventory in inventories {
            match check_module_fit(&inventory.port_type, inventory.max_speed_mbps, sfp) {
                Ok(()) => compatible.push(inventory.clone()),
                Err(reason) => reasons.push((inventory.nic_id.clone(), reason)),
            }
        }

        if compatible.is_empty() {
            let speed_only = reasons
                .iter()
                .all(|(_, r)| matches!(r, ModuleMismatch::Speed { .. }));
            let kind = if speed_only {
                IssueKind::TransceiverSpeedExceeded
            } else {
                IssueKind::TransceiverIncompatible
            };
            let details: Vec<_> = reasons
                .iter()
                .map(|(nic, reason)| json!({ "nic_id": nic, "reason": reason.to_string() }))
                .collect();
            b.error(
                kind,
                format!(
                    "no network port in the build accepts a {} module",
                    sfp.module_type
                ),
            )
            .details(json!({ "nics": details }))
            .resolution("Add a NIC with matching cages or choose a different module");
            return;
        }

        match choose_optimal_nic(std::slice::from_ref(sfp), &compatible) {
            Ok(Some(nic)) => {
                let port = nic.next_available_port();
                b.info(
                    IssueKind::PortAvailable,
                    format!(
                        "{} port {} is free",
                        nic.nic_id,
                        port.map_or_else(|| "?".to_string(), |p| p.to_string())
                    ),
                )
                .details(json!({ "nic_id": nic.nic_id, "port_index": port }));
            }
            Ok(None) | Err(_) => {
                let ids: Vec<&str> = compatible.iter().map(|c| c.nic_id.as_str()).collect();
                b.error(
                    IssueKind::PortsExhausted,
                    format!("every compatible port is occupied ({})", ids.join(", ")),
                )
                .details(json!({ "compatible_nics": ids }))
                .resolution("Free a port or add another NIC");
            }
        }
    }

    /// Loose modules are placed as one batch; mixing types or speeds splits it
    fn check_batch(&self, b: &mut ResultBuilder, ctx: &ValidationContext<'_>, sfp: &SfpSpec) {
        let mut batch: Vec<SfpSpec> = ctx
            .build
            .set
            .unassigned_modules()
            .filter_map(|m| ctx.build.spec_of(m).and_then(|s| s.as_sfp()).cloned())
            .collect();
        if batch.is_empty() {
            return;
        }
        batch.push(sfp.clone());

        if let Err(err @ BatchError::Heterogeneous { .. }) = validate_unassigned_modules(&batch) {
            b.warning(IssueKind::TransceiverBatchMixed, err.to_string())
                .resolution("Assign the existing modules before adding a different kind");
        }
    }
}
