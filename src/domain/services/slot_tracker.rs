//! PCIe and riser slot tracking
//!
//! Slot inventories are derived on every call from the motherboard spec,
//! the installed risers and the build's slot assignments. Nothing here is
//! stored; allocation is advisory and double-booking is only detected after
//! the fact by the integrity checks.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::entities::{
    Assignment, ComponentSpec, ExistingComponent, ResolvedBuild, Slot, SlotAvailability,
    SlotGroup, SlotInventory, SlotPool, SlotSource, MAX_SLOTS_PER_GROUP,
};
use crate::domain::value_objects::SlotSize;

/// Why a slot question could not be answered at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("build has no motherboard; slots cannot be determined")]
    NoMotherboard,
}

/// Kind of integrity problem found in recorded slot assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotIssueKind {
    /// More consumers than slots in the pool
    OverAssigned,
    UnknownSlot,
    SizeMismatch,
    DuplicateAssignment,
    RiserInPcieSlot,
    CardInRiserSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotIssue {
    pub kind: SlotIssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_uuid: Option<String>,
    pub message: String,
}

/// Outcome of cross-checking one slot pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotIntegrityReport {
    pub pool: SlotPool,
    pub total_slots: u32,
    pub consumers: u32,
    pub issues: Vec<SlotIssue>,
}

impl SlotIntegrityReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_issue(&self, kind: SlotIssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

/// Slot views over one resolved build
pub struct SlotTracker<'a> {
    build: &'a ResolvedBuild,
}

impl<'a> SlotTracker<'a> {
    pub fn new(build: &'a ResolvedBuild) -> Self {
        Self { build }
    }

    /// Native plus riser-provided PCIe slots with current occupancy
    pub fn pcie_inventory(&self) -> Result<SlotInventory, SlotError> {
        let (_, board) = self.build.motherboard().ok_or(SlotError::NoMotherboard)?;

        let mut inventory = SlotInventory::new(SlotPool::Pcie);
        push_groups(&mut inventory.slots, &board.pcie_slots, "pcie", || {
            SlotSource::Motherboard
        });

        let mut ordinal = 0u32;
        for (component, riser) in self.build.risers() {
            for _ in 0..component.quantity.clamp(1, MAX_SLOTS_PER_GROUP) {
                ordinal += 1;
                let prefix = format!("riser{}_pcie", ordinal);
                push_groups(&mut inventory.slots, &riser.provides_slots, &prefix, || {
                    SlotSource::Riser {
                        ordinal,
                        riser_uuid: component.uuid.clone(),
                    }
                });
            }
        }

        self.mark_used(&mut inventory);
        Ok(inventory)
    }

    /// Riser connectors on the motherboard with current occupancy
    pub fn riser_inventory(&self) -> Result<SlotInventory, SlotError> {
        let (_, board) = self.build.motherboard().ok_or(SlotError::NoMotherboard)?;

        let mut inventory = SlotInventory::new(SlotPool::Riser);
        push_groups(&mut inventory.slots, &board.riser_slots, "riser", || {
            SlotSource::Motherboard
        });

        self.mark_used(&mut inventory);
        Ok(inventory)
    }

    pub fn availability(&self) -> Result<SlotAvailability, SlotError> {
        Ok(self.pcie_inventory()?.availability())
    }

    pub fn riser_availability(&self) -> Result<SlotAvailability, SlotError> {
        Ok(self.riser_inventory()?.availability())
    }

    /// Smallest free PCIe slot a card of class `size` fits in
    pub fn assign_slot(&self, size: SlotSize) -> Result<Option<String>, SlotError> {
        let inventory = self.pcie_inventory()?;
        let slot = best_fit(&inventory, size).map(|s| s.id.clone());
        debug!(build_id = self.build.build_id(), %size, ?slot, "pcie slot lookup");
        Ok(slot)
    }

    /// Smallest free riser connector a riser of class `size` fits in
    pub fn assign_riser_slot(&self, size: SlotSize) -> Result<Option<String>, SlotError> {
        let inventory = self.riser_inventory()?;
        let slot = best_fit(&inventory, size).map(|s| s.id.clone());
        debug!(build_id = self.build.build_id(), %size, ?slot, "riser slot lookup");
        Ok(slot)
    }

    pub fn validate_all_slots(&self) -> Result<SlotIntegrityReport, SlotError> {
        let inventory = self.pcie_inventory()?;
        Ok(self.integrity(&inventory))
    }

    pub fn validate_all_riser_slots(&self) -> Result<SlotIntegrityReport, SlotError> {
        let inventory = self.riser_inventory()?;
        Ok(self.integrity(&inventory))
    }

    /// Occupancy from recorded assignments, then virtual placement of
    /// installed cards that have no recorded slot yet.
    ///
    /// Every unit of `quantity` takes a slot, matching the consumer count of
    /// the integrity check: a recorded slot holds one unit and the rest are
    /// placed virtually like unassigned cards.
    fn mark_used(&self, inventory: &mut SlotInventory) {
        let pool = inventory.pool;
        let capacity = u32::try_from(inventory.slots.len()).unwrap_or(u32::MAX);
        let mut unplaced = Vec::new();

        for (component, spec) in self.build.resolved() {
            if !consumes(pool, spec) {
                continue;
            }
            let units = component.quantity.max(1);
            let size = spec.required_slot().unwrap_or(SlotSize::X16);
            let remaining = match recorded_slot(pool, component) {
                Some(slot_id) => {
                    if inventory.slot(slot_id).is_some() && inventory.is_free(slot_id) {
                        inventory
                            .used
                            .insert(slot_id.to_string(), component.uuid.clone());
                    }
                    units - 1
                }
                None if component.assignment.is_none() => units,
                None => 0,
            };
            // No unit beyond the slot count can be placed anyway.
            for _ in 0..remaining.min(capacity) {
                unplaced.push((component.uuid.clone(), size));
            }
        }

        for (uuid, size) in unplaced {
            if let Some(id) = best_fit(inventory, size).map(|s| s.id.clone()) {
                inventory.used.insert(id, uuid);
            }
        }
    }

    fn integrity(&self, inventory: &SlotInventory) -> SlotIntegrityReport {
        let pool = inventory.pool;
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut consumers = 0u32;

        for (component, spec) in self.build.resolved() {
            let is_riser = spec.as_pci_card().is_some_and(|c| c.is_riser());

            if consumes(pool, spec) {
                consumers = consumers.saturating_add(component.quantity.max(1));
            }

            match (&component.assignment, pool, is_riser) {
                (Some(Assignment::Slot { slot_id }), SlotPool::Pcie, true) => {
                    issues.push(issue(
                        SlotIssueKind::RiserInPcieSlot,
                        slot_id,
                        component,
                        format!("riser {} is recorded in PCIe slot {}", component.uuid, slot_id),
                    ));
                    continue;
                }
                (Some(Assignment::RiserSlot { slot_id }), SlotPool::Riser, false) => {
                    issues.push(issue(
                        SlotIssueKind::CardInRiserSlot,
                        slot_id,
                        component,
                        format!(
                            "{} {} is recorded in riser slot {}",
                            component.component_type, component.uuid, slot_id
                        ),
                    ));
                    continue;
                }
                _ => {}
            }

            let Some(slot_id) = recorded_slot(pool, component) else {
                continue;
            };
            if !consumes(pool, spec) {
                continue;
            }

            let Some(slot) = inventory.slot(slot_id) else {
                issues.push(issue(
                    SlotIssueKind::UnknownSlot,
                    slot_id,
                    component,
                    format!("slot {} does not exist in this build", slot_id),
                ));
                continue;
            };

            if !seen.insert(slot_id.to_string()) {
                issues.push(issue(
                    SlotIssueKind::DuplicateAssignment,
                    slot_id,
                    component,
                    format!("slot {} is assigned to more than one component", slot_id),
                ));
            }

            let required = spec.required_slot().unwrap_or(SlotSize::X1);
            if !required.fits_in(slot.size) {
                issues.push(issue(
                    SlotIssueKind::SizeMismatch,
                    slot_id,
                    component,
                    format!(
                        "{} card {} does not fit {} slot {}",
                        required, component.uuid, slot.size, slot_id
                    ),
                ));
            }
        }

        let total_slots = inventory.slots.len() as u32;
        if consumers > total_slots {
            issues.push(SlotIssue {
                kind: SlotIssueKind::OverAssigned,
                slot_id: None,
                component_uuid: None,
                message: format!(
                    "{} components need a slot but only {} exist",
                    consumers, total_slots
                ),
            });
        }

        SlotIntegrityReport {
            pool,
            total_slots,
            consumers,
            issues,
        }
    }
}

fn issue(
    kind: SlotIssueKind,
    slot_id: &str,
    component: &ExistingComponent,
    message: String,
) -> SlotIssue {
    SlotIssue {
        kind,
        slot_id: Some(slot_id.to_string()),
        component_uuid: Some(component.uuid.clone()),
        message,
    }
}

/// Does `spec` take a slot from `pool`?
fn consumes(pool: SlotPool, spec: &ComponentSpec) -> bool {
    let is_riser = spec.as_pci_card().is_some_and(|c| c.is_riser());
    match pool {
        SlotPool::Pcie => spec.required_slot().is_some() && !is_riser,
        SlotPool::Riser => is_riser,
    }
}

fn recorded_slot(pool: SlotPool, component: &ExistingComponent) -> Option<&str> {
    match (pool, component.assignment.as_ref()?) {
        (SlotPool::Pcie, Assignment::Slot { slot_id }) => Some(slot_id),
        (SlotPool::Riser, Assignment::RiserSlot { slot_id }) => Some(slot_id),
        _ => None,
    }
}

fn push_groups(
    slots: &mut Vec<Slot>,
    groups: &[SlotGroup],
    prefix: &str,
    source: impl Fn() -> SlotSource,
) {
    let mut per_size: BTreeMap<SlotSize, u32> = BTreeMap::new();
    for group in groups {
        for _ in 0..group.count {
            let n = per_size.entry(group.size).or_insert(0);
            *n += 1;
            slots.push(Slot {
                id: format!("{}_{}_slot_{}", prefix, group.size, n),
                size: group.size,
                source: source(),
            });
        }
    }
}

/// Smallest sufficient free slot; native before riser-provided, then order
fn best_fit(inventory: &SlotInventory, size: SlotSize) -> Option<&Slot> {
    inventory
        .free_slots()
        .enumerate()
        .filter(|(_, slot)| size.fits_in(slot.size))
        .min_by_key(|(index, slot)| {
            let riser_rank = matches!(slot.source, SlotSource::Riser { .. }) as u8;
            (slot.size, riser_rank, *index)
        })
        .map(|(_, slot)| slot)
}
