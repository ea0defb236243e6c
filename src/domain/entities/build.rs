//! Build state as seen by the engine
//!
//! The build store owns and mutates builds; the engine only ever reads an
//! `ExistingComponentSet` snapshot. Inventories (slots, ports) are derived
//! from these records on every call and never stored.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ComponentType;

/// Where an installed component has been placed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignment {
    /// PCIe expansion slot (native or riser-provided)
    Slot { slot_id: String },
    /// Dedicated riser connector on the motherboard
    RiserSlot { slot_id: String },
    /// NIC port holding a transceiver (ports are 1-based)
    Port { nic_uuid: String, port_index: u8 },
    /// Chassis drive bay
    Bay { bay_id: String },
}

impl Assignment {
    pub fn slot_id(&self) -> Option<&str> {
        match self {
            Assignment::Slot { slot_id } => Some(slot_id),
            _ => None,
        }
    }

    pub fn riser_slot_id(&self) -> Option<&str> {
        match self {
            Assignment::RiserSlot { slot_id } => Some(slot_id),
            _ => None,
        }
    }
}

/// One installed component record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingComponent {
    pub component_type: ComponentType,
    pub uuid: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub assignment: Option<Assignment>,
}

fn default_quantity() -> u32 {
    1
}

impl ExistingComponent {
    pub fn new(component_type: ComponentType, uuid: impl Into<String>) -> Self {
        Self {
            component_type,
            uuid: uuid.into(),
            quantity: 1,
            assignment: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.assignment = Some(assignment);
        self
    }
}

/// Snapshot of every component currently in a build
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExistingComponentSet {
    pub build_id: String,
    #[serde(default)]
    pub components: Vec<ExistingComponent>,
}

impl ExistingComponentSet {
    pub fn new(build_id: impl Into<String>) -> Self {
        Self {
            build_id: build_id.into(),
            components: Vec::new(),
        }
    }

    pub fn with(mut self, component: ExistingComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn push(&mut self, component: ExistingComponent) {
        self.components.push(component);
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExistingComponent> {
        self.components.iter()
    }

    pub fn of_type(&self, ty: ComponentType) -> impl Iterator<Item = &ExistingComponent> {
        self.components
            .iter()
            .filter(move |c| c.component_type == ty)
    }

    /// Quantity-weighted number of installed components of a type
    pub fn count_of(&self, ty: ComponentType) -> u32 {
        self.of_type(ty).map(|c| c.quantity).sum()
    }

    pub fn has(&self, ty: ComponentType) -> bool {
        self.of_type(ty).next().is_some()
    }

    pub fn first_of(&self, ty: ComponentType) -> Option<&ExistingComponent> {
        self.of_type(ty).next()
    }

    pub fn motherboard(&self) -> Option<&ExistingComponent> {
        self.first_of(ComponentType::Motherboard)
    }

    pub fn chassis(&self) -> Option<&ExistingComponent> {
        self.first_of(ComponentType::Chassis)
    }

    /// Transceivers not yet placed in any NIC port
    pub fn unassigned_modules(&self) -> impl Iterator<Item = &ExistingComponent> {
        self.of_type(ComponentType::Sfp)
            .filter(|c| !matches!(c.assignment, Some(Assignment::Port { .. })))
    }
}
