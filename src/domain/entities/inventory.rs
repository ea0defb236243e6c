//! Derived resource inventories (slots and ports)
//!
//! Inventories have no persistence of their own. Trackers rebuild them from
//! the motherboard/riser/NIC specs plus the build's assignment records on
//! every call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{PortType, SlotSize};

/// Which slot pool a slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotPool {
    /// PCIe expansion slots (native + riser-provided)
    Pcie,
    /// Motherboard riser connectors
    Riser,
}

/// Where a slot physically comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotSource {
    Motherboard,
    /// Provided by the n-th installed riser (1-based)
    Riser { ordinal: u32, riser_uuid: String },
}

/// A single physical slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    pub size: SlotSize,
    pub source: SlotSource,
}

/// Counts per size class
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub total: BTreeMap<SlotSize, u32>,
    pub used: BTreeMap<SlotSize, u32>,
    pub available: BTreeMap<SlotSize, u32>,
}

impl SlotAvailability {
    pub fn total_slots(&self) -> u32 {
        self.total.values().sum()
    }

    pub fn used_slots(&self) -> u32 {
        self.used.values().sum()
    }

    pub fn available_slots(&self) -> u32 {
        self.available.values().sum()
    }

    pub fn available_of(&self, size: SlotSize) -> u32 {
        self.available.get(&size).copied().unwrap_or(0)
    }
}

/// Every slot of a pool plus current occupancy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInventory {
    pub pool: SlotPool,
    pub slots: Vec<Slot>,
    /// slot id → component UUID
    pub used: BTreeMap<String, String>,
}

impl SlotInventory {
    pub fn new(pool: SlotPool) -> Self {
        Self {
            pool,
            slots: Vec::new(),
            used: BTreeMap::new(),
        }
    }

    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn is_free(&self, id: &str) -> bool {
        !self.used.contains_key(id)
    }

    pub fn free_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| self.is_free(&s.id))
    }

    pub fn availability(&self) -> SlotAvailability {
        let mut out = SlotAvailability::default();
        for slot in &self.slots {
            *out.total.entry(slot.size).or_insert(0) += 1;
            let bucket = if self.is_free(&slot.id) {
                &mut out.available
            } else {
                &mut out.used
            };
            *bucket.entry(slot.size).or_insert(0) += 1;
        }
        for size in out.total.keys() {
            out.used.entry(*size).or_insert(0);
            out.available.entry(*size).or_insert(0);
        }
        out
    }
}

/// Whether a NIC is an add-in card or built into the motherboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NicSource {
    AddOn,
    Onboard,
}

/// Port occupancy of one NIC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInventory {
    pub nic_id: String,
    pub source: NicSource,
    pub port_type: PortType,
    pub max_speed_mbps: Option<u32>,
    pub total_ports: u8,
    /// port index (1-based) → transceiver UUID
    pub occupied: BTreeMap<u8, String>,
}

/// Port usage numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortUtilization {
    pub total: u8,
    pub used: u8,
    pub available: u8,
    pub percent: f64,
}

impl PortInventory {
    pub fn is_port_available(&self, index: u8) -> bool {
        index >= 1 && index <= self.total_ports && !self.occupied.contains_key(&index)
    }

    pub fn available_ports(&self) -> Vec<u8> {
        (1..=self.total_ports)
            .filter(|i| !self.occupied.contains_key(i))
            .collect()
    }

    pub fn next_available_port(&self) -> Option<u8> {
        (1..=self.total_ports).find(|i| !self.occupied.contains_key(i))
    }

    pub fn utilization(&self) -> PortUtilization {
        let used = self
            .occupied
            .keys()
            .filter(|i| **i >= 1 && **i <= self.total_ports)
            .count() as u8;
        let percent = if self.total_ports == 0 {
            0.0
        } else {
            (f64::from(used) / f64::from(self.total_ports) * 1000.0).round() / 10.0
        };
        PortUtilization {
            total: self.total_ports,
            used,
            available: self.total_ports.saturating_sub(used),
            percent,
        }
    }
}
