//! PCIe lane budget
//!
//! The budget is the sum of the installed CPUs' lane counts. Consumers are
//! add-in cards (except risers) and NVMe drives, weighted by quantity.

use crate::domain::entities::{ComponentSpec, CpuSpec, ResolvedBuild};
use crate::domain::value_objects::Extracted;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneBudget {
    /// `None` when no CPU with a known lane count is present
    pub available: Option<u32>,
    pub used: u32,
    /// Consumers whose lane count is the extractor default
    pub assumed: Vec<String>,
}

/// Result of adding a consumer to the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneCheck {
    Within { used: u32, available: u32 },
    Exceeded { required: u32, available: u32, deficit: u32 },
    /// No CPU lane count to compare against
    Unknown,
}

impl LaneBudget {
    pub fn from_build(build: &ResolvedBuild) -> Self {
        let mut budget = LaneBudget::default();
        for (component, spec) in build.resolved() {
            match spec {
                ComponentSpec::Cpu(cpu) => budget.add_cpu(cpu, component.quantity),
                other => {
                    if let Some(lanes) = other.lane_demand() {
                        budget.add_consumer(spec.uuid(), lanes, component.quantity);
                    }
                }
            }
        }
        budget
    }

    pub fn add_cpu(&mut self, cpu: &CpuSpec, quantity: u32) {
        if let Some(lanes) = cpu.pcie_lanes {
            let total = u32::from(lanes).saturating_mul(quantity.max(1));
            self.available = Some(self.available.unwrap_or(0).saturating_add(total));
        }
    }

    pub fn add_consumer(&mut self, uuid: &str, lanes: Extracted<u8>, quantity: u32) {
        if lanes.is_defaulted() && !self.assumed.iter().any(|u| u == uuid) {
            self.assumed.push(uuid.to_string());
        }
        self.used = self
            .used
            .saturating_add(u32::from(lanes.value()).saturating_mul(quantity.max(1)));
    }

    pub fn check(&self) -> LaneCheck {
        match self.available {
            None => LaneCheck::Unknown,
            Some(available) if self.used > available => LaneCheck::Exceeded {
                required: self.used,
                available,
                deficit: self.used - available,
            },
            Some(available) => LaneCheck::Within {
                used: self.used,
                available,
            },
        }
    }
}
