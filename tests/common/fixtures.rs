//! Test fixtures - a reusable catalog and build helpers.

use std::sync::Arc;

use rackfit::config::EngineConfig;
use rackfit::infrastructure::{InMemoryBuildStore, InMemorySpecRepository, ManualClock};
use rackfit::{Assignment, ComponentType, Engine, ExistingComponent, ExistingComponentSet};
use serde_json::json;

/// Catalog shared by scenario tests
pub fn catalog() -> InMemorySpecRepository {
    InMemorySpecRepository::new()
        // CPUs
        .with(
            ComponentType::Cpu,
            "cpu-i9",
            json!({"model": "Core i9-13900K", "socket": "LGA1700", "memory_types": ["DDR5"], "pcie_lanes": 20}),
        )
        .with(
            ComponentType::Cpu,
            "cpu-6338",
            json!({
                "model": "Xeon Gold 6338",
                "socket": "LGA4189",
                "memory_types": ["DDR4-3200"],
                "max_memory_capacity": "6TB",
                "ecc_required": true,
                "pcie_lanes": 64,
                "pcie_generation": 4
            }),
        )
        // Motherboards
        .with(
            ComponentType::Motherboard,
            "mb-z790",
            json!({"socket": "lga 1700", "max_cpus": 1, "memory_types": ["DDR5"], "memory_slots": 4}),
        )
        .with(
            ComponentType::Motherboard,
            "mb-x12dpi",
            json!({
                "socket": "LGA 4189",
                "max_cpus": 1,
                "memory_types": ["DDR4"],
                "memory_slots": 8,
                "ecc_support": true,
                "pcie_slots": [{"size": "x16", "count": 2}],
                "riser_slots": [{"size": "x16", "count": 1}],
                "onboard_nics": [{"ports": 2, "port_type": "RJ45", "speed": "10GbE"}]
            }),
        )
        .with(
            ComponentType::Motherboard,
            "mb-x8-only",
            json!({"socket": "LGA4189", "pcie_slots": {"x8": 2}}),
        )
        .with(
            ComponentType::Motherboard,
            "mb-bogus-slots",
            json!({"socket": "LGA4189", "pcie_slots": {"x16": 3_000_000}}),
        )
        // Memory
        .with(
            ComponentType::Ram,
            "ram-ecc",
            json!({"memory_type": "DDR4-3200", "capacity": "32GB", "ecc": true}),
        )
        .with(
            ComponentType::Ram,
            "ram-plain",
            json!({"memory_type": "DDR4-3200", "capacity": "32GB", "ecc": false}),
        )
        // Expansion
        .with(
            ComponentType::PciCard,
            "riser-2x8",
            json!({"subtype": "riser", "slot_size": "x16", "provides_slots": [{"size": "x8", "count": 2}]}),
        )
        .with(
            ComponentType::PciCard,
            "card-x4",
            json!({"subtype": "accelerator", "interface": "PCIe 4.0 x4"}),
        )
        .with(
            ComponentType::Nic,
            "nic-25g",
            json!({"ports": 2, "port_type": "SFP28", "speed": "25GbE", "interface": "PCIe 4.0 x8"}),
        )
        .with(
            ComponentType::Nic,
            "nic-quad-25g",
            json!({"ports": 4, "port_type": "SFP28", "speed": "25GbE", "interface": "PCIe 4.0 x8"}),
        )
        .with(
            ComponentType::Nic,
            "nic-unspecified",
            json!({"port_type": "SFP+", "ports": 2}),
        )
        // Transceivers
        .with(ComponentType::Sfp, "sfp-10g", json!({"type": "SFP+", "speed": "10G"}))
        .with(ComponentType::Sfp, "sfp-25g", json!({"type": "SFP28", "speed": "25G"}))
}

/// Build snapshot builder
pub struct TestBuild {
    set: ExistingComponentSet,
}

impl TestBuild {
    pub fn new(build_id: &str) -> Self {
        Self {
            set: ExistingComponentSet::new(build_id),
        }
    }

    pub fn with(mut self, ty: ComponentType, uuid: &str) -> Self {
        self.set.push(ExistingComponent::new(ty, uuid));
        self
    }

    pub fn with_qty(mut self, ty: ComponentType, uuid: &str, quantity: u32) -> Self {
        self.set
            .push(ExistingComponent::new(ty, uuid).with_quantity(quantity));
        self
    }

    pub fn with_assigned(mut self, ty: ComponentType, uuid: &str, assignment: Assignment) -> Self {
        self.set
            .push(ExistingComponent::new(ty, uuid).with_assignment(assignment));
        self
    }

    pub fn set(self) -> ExistingComponentSet {
        self.set
    }
}

pub fn slot(id: &str) -> Assignment {
    Assignment::Slot {
        slot_id: id.to_string(),
    }
}

pub fn port(nic: &str, index: u8) -> Assignment {
    Assignment::Port {
        nic_uuid: nic.to_string(),
        port_index: index,
    }
}

/// Engine over the fixture catalog and the given builds
pub fn engine_with(builds: Vec<ExistingComponentSet>) -> Engine {
    engine_with_config(builds, EngineConfig::default())
}

pub fn engine_with_config(builds: Vec<ExistingComponentSet>, config: EngineConfig) -> Engine {
    let store = InMemoryBuildStore::new();
    for build in builds {
        store.put(build);
    }
    Engine::builder(Arc::new(catalog()), Arc::new(store))
        .config(config)
        .clock(Arc::new(ManualClock::default()))
        .build()
}
