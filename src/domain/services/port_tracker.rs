//! NIC port tracking and module compatibility
//!
//! Port inventories cover add-on NICs in the build and the onboard
//! controllers of the motherboard (ids `<mb-uuid>:onboard<N>`). Occupancy
//! comes from transceiver `Port` assignments.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    Assignment, ComponentSpec, NicSource, PortInventory, PortUtilization, ResolvedBuild, SfpSpec,
};
use crate::domain::value_objects::{ComponentType, PortType};

/// Why a module cannot go into a port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ModuleMismatch {
    /// The cage does not take this module family
    Type { port: PortType, module: PortType },
    /// The module is faster than the port can run
    Speed { module_mbps: u32, port_mbps: u32 },
}

impl std::fmt::Display for ModuleMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleMismatch::Type { port, module } if port.is_copper() => {
                write!(f, "{} ports take no pluggable modules ({} given)", port, module)
            }
            ModuleMismatch::Type { port, module } => {
                write!(f, "{} port does not accept {} modules", port, module)
            }
            ModuleMismatch::Speed {
                module_mbps,
                port_mbps,
            } => write!(
                f,
                "module runs at {} Mbps but the port tops out at {} Mbps",
                module_mbps, port_mbps
            ),
        }
    }
}

/// Check a module against a port type and its maximum speed.
///
/// The type table is authoritative; speed may only shift down.
pub fn check_module_fit(
    port_type: &PortType,
    port_max_mbps: Option<u32>,
    module: &SfpSpec,
) -> Result<(), ModuleMismatch> {
    if !port_type.accepts(&module.module_type) {
        return Err(ModuleMismatch::Type {
            port: port_type.clone(),
            module: module.module_type.clone(),
        });
    }
    if let (Some(module_mbps), Some(port_mbps)) = (module.effective_speed_mbps(), port_max_mbps) {
        if module_mbps > port_mbps {
            return Err(ModuleMismatch::Speed {
                module_mbps,
                port_mbps,
            });
        }
    }
    Ok(())
}

/// Port usage of one NIC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicPortSummary {
    pub nic_id: String,
    pub source: NicSource,
    pub port_type: PortType,
    pub max_speed_mbps: Option<u32>,
    pub utilization: PortUtilization,
    pub available_ports: Vec<u8>,
}

/// Port usage across the build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSummary {
    pub nics: Vec<NicPortSummary>,
    pub total_ports: u32,
    pub used_ports: u32,
    pub available_ports: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortIssueKind {
    UnknownNic,
    PortOutOfRange,
    DuplicatePort,
    IncompatibleModule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortIssue {
    pub kind: PortIssueKind,
    pub module_uuid: String,
    pub nic_id: String,
    pub port_index: u8,
    pub message: String,
}

/// Port views over one resolved build
pub struct PortTracker<'a> {
    build: &'a ResolvedBuild,
}

impl<'a> PortTracker<'a> {
    pub fn new(build: &'a ResolvedBuild) -> Self {
        Self { build }
    }

    /// Every NIC in the build, add-on cards first, then onboard controllers
    pub fn inventories(&self) -> Vec<PortInventory> {
        let mut out = Vec::new();

        for (component, spec) in self.build.resolved_of(ComponentType::Nic) {
            if let ComponentSpec::Nic(nic) = spec {
                out.push(PortInventory {
                    nic_id: component.uuid.clone(),
                    source: NicSource::AddOn,
                    port_type: nic.port_type.clone(),
                    max_speed_mbps: nic.max_speed_mbps(),
                    total_ports: nic.ports,
                    occupied: BTreeMap::new(),
                });
            }
        }

        if let Some((component, board)) = self.build.motherboard() {
            for (n, onboard) in board.onboard_nics.iter().enumerate() {
                out.push(PortInventory {
                    nic_id: onboard_nic_id(&component.uuid, n + 1),
                    source: NicSource::Onboard,
                    port_type: onboard.port_type.clone(),
                    max_speed_mbps: onboard
                        .speed_mbps
                        .or_else(|| onboard.port_type.nominal_speed_mbps()),
                    total_ports: onboard.ports,
                    occupied: BTreeMap::new(),
                });
            }
        }

        for module in self.build.set.of_type(ComponentType::Sfp) {
            if let Some(Assignment::Port {
                nic_uuid,
                port_index,
            }) = &module.assignment
            {
                if let Some(inventory) = out.iter_mut().find(|i| &i.nic_id == nic_uuid) {
                    inventory
                        .occupied
                        .entry(*port_index)
                        .or_insert_with(|| module.uuid.clone());
                }
            }
        }

        out
    }

    pub fn port_inventory(&self, nic_id: &str) -> Option<PortInventory> {
        self.inventories().into_iter().find(|i| i.nic_id == nic_id)
    }

    pub fn available_ports(&self, nic_id: &str) -> Vec<u8> {
        self.port_inventory(nic_id)
            .map(|i| i.available_ports())
            .unwrap_or_default()
    }

    pub fn next_available_port(&self, nic_id: &str) -> Option<u8> {
        self.port_inventory(nic_id)?.next_available_port()
    }

    pub fn is_port_available(&self, nic_id: &str, port_index: u8) -> bool {
        self.port_inventory(nic_id)
            .is_some_and(|i| i.is_port_available(port_index))
    }

    pub fn utilization(&self, nic_id: &str) -> Option<PortUtilization> {
        self.port_inventory(nic_id).map(|i| i.utilization())
    }

    pub fn summary(&self) -> PortSummary {
        let nics: Vec<NicPortSummary> = self
            .inventories()
            .into_iter()
            .map(|inventory| NicPortSummary {
                utilization: inventory.utilization(),
                available_ports: inventory.available_ports(),
                nic_id: inventory.nic_id,
                source: inventory.source,
                port_type: inventory.port_type,
                max_speed_mbps: inventory.max_speed_mbps,
            })
            .collect();
        let total_ports = nics.iter().map(|n| u32::from(n.utilization.total)).sum();
        let used_ports = nics.iter().map(|n| u32::from(n.utilization.used)).sum();
        PortSummary {
            nics,
            total_ports,
            used_ports,
            available_ports: total_ports - used_ports,
        }
    }

    /// Cross-check every recorded transceiver placement
    pub fn validate_port_assignments(&self) -> Vec<PortIssue> {
        let inventories = self.inventories();
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for module in self.build.set.of_type(ComponentType::Sfp) {
            let Some(Assignment::Port {
                nic_uuid,
                port_index,
            }) = &module.assignment
            else {
                continue;
            };
            let issue = |kind, message: String| PortIssue {
                kind,
                module_uuid: module.uuid.clone(),
                nic_id: nic_uuid.clone(),
                port_index: *port_index,
                message,
            };

            let Some(inventory) = inventories.iter().find(|i| &i.nic_id == nic_uuid) else {
                issues.push(issue(
                    PortIssueKind::UnknownNic,
                    format!("NIC {} is not part of this build", nic_uuid),
                ));
                continue;
            };

            if *port_index == 0 || *port_index > inventory.total_ports {
                issues.push(issue(
                    PortIssueKind::PortOutOfRange,
                    format!(
                        "port {} does not exist on {} ({} ports)",
                        port_index, nic_uuid, inventory.total_ports
                    ),
                ));
                continue;
            }

            if !seen.insert((nic_uuid.clone(), *port_index)) {
                issues.push(issue(
                    PortIssueKind::DuplicatePort,
                    format!("port {} of {} holds more than one module", port_index, nic_uuid),
                ));
            }

            if let Some(sfp) = self.build.spec_of(module).and_then(|s| s.as_sfp()) {
                if let Err(mismatch) =
                    check_module_fit(&inventory.port_type, inventory.max_speed_mbps, sfp)
                {
                    issues.push(issue(PortIssueKind::IncompatibleModule, mismatch.to_string()));
                }
            }
        }

        issues
    }
}

pub fn onboard_nic_id(motherboard_uuid: &str, n: usize) -> String {
    format!("{}:onboard{}", motherboard_uuid, n)
}
