//! Typed component specifications
//!
//! A `ComponentSpec` is the canonical, immutable description of a component
//! model. Raw repository documents are turned into these variants once, by
//! the extraction layer; validators and trackers never look at raw maps.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    ComponentType, DriveFormFactor, Extracted, PortType, SlotSize, StorageInterface,
    StorageProtocol,
};

/// PCIe lanes an NVMe drive takes from the CPU budget
pub const NVME_DRIVE_LANES: u8 = 4;

/// Upper bound on the slots a single board or riser may declare per field
pub const MAX_SLOTS_PER_GROUP: u32 = 64;

/// A homogeneous group of PCIe slots (e.g. "2 × x16")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGroup {
    pub size: SlotSize,
    pub count: u32,
}

/// A homogeneous group of chassis drive bays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BayGroup {
    pub form_factor: DriveFormFactor,
    pub count: u32,
}

/// A network controller soldered onto a motherboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardNic {
    pub ports: u8,
    pub port_type: PortType,
    pub speed_mbps: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSpec {
    pub uuid: String,
    pub model: Option<String>,
    /// Normalized socket string
    pub socket: Option<String>,
    /// Normalized memory types ("DDR5")
    pub memory_types: Vec<String>,
    pub max_memory_gb: Option<u64>,
    pub max_memory_mhz: Option<u32>,
    pub ecc_required: bool,
    pub ecc_supported: bool,
    pub pcie_lanes: Option<u16>,
    pub pcie_generation: Option<u8>,
    pub cores: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotherboardSpec {
    pub uuid: String,
    pub model: Option<String>,
    pub socket: Option<String>,
    pub max_cpus: u32,
    pub chipset: Option<String>,
    /// Normalized board form factor ("EATX")
    pub form_factor: Option<String>,
    pub memory_types: Vec<String>,
    pub memory_slots: Option<u32>,
    pub max_memory_gb: Option<u64>,
    pub max_memory_mhz: Option<u32>,
    pub ecc_supported: Option<bool>,
    /// Accepted DIMM form factors ("DIMM", "SO-DIMM")
    pub memory_form_factors: Vec<String>,
    pub pcie_generation: Option<u8>,
    pub pcie_slots: Vec<SlotGroup>,
    pub riser_slots: Vec<SlotGroup>,
    pub m2_slots: u32,
    pub m2_protocols: Vec<StorageProtocol>,
    pub u2_slots: u32,
    pub sata_ports: u32,
    pub sas_ports: u32,
    pub onboard_nics: Vec<OnboardNic>,
}

impl MotherboardSpec {
    pub fn total_pcie_slots(&self) -> u32 {
        self.pcie_slots.iter().map(|g| g.count).sum()
    }

    pub fn total_riser_slots(&self) -> u32 {
        self.riser_slots.iter().map(|g| g.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RamSpec {
    pub uuid: String,
    pub model: Option<String>,
    pub memory_type: Option<String>,
    /// Parsed DDR generation, 0 when undetectable
    pub generation: u8,
    pub capacity_gb: Option<u64>,
    pub speed_mhz: Option<u32>,
    pub ecc: bool,
    /// "DIMM" / "SO-DIMM"
    pub form_factor: Option<String>,
    /// "RDIMM" / "LRDIMM" / "UDIMM"
    pub module_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSpec {
    pub uuid: String,
    pub model: Option<String>,
    pub interface: StorageInterface,
    pub form_factor: Option<DriveFormFactor>,
    pub capacity_gb: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicSpec {
    pub uuid: String,
    pub model: Option<String>,
    pub ports: u8,
    pub port_type: PortType,
    pub speed_mbps: Option<u32>,
    pub lanes: Extracted<u8>,
    pub slot_size: Extracted<SlotSize>,
    pub pcie_generation: Option<u8>,
}

impl NicSpec {
    /// Per-port line rate, falling back to the cage's nominal rate
    pub fn max_speed_mbps(&self) -> Option<u32> {
        self.speed_mbps.or_else(|| self.port_type.nominal_speed_mbps())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChassisSpec {
    pub uuid: String,
    pub model: Option<String>,
    pub motherboard_form_factors: Vec<String>,
    pub drive_bays: Vec<BayGroup>,
    pub backplane_protocols: Vec<StorageProtocol>,
    pub expansion_slots: Option<u32>,
}

impl ChassisSpec {
    pub fn bays_of(&self, form_factor: &DriveFormFactor) -> u32 {
        self.drive_bays
            .iter()
            .filter(|b| &b.form_factor == form_factor)
            .map(|b| b.count)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaddySpec {
    pub uuid: String,
    pub model: Option<String>,
    /// Drive size the caddy holds
    pub drive_form_factor: Option<DriveFormFactor>,
    /// Bay size the caddy fits into
    pub bay_form_factor: Option<DriveFormFactor>,
}

/// What a generic PCIe card is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PciCardKind {
    Riser,
    Gpu,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PciCardSpec {
    pub uuid: String,
    pub model: Option<String>,
    pub kind: PciCardKind,
    pub lanes: Extracted<u8>,
    pub slot_size: Extracted<SlotSize>,
    pub pcie_generation: Option<u8>,
    /// Slots a riser exposes (empty for other cards)
    pub provides_slots: Vec<SlotGroup>,
}

impl PciCardSpec {
    pub fn is_riser(&self) -> bool {
        self.kind == PciCardKind::Riser
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HbaSpec {
    pub uuid: String,
    pub model: Option<String>,
    pub lanes: Extracted<u8>,
    pub slot_size: Extracted<SlotSize>,
    pub pcie_generation: Option<u8>,
    pub protocols: Vec<StorageProtocol>,
    pub max_devices: Option<u32>,
    pub internal_ports: Option<u32>,
}

impl HbaSpec {
    pub fn hosts(&self, device: StorageProtocol) -> bool {
        self.protocols.iter().any(|p| p.can_host(device))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfpSpec {
    pub uuid: String,
    pub model: Option<String>,
    pub module_type: PortType,
    pub speed_mbps: Option<u32>,
}

impl SfpSpec {
    pub fn effective_speed_mbps(&self) -> Option<u32> {
        self.speed_mbps
            .or_else(|| self.module_type.nominal_speed_mbps())
    }
}

/// Canonical specification of one component model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ComponentSpec {
    Cpu(CpuSpec),
    Motherboard(MotherboardSpec),
    Ram(RamSpec),
    Storage(StorageSpec),
    Nic(NicSpec),
    Chassis(ChassisSpec),
    Caddy(CaddySpec),
    #[serde(rename = "pciecard")]
    PciCard(PciCardSpec),
    #[serde(rename = "hbacard")]
    Hba(HbaSpec),
    Sfp(SfpSpec),
}

impl ComponentSpec {
    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentSpec::Cpu(_) => ComponentType::Cpu,
            ComponentSpec::Motherboard(_) => ComponentType::Motherboard,
            ComponentSpec::Ram(_) => ComponentType::Ram,
            ComponentSpec::Storage(_) => ComponentType::Storage,
            ComponentSpec::Nic(_) => ComponentType::Nic,
            ComponentSpec::Chassis(_) => ComponentType::Chassis,
            ComponentSpec::Caddy(_) => ComponentType::Caddy,
            ComponentSpec::PciCard(_) => ComponentType::PciCard,
            ComponentSpec::Hba(_) => ComponentType::Hba,
            ComponentSpec::Sfp(_) => ComponentType::Sfp,
        }
    }

    pub fn uuid(&self) -> &str {
        match self {
            ComponentSpec::Cpu(s) => &s.uuid,
            ComponentSpec::Motherboard(s) => &s.uuid,
            ComponentSpec::Ram(s) => &s.uuid,
            ComponentSpec::Storage(s) => &s.uuid,
            ComponentSpec::Nic(s) => &s.uuid,
            ComponentSpec::Chassis(s) => &s.uuid,
            ComponentSpec::Caddy(s) => &s.uuid,
            ComponentSpec::PciCard(s) => &s.uuid,
            ComponentSpec::Hba(s) => &s.uuid,
            ComponentSpec::Sfp(s) => &s.uuid,
        }
    }

    pub fn model(&self) -> Option<&str> {
        let model = match self {
            ComponentSpec::Cpu(s) => &s.model,
            ComponentSpec::Motherboard(s) => &s.model,
            ComponentSpec::Ram(s) => &s.model,
            ComponentSpec::Storage(s) => &s.model,
            ComponentSpec::Nic(s) => &s.model,
            ComponentSpec::Chassis(s) => &s.model,
            ComponentSpec::Caddy(s) => &s.model,
            ComponentSpec::PciCard(s) => &s.model,
            ComponentSpec::Hba(s) => &s.model,
            ComponentSpec::Sfp(s) => &s.model,
        };
        model.as_deref()
    }

    /// Model name if known, UUID otherwise
    pub fn label(&self) -> &str {
        self.model().unwrap_or_else(|| self.uuid())
    }

    /// PCIe lanes this component draws from the CPU budget, if any.
    ///
    /// Risers only route lanes to the cards they carry, so they draw none.
    pub fn lane_demand(&self) -> Option<Extracted<u8>> {
        match self {
            ComponentSpec::Nic(s) => Some(s.lanes),
            ComponentSpec::PciCard(s) if !s.is_riser() => Some(s.lanes),
            ComponentSpec::Hba(s) => Some(s.lanes),
            ComponentSpec::Storage(s) if s.interface.protocol == StorageProtocol::Nvme => {
                Some(Extracted::Parsed(NVME_DRIVE_LANES))
            }
            _ => None,
        }
    }

    /// Slot size class a card needs, for components that occupy a slot
    pub fn required_slot(&self) -> Option<SlotSize> {
        self.slot_requirement().map(|size| size.value())
    }

    /// Like `required_slot`, but remembers whether the width was assumed
    pub fn slot_requirement(&self) -> Option<Extracted<SlotSize>> {
        match self {
            ComponentSpec::Nic(s) => Some(s.slot_size),
            ComponentSpec::PciCard(s) => Some(s.slot_size),
            ComponentSpec::Hba(s) => Some(s.slot_size),
            _ => None,
        }
    }

    pub fn pcie_generation(&self) -> Option<u8> {
        match self {
            ComponentSpec::Cpu(s) => s.pcie_generation,
            ComponentSpec::Motherboard(s) => s.pcie_generation,
            ComponentSpec::Nic(s) => s.pcie_generation,
            ComponentSpec::PciCard(s) => s.pcie_generation,
            ComponentSpec::Hba(s) => s.pcie_generation,
            _ => None,
        }
    }

    pub fn as_cpu(&self) -> Option<&CpuSpec> {
        match self {
            ComponentSpec::Cpu(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_motherboard(&self) -> Option<&MotherboardSpec> {
        match self {
            ComponentSpec::Motherboard(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ram(&self) -> Option<&RamSpec> {
        match self {
            ComponentSpec::Ram(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_storage(&self) -> Option<&StorageSpec> {
        match self {
            ComponentSpec::Storage(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_nic(&self) -> Option<&NicSpec> {
        match self {
            ComponentSpec::Nic(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_chassis(&self) -> Option<&ChassisSpec> {
        match self {
            ComponentSpec::Chassis(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_caddy(&self) -> Option<&CaddySpec> {
        match self {
            ComponentSpec::Caddy(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pci_card(&self) -> Option<&PciCardSpec> {
        match self {
            ComponentSpec::PciCard(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_hba(&self) -> Option<&HbaSpec> {
        match self {
            ComponentSpec::Hba(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sfp(&self) -> Option<&SfpSpec> {
        match self {
            ComponentSpec::Sfp(s) => Some(s),
            _ => None,
        }
    }
}
