//! Component type value object - which kind of hardware a spec describes

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of hardware component tracked in a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Cpu,
    Motherboard,
    Ram,
    Storage,
    Nic,
    Chassis,
    Caddy,
    /// Generic PCIe add-in card (GPU, accelerator, riser)
    #[serde(rename = "pciecard", alias = "pcie_card")]
    PciCard,
    /// Host bus adapter / RAID controller
    #[serde(rename = "hbacard", alias = "hba_card", alias = "hba")]
    Hba,
    /// Pluggable network transceiver
    Sfp,
}

impl ComponentType {
    pub const ALL: [ComponentType; 10] = [
        ComponentType::Cpu,
        ComponentType::Motherboard,
        ComponentType::Ram,
        ComponentType::Storage,
        ComponentType::Nic,
        ComponentType::Chassis,
        ComponentType::Caddy,
        ComponentType::PciCard,
        ComponentType::Hba,
        ComponentType::Sfp,
    ];

    /// Canonical type string (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Cpu => "cpu",
            ComponentType::Motherboard => "motherboard",
            ComponentType::Ram => "ram",
            ComponentType::Storage => "storage",
            ComponentType::Nic => "nic",
            ComponentType::Chassis => "chassis",
            ComponentType::Caddy => "caddy",
            ComponentType::PciCard => "pciecard",
            ComponentType::Hba => "hbacard",
            ComponentType::Sfp => "sfp",
        }
    }

    /// Human-readable name used in messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentType::Cpu => "CPU",
            ComponentType::Motherboard => "motherboard",
            ComponentType::Ram => "memory module",
            ComponentType::Storage => "storage device",
            ComponentType::Nic => "network card",
            ComponentType::Chassis => "chassis",
            ComponentType::Caddy => "drive caddy",
            ComponentType::PciCard => "PCIe card",
            ComponentType::Hba => "HBA card",
            ComponentType::Sfp => "transceiver",
        }
    }

    /// Types whose instances occupy an expansion slot
    pub fn occupies_expansion_slot(&self) -> bool {
        matches!(
            self,
            ComponentType::Nic | ComponentType::PciCard | ComponentType::Hba
        )
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let ty = match lowered.as_str() {
            "cpu" | "processor" => ComponentType::Cpu,
            "motherboard" | "mainboard" => ComponentType::Motherboard,
            "ram" | "memory" => ComponentType::Ram,
            "storage" | "drive" | "disk" => ComponentType::Storage,
            "nic" | "network" => ComponentType::Nic,
            "chassis" => ComponentType::Chassis,
            "caddy" => ComponentType::Caddy,
            "pciecard" | "pcie_card" | "pcie" => ComponentType::PciCard,
            "hbacard" | "hba_card" | "hba" => ComponentType::Hba,
            "sfp" | "transceiver" => ComponentType::Sfp,
            _ => return Err(s.to_string()),
        };
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("CPU".parse::<ComponentType>(), Ok(ComponentType::Cpu));
        assert_eq!("pcie_card".parse::<ComponentType>(), Ok(ComponentType::PciCard));
        assert_eq!(" hba ".parse::<ComponentType>(), Ok(ComponentType::Hba));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!("toaster".parse::<ComponentType>(), Err("toaster".to_string()));
    }

    #[test]
    fn display_matches_serde_name() {
        for ty in ComponentType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty));
        }
    }

    #[test]
    fn only_cards_occupy_slots() {
        assert!(ComponentType::Nic.occupies_expansion_slot());
        assert!(ComponentType::Hba.occupies_expansion_slot());
        assert!(!ComponentType::Ram.occupies_expansion_slot());
        assert!(!ComponentType::Sfp.occupies_expansion_slot());
    }
}
