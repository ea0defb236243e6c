//! Storage interface and drive form factor value objects

use serde::{Deserialize, Serialize};

/// Storage transport protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageProtocol {
    Sata,
    Sas,
    Nvme,
    #[default]
    Unknown,
}

impl StorageProtocol {
    /// Can a controller/backplane speaking `self` drive a device speaking `device`?
    ///
    /// SAS controllers and backplanes also drive SATA devices; the reverse is not true.
    pub fn can_host(&self, device: StorageProtocol) -> bool {
        match (self, device) {
            (a, b) if *a == b => true,
            (StorageProtocol::Sas, StorageProtocol::Sata) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageProtocol::Sata => "SATA",
            StorageProtocol::Sas => "SAS",
            StorageProtocol::Nvme => "NVMe",
            StorageProtocol::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StorageProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized storage interface: protocol plus generation (0 = unknown)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct StorageInterface {
    pub protocol: StorageProtocol,
    pub generation: u8,
}

impl StorageInterface {
    pub fn new(protocol: StorageProtocol, generation: u8) -> Self {
        Self {
            protocol,
            generation,
        }
    }

    pub fn is_known(&self) -> bool {
        self.protocol != StorageProtocol::Unknown
    }
}

impl std::fmt::Display for StorageInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.generation == 0 {
            write!(f, "{}", self.protocol)
        } else {
            write!(f, "{} gen {}", self.protocol, self.generation)
        }
    }
}

/// Physical drive form factor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveFormFactor {
    #[serde(rename = "2.5-inch")]
    Inch25,
    #[serde(rename = "3.5-inch")]
    Inch35,
    #[serde(rename = "M.2")]
    M2,
    #[serde(rename = "U.2")]
    U2,
    Other(String),
}

impl DriveFormFactor {
    /// Drives that sit in a chassis drive bay (as opposed to a board connector)
    pub fn uses_drive_bay(&self) -> bool {
        matches!(self, DriveFormFactor::Inch25 | DriveFormFactor::Inch35)
    }

    pub fn label(&self) -> &str {
        match self {
            DriveFormFactor::Inch25 => "2.5-inch",
            DriveFormFactor::Inch35 => "3.5-inch",
            DriveFormFactor::M2 => "M.2",
            DriveFormFactor::U2 => "U.2",
            DriveFormFactor::Other(raw) => raw.as_str(),
        }
    }
}

impl std::fmt::Display for DriveFormFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
