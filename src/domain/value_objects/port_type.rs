//! Network port / transceiver form factors
//!
//! `PortType` names the mechanical family of a NIC cage or of a pluggable
//! module. Compatibility between the two is decided by the explicit upward
//! table in [`PortType::accepts`], never by inference from names or speeds.

use serde::{Deserialize, Serialize};

/// Port cage / module form factor
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PortType {
    #[serde(rename = "SFP")]
    Sfp,
    #[serde(rename = "SFP+")]
    SfpPlus,
    #[serde(rename = "SFP28")]
    Sfp28,
    #[serde(rename = "SFP56")]
    Sfp56,
    #[serde(rename = "QSFP+")]
    QsfpPlus,
    #[serde(rename = "QSFP28")]
    Qsfp28,
    #[serde(rename = "QSFP56")]
    Qsfp56,
    #[serde(rename = "QSFP-DD")]
    QsfpDd,
    /// Copper twisted pair; takes no pluggable modules
    #[serde(rename = "RJ45")]
    Rj45,
    /// Anything the normalizer could not classify (kept verbatim)
    Other(String),
}

impl PortType {
    /// Module types a port of this type physically and electrically accepts.
    ///
    /// Faster cages of one mechanical family accept the slower modules of the
    /// same family. QSFP cages do not take SFP modules without an adapter,
    /// and copper ports accept nothing.
    pub fn accepted_modules(&self) -> &'static [PortType] {
        use PortType::*;
        match self {
            Sfp => &[Sfp],
            SfpPlus => &[SfpPlus, Sfp],
            Sfp28 => &[Sfp28, SfpPlus, Sfp],
            Sfp56 => &[Sfp56, Sfp28, SfpPlus, Sfp],
            QsfpPlus => &[QsfpPlus],
            Qsfp28 => &[Qsfp28, QsfpPlus],
            Qsfp56 => &[Qsfp56, Qsfp28, QsfpPlus],
            QsfpDd => &[QsfpDd, Qsfp56, Qsfp28, QsfpPlus],
            Rj45 | Other(_) => &[],
        }
    }

    /// Does a port of this type accept a module of type `module`?
    pub fn accepts(&self, module: &PortType) -> bool {
        self.accepted_modules().contains(module)
    }

    /// Nominal line rate of the form factor in Mbps, if it has one
    pub fn nominal_speed_mbps(&self) -> Option<u32> {
        use PortType::*;
        match self {
            Sfp => Some(1_000),
            SfpPlus => Some(10_000),
            Sfp28 => Some(25_000),
            Sfp56 => Some(50_000),
            QsfpPlus => Some(40_000),
            Qsfp28 => Some(100_000),
            Qsfp56 => Some(200_000),
            QsfpDd => Some(400_000),
            Rj45 | Other(_) => None,
        }
    }

    pub fn is_copper(&self) -> bool {
        matches!(self, PortType::Rj45)
    }

    pub fn label(&self) -> &str {
        use PortType::*;
        match self {
            Sfp => "SFP",
            SfpPlus => "SFP+",
            Sfp28 => "SFP28",
            Sfp56 => "SFP56",
            QsfpPlus => "QSFP+",
            Qsfp28 => "QSFP28",
            Qsfp56 => "QSFP56",
            QsfpDd => "QSFP-DD",
            Rj45 => "RJ45",
            Other(raw) => raw.as_str(),
        }
    }
}

impl std::fmt::Display for PortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
