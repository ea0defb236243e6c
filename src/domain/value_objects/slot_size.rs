//! PCIe slot size classes
//!
//! Size classes form a backward-compatibility chain `x1 ⊂ x4 ⊂ x8 ⊂ x16`:
//! a card that needs `xN` fits any slot of class `xN` or wider, never a
//! narrower one.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Physical PCIe slot size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotSize {
    #[serde(rename = "x1")]
    X1,
    #[serde(rename = "x4")]
    X4,
    #[serde(rename = "x8")]
    X8,
    #[serde(rename = "x16")]
    X16,
}

impl SlotSize {
    /// Narrowest first
    pub const CHAIN: [SlotSize; 4] = [SlotSize::X1, SlotSize::X4, SlotSize::X8, SlotSize::X16];

    pub fn lanes(&self) -> u8 {
        match self {
            SlotSize::X1 => 1,
            SlotSize::X4 => 4,
            SlotSize::X8 => 8,
            SlotSize::X16 => 16,
        }
    }

    /// Smallest slot class able to carry `lanes` electrical lanes.
    ///
    /// Lane counts wider than x16 clamp to x16; zero maps to x1.
    pub fn from_lanes(lanes: u8) -> Self {
        match lanes {
            0 | 1 => SlotSize::X1,
            2..=4 => SlotSize::X4,
            5..=8 => SlotSize::X8,
            _ => SlotSize::X16,
        }
    }

    /// Can a card requiring `self` be placed in a slot of class `slot`?
    pub fn fits_in(&self, slot: SlotSize) -> bool {
        *self <= slot
    }

    /// Slot classes that accept a card of this size, narrowest first
    pub fn compatible_slots(&self) -> impl Iterator<Item = SlotSize> + '_ {
        Self::CHAIN.into_iter().filter(move |s| self.fits_in(*s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotSize::X1 => "x1",
            SlotSize::X4 => "x4",
            SlotSize::X8 => "x8",
            SlotSize::X16 => "x16",
        }
    }
}

impl std::fmt::Display for SlotSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SlotSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches(['x', 'X']);
        match trimmed.parse::<u8>() {
            Ok(1) => Ok(SlotSize::X1),
            Ok(4) => Ok(SlotSize::X4),
            Ok(8) => Ok(SlotSize::X8),
            Ok(16) => Ok(SlotSize::X16),
            _ => Err(format!("invalid slot size '{}' (expected x1, x4, x8 or x16)", s)),
        }
    }
}
