//! Compatibility validators
//!
//! One validator per component type, all sharing the `ComponentValidator`
//! contract and the `ResultBuilder` status rules. `ValidatorFactory` is the
//! single entry point and turns every failure into a result.

mod base;
mod caddy;
mod chassis;
mod cpu;
mod factory;
mod motherboard;
mod nic;
mod pcie_card;
mod ram;
mod rules;
mod sfp;
mod storage;
#[cfg(test)]
mod testing;

pub use base::{ComponentValidator, EntryHandle, ResultBuilder, ValidationContext};
pub use caddy::CaddyValidator;
pub use chassis::ChassisValidator;
pub use cpu::CpuValidator;
pub use factory::ValidatorFactory;
pub use motherboard::MotherboardValidator;
pub use nic::NicValidator;
pub use pcie_card::{HbaValidator, PciCardValidator};
pub use ram::RamValidator;
pub use sfp::SfpValidator;
pub use storage::StorageValidator;
