//! Domain Value Objects
//!
//! Immutable value types that represent hardware concepts shared by the
//! extractors, validators and trackers.

mod component_type;
mod drive;
mod extracted;
mod port_type;
mod slot_size;

pub use component_type::ComponentType;
pub use drive::{DriveFormFactor, StorageInterface, StorageProtocol};
pub use extracted::Extracted;
pub use port_type::PortType;
pub use slot_size::SlotSize;
