//! Domain Entities
//!
//! - `ComponentSpec` - typed, immutable component model description
//! - `ExistingComponentSet` - read-only snapshot of a build
//! - `ResolvedBuild` - snapshot joined with component specs
//! - `ValidationResult` - decision for one candidate
//! - `SlotInventory` / `PortInventory` - derived resource views

mod build;
mod inventory;
mod resolved;
mod spec;
mod validation;

pub use build::{Assignment, ExistingComponent, ExistingComponentSet};
pub use inventory::{
    NicSource, PortInventory, PortUtilization, Slot, SlotAvailability, SlotInventory, SlotPool,
    SlotSource,
};
pub use resolved::ResolvedBuild;
pub use spec::{
    BayGroup, CaddySpec, ChassisSpec, ComponentSpec, CpuSpec, HbaSpec, MotherboardSpec, NicSpec,
    OnboardNic, PciCardKind, PciCardSpec, RamSpec, SfpSpec, SlotGroup, StorageSpec,
    MAX_SLOTS_PER_GROUP, NVME_DRIVE_LANES,
};
pub use validation::{IssueKind, Severity, ValidationEntry, ValidationResult, ValidationStatus};
