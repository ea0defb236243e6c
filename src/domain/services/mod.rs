//! Domain Services
//!
//! Pure logic over typed specs and build snapshots. No I/O; every function
//! here is deterministic for a given `ResolvedBuild`.

pub mod extraction;
mod port_tracker;
mod slot_tracker;
mod transceiver_resolver;

pub use port_tracker::{
    check_module_fit, onboard_nic_id, ModuleMismatch, NicPortSummary, PortIssue, PortIssueKind,
    PortSummary, PortTracker,
};
pub use slot_tracker::{SlotError, SlotIntegrityReport, SlotIssue, SlotIssueKind, SlotTracker};
pub use transceiver_resolver::{
    auto_assign, choose_optimal_nic, validate_unassigned_modules, AssignOutcome, BatchError,
    BatchProfile, NicSuggestion, Placement,
};
