//! rackfit - component compatibility and resource allocation for server builds
//!
//! rackfit decides whether a component may be added to a partially assembled
//! server build. It checks sockets, memory, PCIe lanes and slots, drive bays
//! and transceiver ports against the specs of what is already installed, and
//! answers slot and port allocation questions along the way.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod presentation;
pub mod validators;

// Re-exports for convenience
pub use application::{Engine, EngineBuilder, Lookup, SpecLookup};
pub use cache::{CacheInfo, CacheStats};
pub use config::EngineConfig;
pub use domain::entities::{
    Assignment, ComponentSpec, ExistingComponent, ExistingComponentSet, IssueKind, Severity,
    ValidationEntry, ValidationResult, ValidationStatus,
};
pub use domain::ports::{BuildStore, SpecRepository};
pub use domain::value_objects::{ComponentType, SlotSize};
pub use error::{EngineError, EngineResult};
pub use validators::{ComponentValidator, ValidatorFactory};
