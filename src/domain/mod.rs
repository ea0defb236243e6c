//! Domain Layer
//!
//! The compatibility rules and resource bookkeeping, free of I/O.
//!
//! ## Structure
//!
//! - `entities/` - Specs, build snapshots, inventories, validation results
//! - `value_objects/` - Component types, slot sizes, port types, drive interfaces
//! - `services/` - Extraction, slot/port trackers, transceiver resolver
//! - `policies/` - Rules shared across validators (lane budget)
//! - `ports/` - Interfaces for the spec repository, build store and clock

pub mod entities;
pub mod policies;
pub mod ports;
pub mod services;
pub mod value_objects;
