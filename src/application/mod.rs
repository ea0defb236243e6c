//! Application Layer
//!
//! Orchestration between the domain and its collaborators.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain compatibility rules (those live in `validators` and the domain)
//! - Owns the spec cache and the wiring of repositories
//!
//! ## Services
//!
//! - `SpecLookup` - Cache-first spec resolution
//! - `Engine` - The in-process surface (validation, slots, ports, cache)

mod engine;
mod spec_lookup;

pub use engine::{Engine, EngineBuilder};
pub use spec_lookup::{Lookup, SpecLookup, SPEC_NAMESPACE};
