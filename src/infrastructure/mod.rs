//! Infrastructure Layer
//!
//! Concrete implementations of the domain ports.
//!
//! ## Structure
//!
//! - `repositories/` - In-memory stores, catalog files, build files
//! - `clock` - System and manual clocks

pub mod clock;
pub mod repositories;

pub use clock::{ManualClock, SystemClock};
pub use repositories::{
    BuildFile, CatalogError, CatalogFile, InMemoryBuildStore, InMemorySpecRepository,
};
