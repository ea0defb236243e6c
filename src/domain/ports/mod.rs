//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the engine.
//! Infrastructure layer provides concrete implementations.

pub mod build_store;
pub mod clock;
pub mod spec_repository;

pub use build_store::{BuildStore, BuildStoreError};
pub use clock::Clock;
pub use spec_repository::{RepositoryError, SpecRepository};
