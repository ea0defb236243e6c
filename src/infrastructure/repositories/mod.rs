//! Repository and build store implementations

mod build_file;
mod catalog;
mod memory;

pub use build_file::BuildFile;
pub use catalog::{CatalogError, CatalogFile};
pub use memory::{InMemoryBuildStore, InMemorySpecRepository};
