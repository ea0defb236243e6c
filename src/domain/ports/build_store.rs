//! BuildStore port - read access to persisted build state
//!
//! The engine never writes to the store; committing slot or port assignments
//! is the caller's responsibility.

use crate::domain::entities::{ExistingComponent, ExistingComponentSet};
use crate::domain::value_objects::ComponentType;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildStoreError {
    #[error("build '{build_id}' not found")]
    BuildNotFound { build_id: String },

    #[error("build store unavailable: {message}")]
    Unavailable { message: String },

    /// An assignment field held text that is not a valid assignment record
    #[error("cannot decode assignment of component '{uuid}': {message}")]
    AssignmentDecode { uuid: String, message: String },

    #[error("invalid component record: {message}")]
    InvalidRecord { message: String },
}

/// Read-only accessor for build contents
pub trait BuildStore: Send + Sync {
    fn get_components(&self, build_id: &str) -> Result<ExistingComponentSet, BuildStoreError>;

    fn motherboard(&self, build_id: &str) -> Result<Option<ExistingComponent>, BuildStoreError> {
        Ok(self.get_components(build_id)?.motherboard().cloned())
    }

    fn components_of(
        &self,
        build_id: &str,
        ty: ComponentType,
    ) -> Result<Vec<ExistingComponent>, BuildStoreError> {
        Ok(self
            .get_components(build_id)?
            .of_type(ty)
            .cloned()
            .collect())
    }

    fn cpus(&self, build_id: &str) -> Result<Vec<ExistingComponent>, BuildStoreError> {
        self.components_of(build_id, ComponentType::Cpu)
    }
}
