//! SpecRepository port - UUID-keyed lookup of component attributes
//!
//! The repository's document hierarchy is opaque to the engine. Point
//! lookups only; documents come back as loosely typed JSON and are turned
//! into `ComponentSpec`s by the extraction layer.

use crate::domain::value_objects::ComponentType;

/// Specification repository errors.
///
/// "Not found" is not an error: `lookup` returns `Ok(None)`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("specification source unavailable: {message}")]
    Unavailable { message: String },

    #[error("specification source corrupted: {message}")]
    Corrupted { message: String },
}

/// Read-only source of component specifications
pub trait SpecRepository: Send + Sync {
    /// Raw attributes of the component model `uuid` of type `ty`
    fn lookup(
        &self,
        ty: ComponentType,
        uuid: &str,
    ) -> Result<Option<serde_json::Value>, RepositoryError>;
}
