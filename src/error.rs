//! Error types for rackfit
//!
//! Uses `thiserror` for library errors. Domain outcomes (a socket mismatch, a
//! full slot pool) are never errors: they are entries of a `ValidationResult`.
//! `EngineError` is reserved for system faults that the validator factory
//! converts into a blocked result.

use thiserror::Error;

use crate::domain::ports::{BuildStoreError, RepositoryError};
use crate::domain::services::extraction::SpecError;
use crate::domain::services::{BatchError, SlotError};

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Specification repository failed (not "not found", which is a value)
    #[error("specification repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Build store failed or returned undecodable records
    #[error("build store error: {0}")]
    BuildStore(#[from] BuildStoreError),

    /// A specification document could not be interpreted
    #[error("malformed specification: {0}")]
    Spec(#[from] SpecError),

    /// Slot question asked of an incomplete build
    #[error(transparent)]
    Slot(#[from] SlotError),

    /// Transceiver batch rejected before placement
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("NIC '{nic_id}' is not part of build '{build_id}'")]
    UnknownNic { build_id: String, nic_id: String },

    /// Component type string is not one the engine knows
    #[error("unsupported component type '{0}'")]
    UnsupportedType(String),

    /// Internal invariant broken during evaluation
    #[error("internal validator fault in {validator}: {message}")]
    Internal { validator: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unsupported_type() {
        let err = EngineError::UnsupportedType("toaster".to_string());
        assert_eq!(err.to_string(), "unsupported component type 'toaster'");
    }

    #[test]
    fn test_error_display_internal() {
        let err = EngineError::Internal {
            validator: "cpu".to_string(),
            message: "lane arithmetic overflow".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "internal validator fault in cpu: lane arithmetic overflow"
        );
    }

    #[test]
    fn test_error_from_slot_error_is_transparent() {
        let err: EngineError = SlotError::NoMotherboard.into();
        assert_eq!(err.to_string(), SlotError::NoMotherboard.to_string());
    }

    #[test]
    fn test_error_from_spec_error() {
        let err: EngineError = SpecError::Malformed {
            uuid: "abc".to_string(),
            message: "expected object".to_string(),
        }
        .into();
        assert!(err.to_string().contains("abc"));
    }
}
