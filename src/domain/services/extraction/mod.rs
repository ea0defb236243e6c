//! Spec extraction
//!
//! Turns raw repository documents into typed `ComponentSpec`s. The
//! normalizers are pure and total; the parser is the only fallible step and
//! only fails on documents that are not attribute maps at all.

mod normalize;
mod parser;

pub use normalize::*;
pub use parser::parse_spec;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Malformed specification for {uuid}: {message}")]
    Malformed { uuid: String, message: String },
}
