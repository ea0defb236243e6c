//! Subcommand handlers
//!
//! Each handler returns `Ok(true)` when the build passed the check it was
//! asked about; `main` turns `false` into a non-zero exit code.

pub mod ports;
pub mod slots;
pub mod transceivers;
pub mod validate;
