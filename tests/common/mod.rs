//! Common test utilities for rackfit integration tests.
//!
//! This module provides:
//! - `TestBuild`: builder for build snapshots in an in-memory store
//! - `catalog()`: a small but realistic component catalog
//! - `TestEnv`: temp directory with catalog/build files for CLI runs

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
