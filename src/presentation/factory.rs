//! Engine Factory
//!
//! Wires an `Engine` over on-disk catalogs and build files.
//! This is the dependency injection point for the binary.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::Engine;
use crate::config::EngineConfig;
use crate::infrastructure::{BuildFile, CatalogFile};

/// Create an engine reading specs from `catalog` and builds from `builds`
pub fn create_engine(catalog: &Path, builds: &Path, config: &EngineConfig) -> Result<Engine> {
    let repository = CatalogFile::load(catalog)
        .with_context(|| format!("loading catalog {}", catalog.display()))?;
    let store = BuildFile::load(builds)
        .with_context(|| format!("loading builds {}", builds.display()))?;

    Ok(Engine::new(Arc::new(repository), Arc::new(store), config))
}
