//! In-memory spec repository and build store

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use serde_json::Value;

use crate::domain::entities::ExistingComponentSet;
use crate::domain::ports::{BuildStore, BuildStoreError, RepositoryError, SpecRepository};
use crate::domain::value_objects::ComponentType;

/// Spec documents keyed by (type, UUID)
#[derive(Debug, Default)]
pub struct InMemorySpecRepository {
    docs: HashMap<(ComponentType, String), Value>,
    lookups: AtomicUsize,
}

impl InMemorySpecRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ty: ComponentType, uuid: impl Into<String>, doc: Value) {
        self.docs.insert((ty, uuid.into()), doc);
    }

    pub fn with(mut self, ty: ComponentType, uuid: impl Into<String>, doc: Value) -> Self {
        self.insert(ty, uuid, doc);
        self
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Number of `lookup` calls served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl SpecRepository for InMemorySpecRepository {
    fn lookup(&self, ty: ComponentType, uuid: &str) -> Result<Option<Value>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.docs.get(&(ty, uuid.to_string())).cloned())
    }
}

/// Typed builds keyed by build id
#[derive(Debug, Default)]
pub struct InMemoryBuildStore {
    builds: RwLock<HashMap<String, ExistingComponentSet>>,
}

impl InMemoryBuildStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a build
    pub fn put(&self, set: ExistingComponentSet) {
        let mut builds = self
            .builds
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        builds.insert(set.build_id.clone(), set);
    }

    pub fn with(self, set: ExistingComponentSet) -> Self {
        self.put(set);
        self
    }
}

impl BuildStore for InMemoryBuildStore {
    fn get_components(&self, build_id: &str) -> Result<ExistingComponentSet, BuildStoreError> {
        let builds = self
            .builds
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        builds
            .get(build_id)
            .cloned()
            .ok_or_else(|| BuildStoreError::BuildNotFound {
                build_id: build_id.to_string(),
            })
    }
}
