//! Cache-first specification lookup
//!
//! Every spec the engine reads goes through here: the cache is consulted
//! first, the repository on a miss, and the typed spec (or the fact that
//! there is none) is memoized. Spec data is static, so a negative result is
//! never retried until someone invalidates it.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheValue, SpecCache};
use crate::domain::entities::{ComponentSpec, ExistingComponentSet, ResolvedBuild};
use crate::domain::ports::SpecRepository;
use crate::domain::services::extraction::parse_spec;
use crate::domain::value_objects::ComponentType;
use crate::error::EngineResult;

/// Cache namespace holding typed specs and negative lookups
pub const SPEC_NAMESPACE: &str = "specs";

/// Result of resolving one (type, UUID) pair
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Arc<ComponentSpec>),
    NotFound,
    /// The document declares itself to be a different component type
    TypeMismatch { declared: ComponentType },
}

pub struct SpecLookup {
    repository: Arc<dyn SpecRepository>,
    cache: Arc<SpecCache>,
    ttl_secs: u64,
}

impl SpecLookup {
    pub fn new(repository: Arc<dyn SpecRepository>, cache: Arc<SpecCache>, ttl_secs: u64) -> Self {
        Self {
            repository,
            cache,
            ttl_secs,
        }
    }

    pub fn cache(&self) -> &SpecCache {
        &self.cache
    }

    pub fn cache_key(ty: ComponentType, uuid: &str) -> String {
        format!("{}:{}", ty, uuid)
    }

    pub fn lookup(&self, ty: ComponentType, uuid: &str) -> EngineResult<Lookup> {
        let key = Self::cache_key(ty, uuid);

        match self.cache.get(SPEC_NAMESPACE, &key) {
            Some(CacheValue::Spec(spec)) => {
                debug!(%key, "spec cache hit");
                return Ok(Lookup::Found(spec));
            }
            Some(CacheValue::NotFound) => {
                debug!(%key, "negative spec cache hit");
                return Ok(Lookup::NotFound);
            }
            None => {}
        }

        debug!(%key, "spec cache miss");
        let Some(doc) = self.repository.lookup(ty, uuid)? else {
            self.cache
                .set(SPEC_NAMESPACE, &key, CacheValue::NotFound, self.ttl_secs);
            return Ok(Lookup::NotFound);
        };

        if let Some(declared) = declared_type(&doc).filter(|d| *d != ty) {
            debug!(%key, %declared, "spec declares a different component type");
            return Ok(Lookup::TypeMismatch { declared });
        }

        let spec = Arc::new(parse_spec(ty, uuid, &doc)?);
        self.cache.set(
            SPEC_NAMESPACE,
            &key,
            CacheValue::Spec(Arc::clone(&spec)),
            self.ttl_secs,
        );
        Ok(Lookup::Found(spec))
    }

    /// The spec if it exists and has the requested type
    pub fn find(&self, ty: ComponentType, uuid: &str) -> EngineResult<Option<Arc<ComponentSpec>>> {
        Ok(match self.lookup(ty, uuid)? {
            Lookup::Found(spec) => Some(spec),
            Lookup::NotFound | Lookup::TypeMismatch { .. } => None,
        })
    }

    /// Join a build snapshot with the specs of its components.
    ///
    /// Components without a spec stay in the set but are invisible to rules.
    pub fn resolve_build(&self, set: ExistingComponentSet) -> EngineResult<ResolvedBuild> {
        let mut wanted: Vec<(ComponentType, String)> = Vec::new();
        for component in set.iter() {
            let pair = (component.component_type, component.uuid.clone());
            if !wanted.contains(&pair) {
                wanted.push(pair);
            }
        }

        let mut build = ResolvedBuild::new(set);
        for (ty, uuid) in wanted {
            match self.find(ty, &uuid)? {
                Some(spec) => build.insert_spec(spec),
                None => debug!(build_id = build.build_id(), %ty, %uuid, "installed component has no spec"),
            }
        }
        Ok(build)
    }

    /// Drop cached specs whose `type:uuid` key matches `pattern`
    pub fn invalidate(&self, pattern: &str) -> usize {
        self.cache.invalidate(SPEC_NAMESPACE, pattern)
    }
}

fn declared_type(doc: &serde_json::Value) -> Option<ComponentType> {
    doc.get("component_type")?.as_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheLimits;
    use crate::domain::entities::ExistingComponent;
    use crate::infrastructure::{InMemorySpecRepository, ManualClock};
    use serde_json::json;

    fn lookup_over(repo: Arc<InMemorySpecRepository>) -> SpecLookup {
        let cache = Arc::new(SpecCache::new(
            CacheLimits::default(),
            Arc::new(ManualClock::default()),
        ));
        SpecLookup::new(repo, cache, 0)
    }

    #[test]
    fn second_lookup_is_served_from_cache() {
        let repo = Arc::new(
            InMemorySpecRepository::new()
                .with(ComponentType::Cpu, "cpu-1", json!({"socket": "LGA1700"})),
        );
        let lookup = lookup_over(Arc::clone(&repo));

        assert!(matches!(lookup.lookup(ComponentType::Cpu, "cpu-1").unwrap(), Lookup::Found(_)));
        assert!(matches!(lookup.lookup(ComponentType::Cpu, "cpu-1").unwrap(), Lookup::Found(_)));
        assert_eq!(repo.lookup_count(), 1);
    }

    #[test]
    fn missing_spec_is_cached_negatively() {
        let repo = Arc::new(InMemorySpecRepository::new());
        let lookup = lookup_over(Arc::clone(&repo));

        assert_eq!(lookup.lookup(ComponentType::Nic, "ghost").unwrap(), Lookup::NotFound);
        assert_eq!(lookup.lookup(ComponentType::Nic, "ghost").unwrap(), Lookup::NotFound);
        assert_eq!(repo.lookup_count(), 1);
    }

    #[test]
    fn declared_type_mismatch_is_reported() {
        let repo = Arc::new(InMemorySpecRepository::new().with(
            ComponentType::Cpu,
            "x",
            json!({"component_type": "ram"}),
        ));
        let lookup = lookup_over(repo);

        assert_eq!(
            lookup.lookup(ComponentType::Cpu, "x").unwrap(),
            Lookup::TypeMismatch {
                declared: ComponentType::Ram
            }
        );
    }

    #[test]
    fn malformed_document_is_an_error() {
        let repo = Arc::new(InMemorySpecRepository::new().with(
            ComponentType::Cpu,
            "bad",
            json!("not a map"),
        ));
        assert!(lookup_over(repo).lookup(ComponentType::Cpu, "bad").is_err());
    }

    #[test]
    fn resolve_build_skips_unknown_components() {
        let repo = Arc::new(
            InMemorySpecRepository::new().with(ComponentType::Ram, "ram-1", json!({"type": "DDR5"})),
        );
        let set = ExistingComponentSet::new("b")
            .with(ExistingComponent::new(ComponentType::Ram, "ram-1").with_quantity(2))
            .with(ExistingComponent::new(ComponentType::Ram, "ram-1"))
            .with(ExistingComponent::new(ComponentType::Cpu, "cpu-ghost"));

        let build = lookup_over(Arc::clone(&repo)).resolve_build(set).unwrap();
        assert_eq!(build.resolved().count(), 2);
        assert_eq!(repo.lookup_count(), 2);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let repo = Arc::new(
            InMemorySpecRepository::new().with(ComponentType::Cpu, "cpu-1", json!({})),
        );
        let lookup = lookup_over(Arc::clone(&repo));
        lookup.find(ComponentType::Cpu, "cpu-1").unwrap();

        assert_eq!(lookup.invalidate("cpu:*"), 1);
        lookup.find(ComponentType::Cpu, "cpu-1").unwrap();
        assert_eq!(repo.lookup_count(), 2);
    }
}
