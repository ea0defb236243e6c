//! Engine facade
//!
//! The in-process surface callers use: validation, slot and port queries,
//! transceiver placement and cache maintenance. Every query reads a fresh
//! build snapshot from the store and resolves it through the spec cache;
//! nothing derived from a build is kept between calls.

use std::sync::Arc;

use tracing::debug;

use super::spec_lookup::SpecLookup;
use crate::cache::{CacheInfo, CacheStats, SpecCache};
use crate::config::EngineConfig;
use crate::domain::entities::{
    ExistingComponentSet, PortInventory, ResolvedBuild, SfpSpec, SlotAvailability,
    ValidationResult,
};
use crate::domain::ports::{BuildStore, Clock, SpecRepository};
use crate::domain::services::{
    self as services, AssignOutcome, BatchProfile, PortIssue, PortSummary, PortTracker,
    SlotIntegrityReport, SlotTracker,
};
use crate::domain::value_objects::SlotSize;
use crate::error::{EngineError, EngineResult};
use crate::infrastructure::SystemClock;
use crate::validators::ValidatorFactory;

pub struct Engine {
    factory: ValidatorFactory,
    lookup: Arc<SpecLookup>,
    store: Arc<dyn BuildStore>,
}

impl Engine {
    pub fn new(
        repository: Arc<dyn SpecRepository>,
        store: Arc<dyn BuildStore>,
        config: &EngineConfig,
    ) -> Self {
        Self::builder(repository, store).config(config.clone()).build()
    }

    pub fn builder(repository: Arc<dyn SpecRepository>, store: Arc<dyn BuildStore>) -> EngineBuilder {
        EngineBuilder {
            repository,
            store,
            config: EngineConfig::default(),
            clock: None,
        }
    }

    pub fn factory(&self) -> &ValidatorFactory {
        &self.factory
    }

    /// Decide whether `uuid` may be added to the build
    pub fn validate(
        &self,
        component_type: &str,
        build_id: &str,
        uuid: &str,
        existing: Option<ExistingComponentSet>,
    ) -> ValidationResult {
        self.factory.validate(component_type, build_id, uuid, existing)
    }

    pub fn slot_availability(&self, build_id: &str) -> EngineResult<SlotAvailability> {
        let build = self.resolve(build_id)?;
        Ok(SlotTracker::new(&build).availability()?)
    }

    pub fn riser_slot_availability(&self, build_id: &str) -> EngineResult<SlotAvailability> {
        let build = self.resolve(build_id)?;
        Ok(SlotTracker::new(&build).riser_availability()?)
    }

    /// Suggest a PCIe slot; `Ok(None)` means every fitting slot is taken
    pub fn assign_slot(&self, build_id: &str, size: SlotSize) -> EngineResult<Option<String>> {
        let build = self.resolve(build_id)?;
        Ok(SlotTracker::new(&build).assign_slot(size)?)
    }

    pub fn assign_riser_slot(&self, build_id: &str, size: SlotSize) -> EngineResult<Option<String>> {
        let build = self.resolve(build_id)?;
        Ok(SlotTracker::new(&build).assign_riser_slot(size)?)
    }

    pub fn validate_all_slots(&self, build_id: &str) -> EngineResult<SlotIntegrityReport> {
        let build = self.resolve(build_id)?;
        Ok(SlotTracker::new(&build).validate_all_slots()?)
    }

    pub fn validate_all_riser_slots(&self, build_id: &str) -> EngineResult<SlotIntegrityReport> {
        let build = self.resolve(build_id)?;
        Ok(SlotTracker::new(&build).validate_all_riser_slots()?)
    }

    /// Every NIC of the build, add-on cards first
    pub fn port_inventories(&self, build_id: &str) -> EngineResult<Vec<PortInventory>> {
        let build = self.resolve(build_id)?;
        Ok(PortTracker::new(&build).inventories())
    }

    pub fn port_inventory(&self, build_id: &str, nic_id: &str) -> EngineResult<PortInventory> {
        let build = self.resolve(build_id)?;
        PortTracker::new(&build)
            .port_inventory(nic_id)
            .ok_or_else(|| unknown_nic(build_id, nic_id))
    }

    pub fn port_summary(&self, build_id: &str) -> EngineResult<PortSummary> {
        let build = self.resolve(build_id)?;
        Ok(PortTracker::new(&build).summary())
    }

    pub fn validate_port_assignments(&self, build_id: &str) -> EngineResult<Vec<PortIssue>> {
        let build = self.resolve(build_id)?;
        Ok(PortTracker::new(&build).validate_port_assignments())
    }

    /// Check that the build's loose transceivers form one batch
    pub fn validate_unassigned_modules(&self, build_id: &str) -> EngineResult<BatchProfile> {
        let build = self.resolve(build_id)?;
        Ok(services::validate_unassigned_modules(&unassigned_modules(&build))?)
    }

    /// Place the build's loose transceivers into `nic_id`
    pub fn auto_assign(&self, build_id: &str, nic_id: &str) -> EngineResult<AssignOutcome> {
        let build = self.resolve(build_id)?;
        let inventories = PortTracker::new(&build).inventories();
        let nic = inventories
            .iter()
            .find(|i| i.nic_id == nic_id)
            .ok_or_else(|| unknown_nic(build_id, nic_id))?;

        let outcome = services::auto_assign(nic, &unassigned_modules(&build), &inventories)?;
        debug!(build_id, nic_id, ?outcome, "transceiver placement");
        Ok(outcome)
    }

    /// Best NIC of the build for its loose transceivers
    pub fn choose_optimal_nic(&self, build_id: &str) -> EngineResult<Option<PortInventory>> {
        let build = self.resolve(build_id)?;
        let inventories = PortTracker::new(&build).inventories();
        let best = services::choose_optimal_nic(&unassigned_modules(&build), &inventories)?;
        Ok(best.cloned())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lookup.cache().stats()
    }

    pub fn cache_info(&self) -> CacheInfo {
        self.lookup.cache().info()
    }

    /// Drop cached specs (and negative lookups) matching a `type:uuid` glob
    pub fn invalidate_specs(&self, pattern: &str) -> usize {
        self.lookup.invalidate(pattern)
    }

    pub fn purge_expired(&self) -> usize {
        self.lookup.cache().purge_expired()
    }

    fn resolve(&self, build_id: &str) -> EngineResult<ResolvedBuild> {
        let set = self.store.get_components(build_id)?;
        self.lookup.resolve_build(set)
    }
}

fn unassigned_modules(build: &ResolvedBuild) -> Vec<SfpSpec> {
    build
        .set
        .unassigned_modules()
        .flat_map(|m| {
            let spec = build.spec_of(m).and_then(|s| s.as_sfp()).cloned();
            std::iter::repeat(spec).take(m.quantity.max(1) as usize)
        })
        .flatten()
        .collect()
}

fn unknown_nic(build_id: &str, nic_id: &str) -> EngineError {
    EngineError::UnknownNic {
        build_id: build_id.to_string(),
        nic_id: nic_id.to_string(),
    }
}

/// Wires an `Engine` from its collaborators
pub struct EngineBuilder {
    repository: Arc<dyn SpecRepository>,
    store: Arc<dyn BuildStore>,
    config: EngineConfig,
    clock: Option<Arc<dyn Clock>>,
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Time source for cache expiry (system clock by default)
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Engine {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let cache = Arc::new(SpecCache::new(self.config.cache_limits(), clock));
        let lookup = Arc::new(SpecLookup::new(
            self.repository,
            cache,
            self.config.cache.spec_ttl_secs,
        ));
        let factory = ValidatorFactory::new(
            Arc::clone(&lookup),
            Arc::clone(&self.store),
            self.config.validation.clone(),
        );
        Engine {
            factory,
            lookup,
            store: self.store,
        }
    }
}
