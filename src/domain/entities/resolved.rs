//! A build snapshot joined with the specs of its components

use std::collections::HashMap;
use std::sync::Arc;

use super::build::{ExistingComponent, ExistingComponentSet};
use super::spec::{ComponentSpec, MotherboardSpec, PciCardSpec};
use crate::domain::value_objects::ComponentType;

/// Build records plus whatever specs could be resolved for them.
///
/// Components whose spec is missing stay in `set` but have no entry in the
/// spec map; rules that need the spec simply skip them.
#[derive(Debug, Clone, Default)]
pub struct ResolvedBuild {
    pub set: ExistingComponentSet,
    specs: HashMap<(ComponentType, String), Arc<ComponentSpec>>,
}

impl ResolvedBuild {
    pub fn new(set: ExistingComponentSet) -> Self {
        Self {
            set,
            specs: HashMap::new(),
        }
    }

    pub fn insert_spec(&mut self, spec: Arc<ComponentSpec>) {
        self.specs
            .insert((spec.component_type(), spec.uuid().to_string()), spec);
    }

    pub fn with_spec(mut self, spec: ComponentSpec) -> Self {
        self.insert_spec(Arc::new(spec));
        self
    }

    /// This build with one more unit of `spec` installed (no assignment)
    pub fn with_candidate(&self, spec: Arc<ComponentSpec>) -> ResolvedBuild {
        let mut next = self.clone();
        next.set
            .push(ExistingComponent::new(spec.component_type(), spec.uuid()));
        next.insert_spec(spec);
        next
    }

    pub fn build_id(&self) -> &str {
        &self.set.build_id
    }

    pub fn spec(&self, ty: ComponentType, uuid: &str) -> Option<&ComponentSpec> {
        self.specs
            .get(&(ty, uuid.to_string()))
            .map(|spec| spec.as_ref())
    }

    pub fn spec_of(&self, component: &ExistingComponent) -> Option<&ComponentSpec> {
        self.spec(component.component_type, &component.uuid)
    }

    /// Installed components of a type with their resolved specs
    pub fn resolved_of(
        &self,
        ty: ComponentType,
    ) -> impl Iterator<Item = (&ExistingComponent, &ComponentSpec)> {
        self.set
            .of_type(ty)
            .filter_map(move |c| self.spec_of(c).map(|spec| (c, spec)))
    }

    /// Every installed component that has a resolved spec
    pub fn resolved(&self) -> impl Iterator<Item = (&ExistingComponent, &ComponentSpec)> {
        self.set
            .iter()
            .filter_map(move |c| self.spec_of(c).map(|spec| (c, spec)))
    }

    pub fn motherboard(&self) -> Option<(&ExistingComponent, &MotherboardSpec)> {
        self.resolved_of(ComponentType::Motherboard)
            .find_map(|(c, spec)| spec.as_motherboard().map(|mb| (c, mb)))
    }

    /// Installed riser cards, in build order
    pub fn risers(&self) -> impl Iterator<Item = (&ExistingComponent, &PciCardSpec)> {
        self.resolved_of(ComponentType::PciCard)
            .filter_map(|(c, spec)| spec.as_pci_card().filter(|p| p.is_riser()).map(|p| (c, p)))
    }
}
