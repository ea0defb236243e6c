//! Build fixtures for validator unit tests

use serde_json::Value;

use super::base::{ComponentValidator, ValidationContext};
use crate::config::ValidationConfig;
use crate::domain::entities::{
    Assignment, ComponentSpec, ExistingComponent, ExistingComponentSet, ResolvedBuild,
    ValidationResult,
};
use crate::domain::services::extraction::parse_spec;
use crate::domain::value_objects::ComponentType;

/// Parse a repository document the way the engine would
pub(crate) fn spec(ty: ComponentType, uuid: &str, doc: Value) -> ComponentSpec {
    parse_spec(ty, uuid, &doc).unwrap()
}

/// Installed components with their raw documents
#[derive(Default)]
pub(crate) struct Rig {
    components: Vec<(ExistingComponent, ComponentSpec)>,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, ty: ComponentType, uuid: &str, doc: Value) -> Self {
        self.with_component(ExistingComponent::new(ty, uuid), doc)
    }

    pub fn with_qty(self, ty: ComponentType, uuid: &str, quantity: u32, doc: Value) -> Self {
        self.with_component(ExistingComponent::new(ty, uuid).with_quantity(quantity), doc)
    }

    pub fn with_assigned(
        self,
        ty: ComponentType,
        uuid: &str,
        assignment: Assignment,
        doc: Value,
    ) -> Self {
        self.with_component(ExistingComponent::new(ty, uuid).with_assignment(assignment), doc)
    }

    fn with_component(mut self, component: ExistingComponent, doc: Value) -> Self {
        let parsed = spec(component.component_type, &component.uuid, doc);
        self.components.push((component, parsed));
        self
    }

    pub fn build(&self) -> ResolvedBuild {
        let mut set = ExistingComponentSet::new("build-1");
        let mut resolved = ResolvedBuild::default();
        for (component, spec) in &self.components {
            set.push(component.clone());
            resolved = resolved.with_spec(spec.clone());
        }
        resolved.set = set;
        resolved
    }
}

pub(crate) fn validate(
    validator: &dyn ComponentValidator,
    rig: &Rig,
    candidate: &ComponentSpec,
) -> ValidationResult {
    validate_with(validator, rig, candidate, &ValidationConfig::default())
}

pub(crate) fn validate_with(
    validator: &dyn ComponentValidator,
    rig: &Rig,
    candidate: &ComponentSpec,
    config: &ValidationConfig,
) -> ValidationResult {
    let build = rig.build();
    let ctx = ValidationContext::new(&build, config);
    validator.validate_addition(&ctx, candidate).unwrap()
}
