//! Validator dispatch
//!
//! One validator instance per component type, built on first use and shared
//! afterwards. `validate` never fails: unknown types, missing specs and
//! validator faults (errors or panics) all come back as blocked results.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::json;
use tracing::{debug, warn};

use super::base::{ComponentValidator, ValidationContext};
use super::{
    CaddyValidator, ChassisValidator, CpuValidator, HbaValidator, MotherboardValidator,
    NicValidator, PciCardValidator, RamValidator, SfpValidator, StorageValidator,
};
use crate::application::{Lookup, SpecLookup};
use crate::config::ValidationConfig;
use crate::domain::entities::{
    ExistingComponentSet, IssueKind, Severity, ValidationEntry, ValidationResult,
};
use crate::domain::ports::BuildStore;
use crate::domain::value_objects::ComponentType;
use crate::error::EngineResult;
use crate::logging::panic_message;

pub struct ValidatorFactory {
    lookup: Arc<SpecLookup>,
    store: Arc<dyn BuildStore>,
    config: ValidationConfig,
    instances: Mutex<HashMap<ComponentType, Arc<dyn ComponentValidator>>>,
}

impl ValidatorFactory {
    pub fn new(lookup: Arc<SpecLookup>, store: Arc<dyn BuildStore>, config: ValidationConfig) -> Self {
        Self {
            lookup,
            store,
            config,
            instances: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Shared validator for `ty`, created on first request
    pub fn validator(&self, ty: ComponentType) -> Arc<dyn ComponentValidator> {
        let mut instances = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(instances.entry(ty).or_insert_with(|| {
            debug!(component_type = %ty, "creating validator");
            default_validator(ty)
        }))
    }

    /// Replace the validator used for its component type
    pub fn register(&self, validator: Arc<dyn ComponentValidator>) {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(validator.component_type(), validator);
    }

    /// Number of validators built so far
    pub fn instance_count(&self) -> usize {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Validate adding `uuid` (of type `type_name`) to a build.
    ///
    /// `existing` overrides the build store snapshot when the caller already
    /// holds one.
    pub fn validate(
        &self,
        type_name: &str,
        build_id: &str,
        uuid: &str,
        existing: Option<ExistingComponentSet>,
    ) -> ValidationResult {
        match type_name.parse::<ComponentType>() {
            Ok(ty) => self.validate_type(ty, build_id, uuid, existing),
            Err(unknown) => {
                let supported: Vec<&str> = ComponentType::ALL.iter().map(|t| t.as_str()).collect();
                ValidationResult::blocked(
                    ValidationEntry::new(
                        IssueKind::UnsupportedComponentType,
                        Severity::Critical,
                        format!("unsupported component type '{}'", unknown),
                    )
                    .with_details(json!({ "component_type": unknown, "supported": supported })),
                )
            }
        }
    }

    /// Validate against a known type. Validator errors and panics become a
    /// blocked `validator_error` result.
    ///
    /// A caught panic is still reported by the process panic hook first;
    /// `logging::install_panic_hook` sends that report to `tracing`.
    pub fn validate_type(
        &self,
        ty: ComponentType,
        build_id: &str,
        uuid: &str,
        existing: Option<ExistingComponentSet>,
    ) -> ValidationResult {
        let validator = self.validator(ty);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.evaluate(validator.as_ref(), build_id, uuid, existing)
        }));

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                warn!(
                    component_type = %ty,
                    build_id,
                    uuid,
                    error = %err,
                    "validator failed"
                );
                validator_error(ty)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(
                    component_type = %ty,
                    build_id,
                    uuid,
                    panic = %message,
                    "validator panicked"
                );
                validator_error(ty)
            }
        }
    }

    fn evaluate(
        &self,
        validator: &dyn ComponentValidator,
        build_id: &str,
        uuid: &str,
        existing: Option<ExistingComponentSet>,
    ) -> EngineResult<ValidationResult> {
        let ty = validator.component_type();
        let set = match existing {
            Some(set) => set,
            None => self.store.get_components(build_id)?,
        };

        let candidate = match self.lookup.lookup(ty, uuid)? {
            Lookup::Found(spec) => spec,
            Lookup::NotFound => {
                return Ok(ValidationResult::blocked(
                    ValidationEntry::new(
                        IssueKind::ComponentNotFound,
                        Severity::Critical,
                        format!("{} {} not found", ty.display_name(), uuid),
                    )
                    .with_details(json!({ "component_type": ty, "uuid": uuid })),
                ));
            }
            Lookup::TypeMismatch { declared } => {
                return Ok(ValidationResult::blocked(
                    ValidationEntry::new(
                        IssueKind::ComponentTypeMismatch,
                        Severity::Critical,
                        format!("{} is a {}, not a {}", uuid, declared, ty),
                    )
                    .with_details(json!({ "expected": ty, "declared": declared })),
                ));
            }
        };

        let first = set.is_empty();
        let build = self.lookup.resolve_build(set)?;
        let ctx = ValidationContext::new(&build, &self.config);
        let mut result = validator.validate_addition(&ctx, &candidate)?;

        if first {
            result.info.insert(
                0,
                ValidationEntry::new(
                    IssueKind::FirstComponent,
                    Severity::Info,
                    format!("{} is the first component of the build", candidate.label()),
                ),
            );
        }
        Ok(result)
    }
}

fn default_validator(ty: ComponentType) -> Arc<dyn ComponentValidator> {
    match ty {
        ComponentType::Cpu => Arc::new(CpuValidator),
        ComponentType::Motherboard => Arc::new(MotherboardValidator),
        ComponentType::Ram => Arc::new(RamValidator),
        ComponentType::Storage => Arc::new(StorageValidator),
        ComponentType::Nic => Arc::new(NicValidator),
        ComponentType::Chassis => Arc::new(ChassisValidator),
        ComponentType::Caddy => Arc::new(CaddyValidator),
        ComponentType::PciCard => Arc::new(PciCardValidator),
        ComponentType::Hba => Arc::new(HbaValidator),
        ComponentType::Sfp => Arc::new(SfpValidator),
    }
}

fn validator_error(ty: ComponentType) -> ValidationResult {
    ValidationResult::blocked(
        ValidationEntry::new(
            IssueKind::ValidatorError,
            Severity::Critical,
            format!("internal error while validating {}", ty.display_name()),
        )
        .with_resolution("Retry later or contact support if the problem persists"),
    )
}
