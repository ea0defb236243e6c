//! Shared validator contract
//!
//! A validator receives the candidate's typed spec and the build resolved
//! against the spec cache. Domain outcomes are entries on the result; an
//! `Err` means the validator itself failed and is turned into a blocked
//! `validator_error` result by the factory.

use serde_json::Value;

use crate::config::{UnknownLanes, ValidationConfig};
use crate::domain::entities::{
    ComponentSpec, IssueKind, ResolvedBuild, Severity, ValidationEntry, ValidationResult,
};
use crate::domain::value_objects::ComponentType;
use crate::error::EngineResult;

/// Everything a rule may look at
pub struct ValidationContext<'a> {
    pub build: &'a ResolvedBuild,
    pub config: &'a ValidationConfig,
}

impl<'a> ValidationContext<'a> {
    pub fn new(build: &'a ResolvedBuild, config: &'a ValidationConfig) -> Self {
        Self { build, config }
    }
}

pub trait ComponentValidator: Send + Sync {
    fn component_type(&self) -> ComponentType;

    fn validate_addition(
        &self,
        ctx: &ValidationContext<'_>,
        candidate: &ComponentSpec,
    ) -> EngineResult<ValidationResult>;
}

/// Accumulates entries; the status is derived when the result is built
#[derive(Debug, Default)]
pub struct ResultBuilder {
    errors: Vec<ValidationEntry>,
    warnings: Vec<ValidationEntry>,
    info: Vec<ValidationEntry>,
}

impl ResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocking error; severity defaults to critical
    pub fn error(&mut self, kind: IssueKind, message: impl Into<String>) -> EntryHandle<'_> {
        self.errors
            .push(ValidationEntry::new(kind, Severity::Critical, message));
        EntryHandle(last(&mut self.errors))
    }

    pub fn warning(&mut self, kind: IssueKind, message: impl Into<String>) -> EntryHandle<'_> {
        self.warnings
            .push(ValidationEntry::new(kind, Severity::Medium, message));
        EntryHandle(last(&mut self.warnings))
    }

    pub fn info(&mut self, kind: IssueKind, message: impl Into<String>) -> EntryHandle<'_> {
        self.info
            .push(ValidationEntry::new(kind, Severity::Info, message));
        EntryHandle(last(&mut self.info))
    }

    /// `lane_count_assumed` as a warning or an info note, per configuration
    pub fn assumed_lanes(
        &mut self,
        config: &ValidationConfig,
        message: impl Into<String>,
    ) -> EntryHandle<'_> {
        match config.unknown_lanes {
            UnknownLanes::Warn => self.warning(IssueKind::LaneCountAssumed, message),
            UnknownLanes::Assume => self.info(IssueKind::LaneCountAssumed, message),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_error(&self, kind: IssueKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    pub fn build(self) -> ValidationResult {
        ValidationResult::from_entries(self.errors, self.warnings, self.info)
    }
}

fn last(entries: &mut [ValidationEntry]) -> &mut ValidationEntry {
    let idx = entries.len() - 1;
    &mut entries[idx]
}

/// Decorates the entry just recorded
pub struct EntryHandle<'b>(&'b mut ValidationEntry);

impl EntryHandle<'_> {
    pub fn details(self, details: Value) -> Self {
        self.0.details = Some(details);
        self
    }

    pub fn resolution(self, resolution: impl Into<String>) -> Self {
        self.0.resolution = Some(resolution.into());
        self
    }

    pub fn severity(self, severity: Severity) -> Self {
        self.0.severity = severity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ValidationStatus;
    use serde_json::json;

    #[test]
    fn builder_attaches_details_to_last_entry() {
        let mut b = ResultBuilder::new();
        b.warning(IssueKind::MemorySpeedDowngrade, "slow")
            .details(json!({"slowdown_percent": 12.5}));
        b.error(IssueKind::SocketMismatch, "wrong socket")
            .resolution("pick another board")
            .severity(Severity::High);

        let result = b.build();
        assert_eq!(result.status, ValidationStatus::Blocked);
        assert_eq!(result.errors[0].severity, Severity::High);
        assert_eq!(
            result.errors[0].resolution.as_deref(),
            Some("pick another board")
        );
        assert_eq!(
            result.warnings[0].details,
            Some(json!({"slowdown_percent": 12.5}))
        );
    }

    #[test]
    fn assumed_lanes_follow_config() {
        let mut warn = ResultBuilder::new();
        warn.assumed_lanes(&ValidationConfig::default(), "x");
        assert_eq!(warn.build().status, ValidationStatus::AllowedWithWarnings);

        let assume = ValidationConfig {
            unknown_lanes: UnknownLanes::Assume,
            ..ValidationConfig::default()
        };
        let mut info = ResultBuilder::new();
        info.assumed_lanes(&assume, "x");
        let result = info.build();
        assert_eq!(result.status, ValidationStatus::Allowed);
        assert!(result.has_info(IssueKind::LaneCountAssumed));
    }
}
