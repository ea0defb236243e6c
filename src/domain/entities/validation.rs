//! Validation result entity
//!
//! A `ValidationResult` is produced fresh for every validation call and never
//! persisted. Its status is a pure function of its entries: any error blocks,
//! otherwise any warning downgrades to `AllowedWithWarnings`.

use serde::{Deserialize, Serialize};

/// Overall decision for a candidate component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Allowed,
    AllowedWithWarnings,
    Blocked,
}

impl ValidationStatus {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, ValidationStatus::Blocked)
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStatus::Allowed => write!(f, "allowed"),
            ValidationStatus::AllowedWithWarnings => write!(f, "allowed_with_warnings"),
            ValidationStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// How serious an entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// Machine-readable kind of a validation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    // lookup / dispatch
    ComponentNotFound,
    ComponentTypeMismatch,
    UnsupportedComponentType,
    ValidatorError,
    SpecIncomplete,
    // informational
    FirstComponent,
    NoMotherboard,
    NoCpu,
    NoChassis,
    NoNic,
    SlotAssignment,
    PortAvailable,
    StoragePlacement,
    // cpu / board
    SocketMismatch,
    CpuSocketLimitExceeded,
    CpuModelMismatch,
    PcieBandwidthLimited,
    MotherboardAlreadyPresent,
    ChassisAlreadyPresent,
    FormFactorMismatch,
    // memory
    MemoryTypeIncompatible,
    EccRequired,
    EccUnsupported,
    MemoryCapacityExceeded,
    MemorySpeedDowngrade,
    MemorySlotsExceeded,
    MemoryFormFactorMismatch,
    MemoryTypeMixed,
    MemoryModuleTypeMixed,
    MemorySpeedMixed,
    MemoryEccMixed,
    // pcie
    PcieLanesExceeded,
    LaneCountAssumed,
    PcieSlotUnavailable,
    PcieSlotsExceeded,
    RiserSlotUnavailable,
    RiserUnsupported,
    ExpansionSlotsExceeded,
    // storage
    M2Unsupported,
    M2SlotsExceeded,
    M2ProtocolUnsupported,
    U2SlotsExceeded,
    DriveBaysExceeded,
    CaddyRequired,
    InterfaceIncompatible,
    ControllerMissing,
    HbaCapacityExceeded,
    CaddyBayMismatch,
    CaddyLimitExceeded,
    // network
    TransceiverIncompatible,
    TransceiverSpeedExceeded,
    PortsExhausted,
    TransceiverBatchMixed,
}

impl IssueKind {
    /// Snake-case identifier (identical to the serde form)
    pub fn as_str(&self) -> String {
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One error, warning or informational note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationEntry {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl ValidationEntry {
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            details: None,
            resolution: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    /// Read a numeric detail field
    pub fn detail_u64(&self, key: &str) -> Option<u64> {
        self.details.as_ref()?.get(key)?.as_u64()
    }
}

/// Outcome of validating one candidate against a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub errors: Vec<ValidationEntry>,
    pub warnings: Vec<ValidationEntry>,
    pub info: Vec<ValidationEntry>,
}

impl ValidationResult {
    /// Build a result, deriving the status from the entries
    pub fn from_entries(
        errors: Vec<ValidationEntry>,
        warnings: Vec<ValidationEntry>,
        info: Vec<ValidationEntry>,
    ) -> Self {
        let status = if !errors.is_empty() {
            ValidationStatus::Blocked
        } else if !warnings.is_empty() {
            ValidationStatus::AllowedWithWarnings
        } else {
            ValidationStatus::Allowed
        };
        Self {
            status,
            errors,
            warnings,
            info,
        }
    }

    /// A blocked result carrying a single error
    pub fn blocked(entry: ValidationEntry) -> Self {
        Self::from_entries(vec![entry], Vec::new(), Vec::new())
    }

    pub fn is_allowed(&self) -> bool {
        self.status.is_allowed()
    }

    pub fn is_blocked(&self) -> bool {
        self.status == ValidationStatus::Blocked
    }

    pub fn entries(&self) -> impl Iterator<Item = &ValidationEntry> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.info.iter())
    }

    pub fn find(&self, kind: IssueKind) -> Option<&ValidationEntry> {
        self.entries().find(|e| e.kind == kind)
    }

    pub fn has_error(&self, kind: IssueKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    pub fn has_warning(&self, kind: IssueKind) -> bool {
        self.warnings.iter().any(|e| e.kind == kind)
    }

    pub fn has_info(&self, kind: IssueKind) -> bool {
        self.info.iter().any(|e| e.kind == kind)
    }
}
