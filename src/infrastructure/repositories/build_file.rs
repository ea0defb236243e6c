//! Build files: persisted build records with JSON-text assignments
//!
//! Records keep the assignment as JSON text inside an otherwise flat row,
//! the way the surrounding service stores it:
//!
//! ```json
//! {"builds": [{"build_id": "b1", "components": [
//!   {"type": "nic", "uuid": "nic-1", "quantity": 1,
//!    "assignment": "{\"kind\":\"slot\",\"slot_id\":\"pcie_x16_slot_1\"}"}
//! ]}]}
//! ```
//!
//! The text is decoded into a typed `Assignment` when a build is read; bad
//! text is `BuildStoreError::AssignmentDecode`, never a silent `None`.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::domain::entities::{Assignment, ExistingComponent, ExistingComponentSet};
use crate::domain::ports::{BuildStore, BuildStoreError};
use crate::domain::value_objects::ComponentType;

#[derive(Debug, Clone, Deserialize)]
struct RawComponent {
    #[serde(alias = "component_type")]
    r#type: String,
    uuid: String,
    #[serde(default = "one")]
    quantity: u32,
    #[serde(default)]
    assignment: Option<String>,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
struct RawBuild {
    build_id: String,
    #[serde(default)]
    components: Vec<RawComponent>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawBuildFile {
    #[serde(default)]
    builds: Vec<RawBuild>,
}

/// Build store over a JSON build file
#[derive(Debug, Clone)]
pub struct BuildFile {
    builds: Vec<RawBuild>,
}

impl BuildFile {
    pub fn load(path: &Path) -> Result<Self, BuildStoreError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| BuildStoreError::Unavailable {
                message: format!("{}: {}", path.display(), e),
            })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, BuildStoreError> {
        let raw: RawBuildFile =
            serde_json::from_str(content).map_err(|e| BuildStoreError::InvalidRecord {
                message: e.to_string(),
            })?;
        Ok(Self { builds: raw.builds })
    }

    pub fn build_ids(&self) -> impl Iterator<Item = &str> {
        self.builds.iter().map(|b| b.build_id.as_str())
    }
}

impl BuildStore for BuildFile {
    fn get_components(&self, build_id: &str) -> Result<ExistingComponentSet, BuildStoreError> {
        let raw = self
            .builds
            .iter()
            .find(|b| b.build_id == build_id)
            .ok_or_else(|| BuildStoreError::BuildNotFound {
                build_id: build_id.to_string(),
            })?;

        let mut set = ExistingComponentSet::new(build_id);
        for record in &raw.components {
            set.push(decode_component(record)?);
        }
        Ok(set)
    }
}

fn decode_component(record: &RawComponent) -> Result<ExistingComponent, BuildStoreError> {
    let ty = ComponentType::from_str(&record.r#type).map_err(|_| {
        BuildStoreError::InvalidRecord {
            message: format!(
                "component '{}' has unknown type '{}'",
                record.uuid, record.r#type
            ),
        }
    })?;

    let mut component = ExistingComponent::new(ty, &record.uuid).with_quantity(record.quantity);
    if let Some(text) = record.assignment.as_deref().filter(|t| !t.trim().is_empty()) {
        let assignment: Assignment =
            serde_json::from_str(text).map_err(|e| BuildStoreError::AssignmentDecode {
                uuid: record.uuid.clone(),
                message: e.to_string(),
            })?;
        component = component.with_assignment(assignment);
    }
    Ok(component)
}
