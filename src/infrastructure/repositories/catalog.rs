//! Catalog files: spec documents on disk
//!
//! A catalog maps component types to lists of spec documents, each carrying
//! its own `uuid`:
//!
//! ```yaml
//! cpu:
//!   - uuid: cpu-6338
//!     model: Xeon Gold 6338
//!     socket: LGA4189
//! motherboard:
//!   - uuid: mb-x12dpi
//!     socket: LGA4189
//! ```
//!
//! `.yaml` / `.yml` files are read as YAML, everything else as JSON.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use super::memory::InMemorySpecRepository;
use crate::domain::value_objects::ComponentType;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("catalog {path}: unknown component type '{section}'")]
    UnknownType { path: PathBuf, section: String },

    #[error("catalog {path}: entry {index} of '{section}' has no uuid")]
    MissingUuid {
        path: PathBuf,
        section: String,
        index: usize,
    },
}

pub struct CatalogFile;

impl CatalogFile {
    pub fn load(path: &Path) -> Result<InMemorySpecRepository, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parse catalog text; `path` selects the format and labels errors
    pub fn parse(path: &Path, content: &str) -> Result<InMemorySpecRepository, CatalogError> {
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let root: Value = if is_yaml {
            serde_yaml_ng::from_str(content).map_err(|e| CatalogError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_json::from_str(content).map_err(|e| CatalogError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        let Value::Object(sections) = root else {
            return Err(CatalogError::Parse {
                path: path.to_path_buf(),
                message: "top level must map component types to spec lists".to_string(),
            });
        };

        let mut repo = InMemorySpecRepository::new();
        for (section, docs) in sections {
            let ty = ComponentType::from_str(&section).map_err(|_| CatalogError::UnknownType {
                path: path.to_path_buf(),
                section: section.clone(),
            })?;
            let Value::Array(docs) = docs else {
                return Err(CatalogError::Parse {
                    path: path.to_path_buf(),
                    message: format!("section '{}' must be a list", section),
                });
            };
            for (index, doc) in docs.into_iter().enumerate() {
                let uuid = match doc.get("uuid") {
                    Some(Value::String(s)) if !s.is_empty() => s.clone(),
                    _ => {
                        return Err(CatalogError::MissingUuid {
                            path: path.to_path_buf(),
                            section,
                            index,
                        })
                    }
                };
                repo.insert(ty, uuid, doc);
            }
        }
        Ok(repo)
    }
}
