//! YAML project files
//!
//! A tracked project can be described by a small YAML file instead of a
//! repo specifier on the command line. Keys mirror the policy flags; a key
//! in the file applies when the matching flag was not given.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml_ng::Error,
    },
}

/// Project description loaded from a `.yml`/`.yaml` file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectFile {
    /// Repo specifier in any form the CLI accepts.
    pub repo: Option<String>,
    pub only: Option<String>,
    pub having_asset: Option<String>,
    pub major: Option<String>,
}

impl ProjectFile {
    pub fn load(path: &Path) -> Result<Self, ProjectFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProjectFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml_ng::from_str(&content).map_err(|source| ProjectFileError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }
}
