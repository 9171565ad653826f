//! On-disk metadata of a component
//!
//! - `component.yaml`: written by the component author, shipped with the
//!   component, declares its dependencies
//! - `.cinstall.yaml`: written by cinstall after a successful fetch, records
//!   where the content came from and its hash

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CinstallError, Result};

/// File name of the component descriptor
pub const DESCRIPTOR_FILE: &str = "component.yaml";

/// File name of the install marker
pub const MARKER_FILE: &str = ".cinstall.yaml";

/// Metadata shipped inside a component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Component name; must match the manifest entry when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Names of required components, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl ComponentDescriptor {
    /// Parse a descriptor and check it against the expected component name
    pub fn from_yaml(component: &str, yaml: &str) -> Result<Self> {
        // An empty file is a valid descriptor without metadata
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let descriptor: Self =
            serde_yaml::from_str(yaml).map_err(|e| CinstallError::LoadFailed {
                name: component.to_string(),
                reason: format!("invalid {DESCRIPTOR_FILE}: {e}"),
            })?;
        descriptor.validate(component)?;
        Ok(descriptor)
    }

    /// Read the descriptor of the component installed at `dir`.
    ///
    /// A missing descriptor yields an empty one.
    pub fn read(component: &str, dir: &Path) -> Result<Self> {
        let path = dir.join(DESCRIPTOR_FILE);
        match std::fs::read_to_string(&path) {
            Ok(yaml) => Self::from_yaml(component, &yaml),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(CinstallError::LoadFailed {
                name: component.to_string(),
                reason: format!("cannot read {}: {err}", path.display()),
            }),
        }
    }

    fn validate(&self, component: &str) -> Result<()> {
        let invalid = |reason: String| CinstallError::LoadFailed {
            name: component.to_string(),
            reason,
        };

        if let Some(name) = &self.name {
            if name != component {
                return Err(invalid(format!(
                    "{DESCRIPTOR_FILE} declares name '{name}'"
                )));
            }
        }
        if self.dependencies.iter().any(|dep| dep.trim().is_empty()) {
            return Err(invalid("dependency name cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Record of a completed fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallMarker {
    /// Where the content was fetched from
    pub source: String,

    /// Content hash at fetch time, see [`crate::hash::hash_directory`]
    pub hash: String,

    /// Commit the content was checked out from, for git components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl InstallMarker {
    pub fn new(source: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            hash: hash.into(),
            revision: None,
        }
    }

    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Whether a marker exists below `dir`
    pub fn exists(dir: &Path) -> bool {
        dir.join(MARKER_FILE).is_file()
    }

    /// Read the marker below `dir`, if any.
    ///
    /// A marker that cannot be read or parsed counts as absent.
    pub fn read(dir: &Path) -> Option<Self> {
        let yaml = std::fs::read_to_string(dir.join(MARKER_FILE)).ok()?;
        serde_yaml::from_str(&yaml).ok()
    }

    /// Write the marker below `dir`
    pub fn write(&self, dir: &Path) -> Result<()> {
        let path = dir.join(MARKER_FILE);
        let write_failed = |reason: String| CinstallError::FileWriteFailed {
            path: path.display().to_string(),
            reason,
        };
        let yaml = serde_yaml::to_string(self).map_err(|e| write_failed(e.to_string()))?;
        std::fs::write(&path, yaml).map_err(|e| write_failed(e.to_string()))
    }
}
