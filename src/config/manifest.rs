//! Project manifest (cinstall.yaml)

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CinstallError, Result};

/// Default manifest file name
pub const MANIFEST_FILE: &str = "cinstall.yaml";

/// Install root used when the manifest does not name one
pub const DEFAULT_INSTALL_ROOT: &str = "components";

/// Project manifest from cinstall.yaml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Project name, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Where components are installed, relative to the manifest directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_root: Option<String>,

    /// Components installed when no names are given on the command line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auto_install: Vec<String>,

    /// Declared components, in manifest order
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
}

/// A component declaration in cinstall.yaml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub name: String,

    /// Local source directory, relative to the manifest directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Git repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,

    /// Git ref (branch, tag or commit)
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

/// Where a declared component comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    Directory(PathBuf),
    Git { url: String, git_ref: Option<String> },
}

fn invalid(message: String) -> CinstallError {
    CinstallError::ManifestInvalid { message }
}

impl ComponentEntry {
    /// Check that the entry names exactly one source and a usable name
    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid("Component name cannot be empty".to_string()));
        }
        // The name doubles as directory name below the install root.
        if name != self.name || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(invalid(format!(
                "Component name '{}' cannot be used as a directory name",
                self.name
            )));
        }

        match (&self.path, &self.git) {
            (Some(_), Some(_)) => Err(invalid(format!(
                "Component '{name}' cannot have both 'path' and 'git'"
            ))),
            (None, None) => Err(invalid(format!(
                "Component '{name}' needs either 'path' or 'git'"
            ))),
            (Some(_), None) if self.git_ref.is_some() => Err(invalid(format!(
                "Component '{name}' has a 'ref' but no 'git'"
            ))),
            _ => Ok(()),
        }
    }

    /// Resolve the entry's source against the manifest directory
    pub fn source(&self, manifest_dir: &Path) -> EntrySource {
        match (&self.path, &self.git) {
            (Some(path), _) => EntrySource::Directory(manifest_dir.join(path)),
            (None, Some(url)) => EntrySource::Git {
                url: url.clone(),
                git_ref: self.git_ref.clone(),
            },
            (None, None) => EntrySource::Directory(manifest_dir.join(&self.name)),
        }
    }
}

impl Manifest {
    /// Parse a manifest from YAML and validate it
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest = Self::parse(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn parse(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty file declares nothing
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Load and validate the manifest at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CinstallError::ManifestNotFound {
                    path: path.display().to_string(),
                }
            } else {
                CinstallError::FileReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let manifest =
            Self::parse(&yaml).map_err(|e| CinstallError::ManifestParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate entries, name uniqueness and `auto_install` references
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for entry in &self.components {
            entry.validate()?;
            if !names.insert(entry.name.as_str()) {
                return Err(invalid(format!(
                    "Component '{}' is declared more than once",
                    entry.name
                )));
            }
        }

        if let Some(unknown) = self
            .auto_install
            .iter()
            .find(|name| !names.contains(name.as_str()))
        {
            return Err(invalid(format!(
                "auto_install references undeclared component '{unknown}'"
            )));
        }

        Ok(())
    }

    /// Install root resolved against the manifest directory
    pub fn install_root(&self, manifest_dir: &Path) -> PathBuf {
        manifest_dir.join(self.install_root.as_deref().unwrap_or(DEFAULT_INSTALL_ROOT))
    }
}
