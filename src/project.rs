//! A project: the components declared by one manifest
//!
//! Opening a project creates every declared component in the UNRESOLVED
//! state; nothing is touched on disk until the installer runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use wax::{CandidatePath, Glob, Pattern};

use crate::component::{Component, ComponentKind, DirectoryComponent, GitComponent};
use crate::config::{EntrySource, Manifest};
use crate::error::{CinstallError, Result};
use crate::source::{ComponentRegistry, ComponentSource};

/// Components of one manifest, ready to be installed
#[derive(Debug)]
pub struct Project {
    manifest_path: PathBuf,
    manifest: Manifest,
    install_root: PathBuf,
    registry: Arc<ComponentRegistry>,
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Project {
    /// Load the manifest at `manifest_path` and build its components.
    ///
    /// `root_override` replaces the manifest's `install_root`; a relative
    /// override is taken relative to the working directory.
    pub fn open(manifest_path: &Path, root_override: Option<&Path>) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let manifest_path =
            dunce::canonicalize(manifest_path).unwrap_or_else(|_| absolute(manifest_path));
        let manifest_dir = manifest_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let install_root = match root_override {
            Some(root) => absolute(root),
            None => manifest.install_root(&manifest_dir),
        };
        debug!(
            manifest = %manifest_path.display(),
            install_root = %install_root.display(),
            components = manifest.components.len(),
            "opened project"
        );

        let components = manifest
            .components
            .iter()
            .map(|entry| {
                let kind: Box<dyn ComponentKind> = match entry.source(&manifest_dir) {
                    EntrySource::Directory(source) => {
                        Box::new(DirectoryComponent::new(&entry.name, source, &install_root))
                    }
                    EntrySource::Git { url, git_ref } => {
                        Box::new(GitComponent::new(&entry.name, url, git_ref, &install_root))
                    }
                };
                Arc::new(Component::new(entry.name.clone(), kind))
            })
            .collect();

        Ok(Self {
            manifest_path,
            manifest,
            install_root,
            registry: Arc::new(ComponentRegistry::new(components)),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.manifest.name.as_deref()
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// All components in manifest order
    pub fn components(&self) -> &[Arc<Component>] {
        self.registry.components()
    }

    /// The components as a lookup source for the installer
    pub fn source(&self) -> Arc<dyn ComponentSource> {
        Arc::clone(&self.registry) as Arc<dyn ComponentSource>
    }

    /// Resolve names or glob patterns to components, in manifest order.
    ///
    /// Without patterns, selects `auto_install`, or every component when
    /// `auto_install` is empty.
    pub fn select(&self, patterns: &[String]) -> Result<Vec<Arc<Component>>> {
        if patterns.is_empty() {
            if self.manifest.auto_install.is_empty() {
                return Ok(self.components().to_vec());
            }
            return self.registry.get_components(&self.manifest.auto_install);
        }

        let globs = patterns
            .iter()
            .map(|pattern| {
                Glob::new(pattern)
                    .map(|glob| (pattern, glob))
                    .map_err(|e| CinstallError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut selected = vec![false; self.components().len()];
        for (pattern, glob) in &globs {
            let mut matched = false;
            for (index, component) in self.components().iter().enumerate() {
                if glob.matched(&CandidatePath::from(component.name())).is_some() {
                    selected[index] = true;
                    matched = true;
                }
            }
            if !matched {
                return Err(CinstallError::NoComponentsMatched {
                    pattern: (*pattern).clone(),
                });
            }
        }

        Ok(self
            .components()
            .iter()
            .zip(selected)
            .filter_map(|(component, keep)| keep.then(|| Arc::clone(component)))
            .collect())
    }
}
