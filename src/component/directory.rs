//! Components copied from a local directory

use std::path::{Path, PathBuf};

use tracing::debug;

use super::ComponentKind;
use super::descriptor::ComponentDescriptor;
use super::installed::InstallDir;
use crate::common::fs::{CopyOptions, copy_dir_recursive};
use crate::error::Result;
use crate::hash::{hash_directory, verify_hash};
use crate::state::ComponentState;

/// A component whose source is a directory on the local filesystem
pub struct DirectoryComponent {
    source: PathBuf,
    installed: InstallDir,
}

impl DirectoryComponent {
    /// `source` is copied to `<install_root>/<name>` on fetch
    pub fn new(name: &str, source: impl Into<PathBuf>, install_root: &Path) -> Self {
        Self {
            source: source.into(),
            installed: InstallDir::new(name, install_root),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Descriptor read by the last successful load
    pub fn descriptor(&self) -> Option<ComponentDescriptor> {
        self.installed.descriptor()
    }
}

impl ComponentKind for DirectoryComponent {
    fn path(&self) -> PathBuf {
        PathBuf::from(self.installed.name())
    }

    fn full_path(&self) -> PathBuf {
        self.installed.dir().to_path_buf()
    }

    fn fetch(&self) -> Result<()> {
        if !self.source.is_dir() {
            return Err(self.installed.fetch_failed(format!(
                "source directory {} does not exist",
                self.source.display()
            )));
        }

        let target = self.installed.dir();
        debug!(source = %self.source.display(), target = %target.display(), "copying component");
        self.installed.clear()?;
        copy_dir_recursive(&self.source, target, &CopyOptions::for_component()).map_err(|e| {
            self.installed
                .fetch_failed(format!("cannot copy {}: {e}", self.source.display()))
        })?;

        self.installed
            .seal(&self.source.display().to_string(), None)
    }

    fn load(&self) -> Result<()> {
        self.installed.load()
    }

    fn resolve_state(&self) -> ComponentState {
        self.installed.resolve_state()
    }

    fn compute_dependencies(&self) -> Vec<String> {
        self.installed.dependencies()
    }

    fn unload(&self) {
        self.installed.unload();
    }

    fn is_updatable(&self) -> bool {
        let Some(marker) = self.installed.marker() else {
            return false;
        };
        hash_directory(&self.source).is_ok_and(|hash| !verify_hash(&marker.hash, &hash))
    }

    fn has_local_changes(&self) -> bool {
        self.installed.has_local_changes()
    }
}
