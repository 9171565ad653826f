//! The installed copy of a component below the install root
//!
//! Directory and git components differ only in how content arrives; once
//! it is on disk they are resolved, loaded and checked the same way.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::descriptor::{ComponentDescriptor, InstallMarker};
use crate::common::fs::remove_dir_if_exists;
use crate::error::{CinstallError, Result};
use crate::hash::{hash_directory, verify_hash};
use crate::state::ComponentState;

pub(crate) struct InstallDir {
    name: String,
    dir: PathBuf,
    descriptor: Mutex<Option<ComponentDescriptor>>,
}

impl InstallDir {
    pub(crate) fn new(name: &str, install_root: &Path) -> Self {
        Self {
            name: name.to_string(),
            dir: install_root.join(name),
            descriptor: Mutex::new(None),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn fetch_failed(&self, reason: impl Into<String>) -> CinstallError {
        CinstallError::FetchFailed {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Remove whatever an earlier, possibly interrupted fetch left behind
    /// and make sure the install root exists.
    pub(crate) fn clear(&self) -> Result<()> {
        remove_dir_if_exists(&self.dir).map_err(|e| {
            self.fetch_failed(format!("cannot remove {}: {e}", self.dir.display()))
        })?;
        if let Some(root) = self.dir.parent() {
            std::fs::create_dir_all(root).map_err(|e| {
                self.fetch_failed(format!("cannot create {}: {e}", root.display()))
            })?;
        }
        Ok(())
    }

    /// Hash the fetched content and write the install marker
    pub(crate) fn seal(&self, source: &str, revision: Option<String>) -> Result<()> {
        let hash = hash_directory(&self.dir).map_err(|e| self.fetch_failed(e.to_string()))?;
        let mut marker = InstallMarker::new(source, hash);
        marker.revision = revision;
        marker
            .write(&self.dir)
            .map_err(|e| self.fetch_failed(e.to_string()))
    }

    pub(crate) fn marker(&self) -> Option<InstallMarker> {
        InstallMarker::read(&self.dir)
    }

    pub(crate) fn resolve_state(&self) -> ComponentState {
        if InstallMarker::exists(&self.dir) {
            ComponentState::Fetched
        } else {
            ComponentState::NotInstalled
        }
    }

    pub(crate) fn load(&self) -> Result<()> {
        let descriptor = ComponentDescriptor::read(&self.name, &self.dir)?;
        *self.descriptor.lock().unwrap_or_else(PoisonError::into_inner) = Some(descriptor);
        Ok(())
    }

    pub(crate) fn descriptor(&self) -> Option<ComponentDescriptor> {
        self.descriptor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn dependencies(&self) -> Vec<String> {
        self.descriptor()
            .map(|descriptor| descriptor.dependencies)
            .unwrap_or_default()
    }

    pub(crate) fn unload(&self) {
        *self.descriptor.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub(crate) fn has_local_changes(&self) -> bool {
        let Some(marker) = self.marker() else {
            return false;
        };
        hash_directory(&self.dir).is_ok_and(|hash| !verify_hash(&marker.hash, &hash))
    }
}
