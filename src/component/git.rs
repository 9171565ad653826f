//! Components cloned from a git repository

use std::path::{Path, PathBuf};

use tracing::debug;

use super::ComponentKind;
use super::descriptor::ComponentDescriptor;
use super::installed::InstallDir;
use crate::common::fs::remove_dir_if_exists;
use crate::error::Result;
use crate::git;
use crate::state::ComponentState;

/// A component whose source is a git repository.
///
/// The installed copy is a plain directory: git metadata is removed after
/// checkout, and the checked out commit is kept in the install marker.
pub struct GitComponent {
    url: String,
    git_ref: Option<String>,
    installed: InstallDir,
}

impl GitComponent {
    pub fn new(name: &str, url: impl Into<String>, git_ref: Option<String>, install_root: &Path) -> Self {
        Self {
            url: url.into(),
            git_ref,
            installed: InstallDir::new(name, install_root),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn git_ref(&self) -> Option<&str> {
        self.git_ref.as_deref()
    }

    /// Descriptor read by the last successful load
    pub fn descriptor(&self) -> Option<ComponentDescriptor> {
        self.installed.descriptor()
    }

    /// Commit the installed copy was checked out from
    pub fn revision(&self) -> Option<String> {
        self.installed.marker().and_then(|marker| marker.revision)
    }

    fn source_label(&self) -> String {
        match &self.git_ref {
            Some(git_ref) => format!("{}#{git_ref}", self.url),
            None => self.url.clone(),
        }
    }
}

impl ComponentKind for GitComponent {
    fn path(&self) -> PathBuf {
        PathBuf::from(self.installed.name())
    }

    fn full_path(&self) -> PathBuf {
        self.installed.dir().to_path_buf()
    }

    fn fetch(&self) -> Result<()> {
        let target = self.installed.dir();
        debug!(url = %self.url, git_ref = ?self.git_ref, "cloning component");
        self.installed.clear()?;

        // Only the default branch is available in a shallow clone.
        let repo = git::clone(&self.url, target, self.git_ref.is_none())
            .map_err(|e| self.installed.fetch_failed(e.to_string()))?;
        let revision = match &self.git_ref {
            Some(git_ref) => git::checkout_ref(&repo, git_ref),
            None => git::head_commit(&repo),
        }
        .map_err(|e| self.installed.fetch_failed(e.to_string()))?;
        drop(repo);

        remove_dir_if_exists(&target.join(".git")).map_err(|e| {
            self.installed
                .fetch_failed(format!("cannot remove git metadata: {e}"))
        })?;

        self.installed.seal(&self.source_label(), Some(revision))
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
        let Some(installed) = self.revision() else {
            return false;
        };
        match git::remote_commit(&self.url, self.git_ref.as_deref()) {
            Ok(Some(latest)) => latest != installed,
            Ok(None) => false,
            Err(err) => {
                debug!(url = %self.url, error = %err, "could not query remote");
                false
            }
        }
    }

    fn has_local_changes(&self) -> bool {
        self.installed.has_local_changes()
    }
}
