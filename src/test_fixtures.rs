//! Test fixtures and utilities for reducing test setup duplication.
//!
//! This module provides:
//! - [`ProbeKind`]: a scriptable [`ComponentKind`] that counts calls
//! - helpers for temp directories, git repositories and component trees
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{ProbeKind, component};
//!
//! #[test]
//! fn my_test() {
//!     let kind = ProbeKind::with_deps(&["util"]).failing_fetch();
//!     let counters = kind.counters();
//!     let app = component("app", kind);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tempfile::TempDir;

use crate::component::{Component, ComponentKind};
use crate::error::{CinstallError, Result};
use crate::state::ComponentState;

/// Call counts recorded by a [`ProbeKind`]
#[derive(Debug, Default)]
pub struct ProbeCounters {
    pub fetch: AtomicUsize,
    pub load: AtomicUsize,
    pub resolve: AtomicUsize,
    pub dependencies: AtomicUsize,
    pub unload: AtomicUsize,
}

impl ProbeCounters {
    pub fn fetches(&self) -> usize {
        self.fetch.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> usize {
        self.load.load(Ordering::SeqCst)
    }
}

/// A component kind whose behavior is scripted by the test
pub struct ProbeKind {
    deps: Vec<String>,
    initial: ComponentState,
    fail_fetch: Arc<AtomicBool>,
    fail_load: Arc<AtomicBool>,
    delay: Duration,
    dependency_delay: Duration,
    counters: Arc<ProbeCounters>,
}

impl ProbeKind {
    /// A kind with no dependencies that starts NOT_INSTALLED
    pub fn new() -> Self {
        Self {
            deps: Vec::new(),
            initial: ComponentState::NotInstalled,
            fail_fetch: Arc::new(AtomicBool::new(false)),
            fail_load: Arc::new(AtomicBool::new(false)),
            delay: Duration::ZERO,
            dependency_delay: Duration::ZERO,
            counters: Arc::new(ProbeCounters::default()),
        }
    }

    pub fn with_deps(deps: &[&str]) -> Self {
        Self {
            deps: deps.iter().map(ToString::to_string).collect(),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn failing_fetch(self) -> Self {
        self.fail_fetch.store(true, Ordering::SeqCst);
        self
    }

    #[must_use]
    pub fn failing_load(self) -> Self {
        self.fail_load.store(true, Ordering::SeqCst);
        self
    }

    /// Sleep this long inside `fetch` and `load` to widen race windows
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sleep this long inside `compute_dependencies`
    #[must_use]
    pub fn with_dependency_delay(mut self, delay: Duration) -> Self {
        self.dependency_delay = delay;
        self
    }

    #[must_use]
    pub fn starting_at(mut self, state: ComponentState) -> Self {
        self.initial = state;
        self
    }

    pub fn counters(&self) -> Arc<ProbeCounters> {
        Arc::clone(&self.counters)
    }

    /// Flip this to make later fetches fail or succeed
    pub fn fetch_switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_fetch)
    }
}

impl ComponentKind for ProbeKind {
    fn path(&self) -> PathBuf {
        PathBuf::from("probe")
    }

    fn full_path(&self) -> PathBuf {
        std::env::temp_dir().join("probe")
    }

    fn fetch(&self) -> Result<()> {
        self.counters.fetch.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(CinstallError::FetchFailed {
                name: "probe".to_string(),
                reason: "connection reset".to_string(),
            });
        }
        Ok(())
    }

    fn load(&self) -> Result<()> {
        self.counters.load.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(CinstallError::LoadFailed {
                name: "probe".to_string(),
                reason: "descriptor is corrupt".to_string(),
            });
        }
        Ok(())
    }

    fn resolve_state(&self) -> ComponentState {
        self.counters.resolve.fetch_add(1, Ordering::SeqCst);
        self.initial
    }

    fn compute_dependencies(&self) -> Vec<String> {
        self.counters.dependencies.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.dependency_delay);
        self.deps.clone()
    }

    fn unload(&self) {
        self.counters.unload.fetch_add(1, Ordering::SeqCst);
    }
}

/// Wrap a kind into a shared component
pub fn component(name: &str, kind: ProbeKind) -> Arc<Component> {
    Arc::new(Component::new(name, Box::new(kind)))
}

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create test files below a base directory.
///
/// Takes a list of (path, content) tuples; paths are relative to `base`.
///
/// # Panics
///
/// Panics if any file cannot be created.
pub fn create_test_files(base: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = base.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full_path, content).expect("Failed to write test file");
    }
}

/// Create a git repository at `path` with the given files in one commit.
///
/// # Panics
///
/// Panics if the repository cannot be created or committed to.
pub fn create_git_repo(path: &Path, files: &[(&str, &str)]) -> git2::Repository {
    let repo = git2::Repository::init(path).expect("Failed to init git repository");
    create_test_files(path, files);
    {
        let mut index = repo.index().expect("Failed to open index");
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = repo.find_tree(tree_id).expect("Failed to find tree");
        let signature =
            git2::Signature::now("Test", "test@example.com").expect("Failed to create signature");
        repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
            .expect("Failed to commit");
    }
    repo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_create_git_repo() {
        let temp = create_temp_dir();
        create_git_repo(temp.path(), &[("README.md", "# hi\n")]);
        assert!(temp.path().join(".git").exists());
        assert!(temp.path().join("README.md").exists());
    }

    #[test]
    fn test_probe_counts_calls() {
        let kind = ProbeKind::with_deps(&["util"]).failing_load();
        let counters = kind.counters();

        assert!(kind.fetch().is_ok());
        assert!(kind.load().is_err());
        assert_eq!(kind.compute_dependencies(), vec!["util".to_string()]);
        assert_eq!(counters.fetches(), 1);
        assert_eq!(counters.loads(), 1);
    }
}
