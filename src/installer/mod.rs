//! Component installation engine
//!
//! This module handles:
//! - Driving components through fetch → load → dependencies
//! - Forking the installation of dependencies and joining on them
//! - De-duplicating concurrent requests for the same component
//!
//! There is no precomputed install plan. Each installation discovers the
//! dependencies of its component once the component is loaded and forks
//! their installation right then. Concurrent installations of the same
//! component race for each phase through conditional state transitions; the
//! losers wait for the winner instead of repeating the work, so `fetch` and
//! `load` run at most once per attempt.
//!
//! Failures never escape an installation: they end up in the component's
//! state, where [`Component::has_error`] reports them.

mod installation;

use std::collections::HashSet;
use std::sync::Arc;

use crate::component::Component;
use crate::error::Result;
use crate::source::ComponentSource;
use crate::state::{ComponentState, DependencyState};
use crate::task::TaskManager;

use installation::Installation;

/// Called once an asynchronous batch installation completes
pub type InstallCallback = Box<dyn FnOnce() + Send + 'static>;

/// Installs components and, transitively, their dependencies
pub struct ComponentInstaller<M: TaskManager> {
    source: Arc<dyn ComponentSource>,
    tasks: Arc<M>,
}

impl<M: TaskManager> Clone for ComponentInstaller<M> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            tasks: Arc::clone(&self.tasks),
        }
    }
}

impl<M: TaskManager> ComponentInstaller<M> {
    pub fn new(source: Arc<dyn ComponentSource>, tasks: Arc<M>) -> Self {
        Self { source, tasks }
    }

    /// Source used to resolve dependency names
    pub fn source(&self) -> &dyn ComponentSource {
        self.source.as_ref()
    }

    pub(crate) fn tasks(&self) -> &M {
        &self.tasks
    }

    pub(crate) fn wait_until_loaded_async(&self, component: Arc<Component>) -> M::Handle {
        self.tasks
            .fork(Box::new(move || component.state().wait_until(ComponentState::Loaded)))
    }

    fn install_internal_async(&self, component: Arc<Component>) -> M::Handle {
        let installation = Installation::new(self.clone(), component);
        self.tasks.fork(Box::new(move || {
            installation.run();
            Ok(())
        }))
    }

    /// Install every component concurrently, with dependencies.
    ///
    /// Returns once each installation has finished this attempt, whether
    /// the component ended up LOADED or in ERROR.
    ///
    /// # Errors
    ///
    /// Only task-level failures (a panicking installation) are returned;
    /// installation failures are recorded in component state.
    pub fn install_all(&self, components: &[Arc<Component>]) -> Result<()> {
        let handles = components
            .iter()
            .map(|component| self.install_internal_async(Arc::clone(component)))
            .collect();
        self.tasks.join_all(handles)
    }

    /// Install one component and its dependencies.
    ///
    /// # Errors
    ///
    /// See [`ComponentInstaller::install_all`].
    pub fn install(&self, component: &Arc<Component>) -> Result<()> {
        let handle = self.install_internal_async(Arc::clone(component));
        self.tasks.join(handle)
    }

    /// Install in the background and call `callback` when done.
    ///
    /// The returned handle may be joined or dropped.
    pub fn install_async(
        &self,
        components: Vec<Arc<Component>>,
        callback: Option<InstallCallback>,
    ) -> M::Handle {
        let installer = self.clone();
        self.tasks.fork(Box::new(move || {
            let result = installer.install_all(&components);
            if let Some(callback) = callback {
                callback();
            }
            result
        }))
    }

    /// Block until every component reachable from `roots` has settled, then
    /// re-validate them.
    ///
    /// Installations of dependencies outlive the installation that forked
    /// them; callers about to exit use this to let them finish. A dependency
    /// may fail after its dependents already counted it as LOADED, so the
    /// dependency state of every reached component is checked again once
    /// nothing is running. Only call it for roots an installation was
    /// started for.
    pub fn settle(&self, roots: &[Arc<Component>]) {
        let mut seen = HashSet::new();
        let mut reached = Vec::new();
        let mut pending = roots.to_vec();
        while let Some(component) = pending.pop() {
            if !seen.insert(component.name().to_string()) {
                continue;
            }
            reached.push(Arc::clone(&component));
            if component.state().wait_until(ComponentState::Loaded).is_err() {
                continue;
            }
            // A failed dependency phase is already recorded in the state.
            let _ = component
                .dependency_state()
                .wait_until(DependencyState::Loaded);
            pending.extend(
                component
                    .dependencies()
                    .iter()
                    .filter_map(|name| self.source.get_component_if_exists(name)),
            );
        }
        // Validation reads only primary states, which no longer change here,
        // so one pass is final.
        for component in &reached {
            component.validate(self.source.as_ref());
        }
    }
}

/// Builds installers that share one task manager
pub struct InstallerFactory<M: TaskManager> {
    tasks: Arc<M>,
}

impl<M: TaskManager> InstallerFactory<M> {
    pub fn new(tasks: M) -> Self {
        Self {
            tasks: Arc::new(tasks),
        }
    }

    pub fn installer_for(&self, source: Arc<dyn ComponentSource>) -> ComponentInstaller<M> {
        ComponentInstaller::new(source, Arc::clone(&self.tasks))
    }
}
