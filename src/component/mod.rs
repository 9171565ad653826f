//! Installable components
//!
//! A [`Component`] is the shared entity every kind of installable unit is
//! wrapped in. It owns the two state monitors and the observability hooks;
//! the kind-specific work (where the artifact comes from, how it is made
//! usable, what it depends on) lives behind [`ComponentKind`].
//!
//! Concrete kinds:
//! - [`directory::DirectoryComponent`]: copied from a local directory
//! - [`git::GitComponent`]: cloned from a git repository

pub mod descriptor;
pub mod directory;
pub mod git;
mod installed;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::event::Event;
use crate::source::ComponentSource;
use crate::state::{ComponentState, DependencyState, Listener, StateCode, StateMonitor};

pub use directory::DirectoryComponent;
pub use git::GitComponent;

/// Kind-specific behavior of a component.
///
/// The installer guarantees that `fetch` and `load` are called at most once
/// per install attempt, so implementations can treat them as all-or-nothing
/// steps.
pub trait ComponentKind: Send + Sync {
    /// Location of the component relative to the install root
    fn path(&self) -> PathBuf;

    /// Absolute location of the component on the local filesystem
    fn full_path(&self) -> PathBuf;

    /// Make the component's artifact locally available
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CinstallError::FetchFailed`] on I/O failure.
    fn fetch(&self) -> Result<()>;

    /// Bring a fetched artifact into a usable state
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CinstallError::LoadFailed`] when the artifact
    /// cannot be used.
    fn load(&self) -> Result<()>;

    /// Inspect the local filesystem and pick the starting state
    fn resolve_state(&self) -> ComponentState;

    /// Names of the components this one depends on.
    ///
    /// Only called once the component is loaded.
    fn compute_dependencies(&self) -> Vec<String>;

    /// Forget whatever `load` produced
    fn unload(&self) {}

    /// Whether the source offers different content than what was fetched
    fn is_updatable(&self) -> bool {
        false
    }

    /// Whether the fetched content was modified after fetching
    fn has_local_changes(&self) -> bool {
        false
    }
}

/// An installable unit with a primary and a dependency lifecycle
pub struct Component {
    name: String,
    kind: Box<dyn ComponentKind>,
    state: StateMonitor<ComponentState>,
    dependency_state: StateMonitor<DependencyState>,
    state_changed: Arc<Event>,
    on_error: Arc<Event>,
    dependencies: Mutex<Option<Vec<String>>>,
}

fn notifier<S: StateCode>(state_changed: &Arc<Event>, on_error: &Arc<Event>) -> Listener<S> {
    let state_changed = Arc::clone(state_changed);
    let on_error = Arc::clone(on_error);
    Box::new(move |state: S| {
        state_changed.trigger();
        if state.is_error() {
            on_error.trigger();
        }
    })
}

impl Component {
    /// Create a component in the UNRESOLVED state
    pub fn new(name: impl Into<String>, kind: Box<dyn ComponentKind>) -> Self {
        let state_changed = Arc::new(Event::new());
        let on_error = Arc::new(Event::new());
        Self {
            name: name.into(),
            kind,
            state: StateMonitor::with_listener(
                ComponentState::Unresolved,
                notifier(&state_changed, &on_error),
            ),
            dependency_state: StateMonitor::with_listener(
                DependencyState::Initial,
                notifier(&state_changed, &on_error),
            ),
            state_changed,
            on_error,
            dependencies: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Monitor of the primary lifecycle state
    pub fn state(&self) -> &StateMonitor<ComponentState> {
        &self.state
    }

    /// Monitor of the dependency-satisfaction state
    pub fn dependency_state(&self) -> &StateMonitor<DependencyState> {
        &self.dependency_state
    }

    /// Fired on every transition of either state
    pub fn state_changed(&self) -> &Event {
        &self.state_changed
    }

    /// Fired on every transition into an error state
    pub fn on_error(&self) -> &Event {
        &self.on_error
    }

    pub fn path(&self) -> PathBuf {
        self.kind.path()
    }

    pub fn full_path(&self) -> PathBuf {
        self.kind.full_path()
    }

    /// Whether the state of the component is likely to change soon
    pub fn is_active(&self) -> bool {
        let state = self.state.get();
        state == ComponentState::Fetching
            || state == ComponentState::Loading
            || self.dependency_state.get() == DependencyState::Waiting
    }

    /// Whether the component itself, or one of its dependencies, failed
    pub fn has_error(&self) -> bool {
        let state = self.state.get();
        state.is_error() || (state == ComponentState::Loaded && self.dependency_state.has_error())
    }

    pub fn is_updatable(&self) -> bool {
        self.kind.is_updatable()
    }

    pub fn has_local_changes(&self) -> bool {
        self.kind.has_local_changes()
    }

    pub(crate) fn fetch(&self) -> Result<()> {
        self.kind.fetch()
    }

    pub(crate) fn load(&self) -> Result<()> {
        self.kind.load()
    }

    /// Leave UNRESOLVED for whatever state the filesystem suggests.
    ///
    /// No-op once resolved.
    pub fn resolve_state(&self) {
        if self.state.get() == ComponentState::Unresolved {
            let resolved = self.kind.resolve_state();
            self.state
                .set_conditionally_to(resolved, &[ComponentState::Unresolved]);
        }
    }

    pub fn set_unresolved(&self) {
        self.state.set(ComponentState::Unresolved);
    }

    /// Names of the dependencies, computed once and cached.
    ///
    /// Must not be called before the component is LOADED.
    pub fn dependencies(&self) -> Vec<String> {
        let mut cached = self
            .dependencies
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cached
            .get_or_insert_with(|| self.kind.compute_dependencies())
            .clone()
    }

    /// Drop the cached dependency list and whatever `load` produced
    pub fn unload(&self) {
        *self
            .dependencies
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
        self.kind.unload();
    }

    /// Give a component in ERROR a fresh start.
    ///
    /// The unload happens inside the ERROR → UNRESOLVED transition, so of
    /// several racing callers exactly one unloads, and no caller can get
    /// past UNRESOLVED before it has. Returns whether this caller did the
    /// reset.
    pub fn reset_after_error(&self) -> bool {
        let reset = self.state.set_conditionally_with(
            ComponentState::Unresolved,
            &[ComponentState::Error],
            || self.unload(),
        );
        self.resolve_state();
        reset
    }

    fn are_dependencies_loaded(&self, source: &dyn ComponentSource) -> bool {
        self.dependencies().iter().all(|name| {
            source
                .get_component_if_exists(name)
                .is_some_and(|dep| dep.state().get() == ComponentState::Loaded)
        })
    }

    /// Re-check dependency integrity of a loaded component.
    ///
    /// Moves the dependency state to DEP_LOADED when every dependency is
    /// loaded and to DEP_ERROR otherwise. Does nothing unless the component
    /// is LOADED and no installation is currently waiting on dependencies.
    pub fn validate(&self, source: &dyn ComponentSource) {
        if self.state.get() != ComponentState::Loaded {
            return;
        }
        let dep_state = self.dependency_state.get();
        if dep_state == DependencyState::Waiting {
            return;
        }
        let next = if self.are_dependencies_loaded(source) {
            DependencyState::Loaded
        } else {
            DependencyState::Error
        };
        self.dependency_state.set_conditionally_to(next, &[dep_state]);
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("state", &self.state.get())
            .field("dependency_state", &self.dependency_state.get())
            .finish_non_exhaustive()
    }
}
