//! Installation of a single component
//!
//! Every step is re-entrant: any number of installations of the same
//! component may run at once and converge on the same end state.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn};

use super::ComponentInstaller;
use crate::component::Component;
use crate::error::{CinstallError, Result};
use crate::state::{ComponentState, DependencyState};
use crate::task::TaskManager;

/// Give a failed component a fresh start.
///
/// Only one of several racing callers performs the reset.
pub(super) fn reset_if_error(component: &Component) {
    if component.reset_after_error() {
        debug!(component = component.name(), "retrying after earlier failure");
    }
}

pub(super) struct Installation<M: TaskManager> {
    installer: ComponentInstaller<M>,
    component: Arc<Component>,
}

impl<M: TaskManager> Installation<M> {
    pub(super) fn new(installer: ComponentInstaller<M>, component: Arc<Component>) -> Self {
        Self {
            installer,
            component,
        }
    }

    pub(super) fn run(&self) {
        let component = &self.component;
        let _span = info_span!("install", component = component.name()).entered();

        component.resolve_state();
        reset_if_error(component);

        let result = self
            .fetch()
            .and_then(|()| self.load())
            .and_then(|()| self.wait_for_dependencies());

        match result {
            Ok(()) => debug!("installation finished"),
            // Whoever owned the phase already recorded its failure.
            Err(err @ CinstallError::WaitAborted { .. }) => {
                debug!(error = %err, "gave up waiting for another installation");
            }
            Err(err) => {
                if err.is_install_failure() {
                    info!(error = %err, "A component could not be installed");
                } else {
                    warn!(error = %err, "Unexpected failure while installing a component");
                }
                if !component.state().has_error() {
                    component.state().set(ComponentState::Error);
                }
            }
        }

        component.validate(self.installer.source());
    }

    fn fetch(&self) -> Result<()> {
        let state = self.component.state();
        if state.set_conditionally_to(ComponentState::Fetching, &[ComponentState::NotInstalled]) {
            debug!("fetching");
            self.component.fetch()?;
            state.set(ComponentState::Fetched);
            Ok(())
        } else {
            state.wait_until(ComponentState::Fetched)
        }
    }

    fn load(&self) -> Result<()> {
        let state = self.component.state();
        if state.set_conditionally_to(ComponentState::Loading, &[ComponentState::Fetched]) {
            debug!("loading");
            self.component.load()?;
            state.set(ComponentState::Loaded);
            Ok(())
        } else {
            state.wait_until(ComponentState::Loaded)
        }
    }

    fn wait_for_dependencies(&self) -> Result<()> {
        let dep_state = self.component.dependency_state();
        if !dep_state.set_conditionally_to(
            DependencyState::Waiting,
            &[DependencyState::Initial, DependencyState::Error],
        ) {
            // A failed dependency is reported through validation, not as a
            // failure of this component.
            if let Err(err) = dep_state.wait_until(DependencyState::Loaded) {
                debug!(error = %err, "dependencies of another installation failed");
            }
            return Ok(());
        }

        match self.install_dependencies() {
            Ok(()) => {
                dep_state.set(DependencyState::Loaded);
                Ok(())
            }
            Err(err @ CinstallError::WaitAborted { .. }) => {
                info!(error = %err, "A dependency could not be installed");
                dep_state.set(DependencyState::Error);
                Ok(())
            }
            Err(err) => {
                // ERROR must be visible before anyone waiting on the
                // dependency phase wakes up.
                self.component.state().set(ComponentState::Error);
                dep_state.set(DependencyState::Error);
                Err(err)
            }
        }
    }

    fn install_dependencies(&self) -> Result<()> {
        let names = self.component.dependencies();
        let dependencies = self.installer.source().get_components(&names)?;
        debug!(dependencies = ?names, "installing dependencies");

        for dependency in &dependencies {
            dependency.resolve_state();
            reset_if_error(dependency);
        }

        // Not joined: each dependency only has to reach LOADED, not finish
        // its own dependency phase.
        drop(self.installer.install_async(dependencies.clone(), None));

        let waits = dependencies
            .into_iter()
            .map(|dependency| self.installer.wait_until_loaded_async(dependency))
            .collect();
        self.installer.tasks().join_all(waits)
    }
}
