//! cinstall - concurrent installer for interdependent components
//!
//! Components declared in a `cinstall.yaml` manifest are fetched, loaded and
//! wired to their dependencies concurrently. Each component carries two
//! observable state machines (its own lifecycle and the satisfaction of its
//! dependencies); concurrent requests for the same component share one
//! fetch and one load.
//!
//! The main entry points are [`project::Project`] to open a manifest and
//! [`installer::ComponentInstaller`] to install its components.

pub mod cli;
pub mod commands;
pub mod common;
pub mod component;
pub mod config;
pub mod error;
pub mod event;
pub mod git;
pub mod hash;
pub mod installer;
pub mod logging;
pub mod progress;
pub mod project;
pub mod source;
pub mod state;
pub mod task;

#[cfg(test)]
#[allow(clippy::expect_used)]
mod test_fixtures;

pub use component::{Component, ComponentKind};
pub use error::{CinstallError, Result};
pub use installer::{ComponentInstaller, InstallerFactory};
pub use project::Project;
pub use source::{ComponentRegistry, ComponentSource};
pub use state::{ComponentState, DependencyState, StateMonitor};
pub use task::{TaskManager, ThreadTaskManager};
