//! Component lifecycle states
//!
//! A component moves through two independent dimensions:
//! - [`ComponentState`]: its own fetch/load lifecycle
//! - [`DependencyState`]: whether its declared dependencies are loaded
//!
//! Both are ordered so that waiting for a state means waiting until the
//! state has been reached *or passed*. Error codes sort below every
//! progress code and are never "reached" by waiting.

pub mod monitor;

pub use monitor::{Listener, StateMonitor};

use std::fmt;

/// A state code that can be held by a [`StateMonitor`].
pub trait StateCode: Copy + Eq + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Whether this code is the error sentinel of its dimension.
    fn is_error(self) -> bool;

    /// Integer representation of the code.
    fn code(self) -> i32;
}

/// Primary lifecycle state of a component.
///
/// Variants are declared in ascending code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentState {
    /// Initial state before the component has inspected its surroundings.
    Unresolved = -2,
    Error = -1,
    NotInstalled = 0,
    Fetching = 1,
    Fetched = 2,
    Loading = 3,
    Loaded = 4,
}

impl StateCode for ComponentState {
    fn is_error(self) -> bool {
        self == ComponentState::Error
    }

    fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentState::Unresolved => "unresolved",
            ComponentState::Error => "error",
            ComponentState::NotInstalled => "not installed",
            ComponentState::Fetching => "fetching",
            ComponentState::Fetched => "fetched",
            ComponentState::Loading => "loading",
            ComponentState::Loaded => "loaded",
        };
        f.write_str(s)
    }
}

/// Dependency-satisfaction state of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DependencyState {
    Error = -1,
    Initial = 0,
    Waiting = 1,
    Loaded = 2,
}

impl StateCode for DependencyState {
    fn is_error(self) -> bool {
        self == DependencyState::Error
    }

    fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for DependencyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyState::Error => "dependency error",
            DependencyState::Initial => "unchecked",
            DependencyState::Waiting => "waiting",
            DependencyState::Loaded => "satisfied",
        };
        f.write_str(s)
    }
}
