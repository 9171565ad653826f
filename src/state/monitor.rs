//! Thread-safe state holder with blocking waits
//!
//! A [`StateMonitor`] owns one state code behind a mutex and a condition
//! variable. All transitions go through [`StateMonitor::set`],
//! [`StateMonitor::set_conditionally_to`] or
//! [`StateMonitor::set_conditionally_with`]; every successful transition
//! wakes all waiters and invokes the registered listener once with the new
//! value.
//!
//! The listener runs after the lock is released, so it may read the monitor.
//! When two transitions race, their listener calls may arrive in the
//! opposite order; a listener that needs the latest state should call
//! [`StateMonitor::get`] rather than trust its argument.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::StateCode;
use crate::error::{CinstallError, Result};

/// Callback invoked after every transition of a monitor.
pub type Listener<S> = Box<dyn Fn(S) + Send + Sync>;

/// Holds a state code and lets threads wait for it to advance.
pub struct StateMonitor<S: StateCode> {
    state: Mutex<S>,
    changed: Condvar,
    listener: Option<Listener<S>>,
}

impl<S: StateCode> StateMonitor<S> {
    /// Create a monitor without a listener
    pub fn new(initial: S) -> Self {
        Self {
            state: Mutex::new(initial),
            changed: Condvar::new(),
            listener: None,
        }
    }

    /// Create a monitor whose listener is called on every transition
    pub fn with_listener(initial: S, listener: Listener<S>) -> Self {
        Self {
            state: Mutex::new(initial),
            changed: Condvar::new(),
            listener: Some(listener),
        }
    }

    // The guarded value is a plain Copy code, so a poisoned lock still holds
    // a valid state.
    fn lock(&self) -> MutexGuard<'_, S> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state, without blocking on transitions
    pub fn get(&self) -> S {
        *self.lock()
    }

    /// Whether the current state is an error code
    pub fn has_error(&self) -> bool {
        self.get().is_error()
    }

    /// Unconditionally transition to `new_state`
    pub fn set(&self, new_state: S) {
        {
            let mut state = self.lock();
            *state = new_state;
        }
        self.changed.notify_all();
        self.fire(new_state);
    }

    /// Transition to `new_state` only if the current state is one of
    /// `expected`. Returns whether the transition happened.
    ///
    /// Exactly one of any number of racing callers observes `true`.
    pub fn set_conditionally_to(&self, new_state: S, expected: &[S]) -> bool {
        self.set_conditionally_with(new_state, expected, || {})
    }

    /// Like [`StateMonitor::set_conditionally_to`], but runs `during` before
    /// the new state is stored, while the lock is held.
    ///
    /// Nobody observes the old or the new state until `during` returns, so it
    /// can prepare whatever the new state promises. `during` must not touch
    /// this monitor.
    pub fn set_conditionally_with<F>(&self, new_state: S, expected: &[S], during: F) -> bool
    where
        F: FnOnce(),
    {
        {
            let mut state = self.lock();
            if !expected.contains(&*state) {
                return false;
            }
            during();
            *state = new_state;
        }
        self.changed.notify_all();
        self.fire(new_state);
        true
    }

    /// Block until the state has reached or passed `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CinstallError::WaitAborted`] as soon as an error code is
    /// observed, since the awaited transition will then never happen.
    pub fn wait_until(&self, target: S) -> Result<()> {
        let guard = self.lock();
        let guard = self
            .changed
            .wait_while(guard, |state| !state.is_error() && *state < target)
            .unwrap_or_else(PoisonError::into_inner);
        Self::check_reached(*guard, target)
    }

    /// Like [`StateMonitor::wait_until`], but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`CinstallError::WaitTimedOut`] when the deadline passes
    /// first, or [`CinstallError::WaitAborted`] on an error code.
    pub fn wait_until_timeout(&self, target: S, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        let guard = self.lock();
        let (guard, result) = self
            .changed
            .wait_timeout_while(guard, timeout, |state| {
                !state.is_error() && *state < target
            })
            .unwrap_or_else(PoisonError::into_inner);
        if result.timed_out() && !guard.is_error() && *guard < target {
            return Err(CinstallError::WaitTimedOut {
                target: target.to_string(),
                waited_ms: started.elapsed().as_millis(),
            });
        }
        Self::check_reached(*guard, target)
    }

    fn check_reached(state: S, target: S) -> Result<()> {
        if state.is_error() {
            return Err(CinstallError::WaitAborted {
                target: target.to_string(),
                state: state.to_string(),
            });
        }
        Ok(())
    }

    fn fire(&self, new_state: S) {
        if let Some(listener) = &self.listener {
            listener(new_state);
        }
    }
}

impl<S: StateCode> std::fmt::Debug for StateMonitor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMonitor")
            .field("state", &self.get())
            .finish_non_exhaustive()
    }
}
