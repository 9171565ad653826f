//! Fork/join task management
//!
//! The installer nests forks arbitrarily deep: an installation forks the
//! installation of each dependency, which forks its own. A [`TaskManager`]
//! must therefore never deadlock on nesting. [`ThreadTaskManager`] gives
//! every forked unit its own OS thread, so a task blocked in a state wait
//! never keeps another task from running.

use std::any::Any;
use std::thread::{self, JoinHandle};

use tracing::warn;

use crate::error::{CinstallError, Result};

/// A unit of work that can be forked
pub type Work = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// Schedules work concurrently and lets callers wait for it
pub trait TaskManager: Send + Sync + 'static {
    /// Handle to a forked unit of work
    type Handle: Send + 'static;

    /// Start `work` concurrently and return immediately
    fn fork(&self, work: Work) -> Self::Handle;

    /// Block until the unit behind `handle` completes.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by the work, or
    /// [`CinstallError::TaskPanicked`] if it panicked.
    fn join(&self, handle: Self::Handle) -> Result<()>;

    /// Block until every unit completes.
    ///
    /// All handles are joined even if some fail.
    ///
    /// # Errors
    ///
    /// Returns the first failure in handle order.
    fn join_all(&self, handles: Vec<Self::Handle>) -> Result<()> {
        let mut first_error = None;
        for handle in handles {
            if let Err(err) = self.join(handle) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Handle returned by [`ThreadTaskManager::fork`]
#[derive(Debug)]
pub struct TaskHandle {
    inner: HandleInner,
}

#[derive(Debug)]
enum HandleInner {
    Spawned(JoinHandle<Result<()>>),
    // The work ran on the forking thread because no thread could be spawned.
    Completed(Result<()>),
}

/// Runs every forked unit on a dedicated thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadTaskManager;

impl ThreadTaskManager {
    pub fn new() -> Self {
        Self
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl TaskManager for ThreadTaskManager {
    type Handle = TaskHandle;

    fn fork(&self, work: Work) -> TaskHandle {
        // The closure is handed back on spawn failure so it can run inline.
        let slot = std::sync::Arc::new(std::sync::Mutex::new(Some(work)));
        let thread_slot = std::sync::Arc::clone(&slot);
        let spawned = thread::Builder::new()
            .name("cinstall-task".to_string())
            .spawn(move || {
                let work = thread_slot
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .take();
                work.map_or(Ok(()), |work| work())
            });

        let inner = match spawned {
            Ok(handle) => HandleInner::Spawned(handle),
            Err(err) => {
                warn!(error = %err, "could not spawn task thread, running inline");
                let work = slot
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .take();
                HandleInner::Completed(work.map_or(Ok(()), |work| work()))
            }
        };
        TaskHandle { inner }
    }

    fn join(&self, handle: TaskHandle) -> Result<()> {
        match handle.inner {
            HandleInner::Spawned(handle) => {
                handle
                    .join()
                    .map_err(|payload| CinstallError::TaskPanicked {
                        message: panic_message(payload.as_ref()),
                    })?
            }
            HandleInner::Completed(result) => result,
        }
    }
}
