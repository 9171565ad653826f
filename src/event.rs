//! Synchronous notification hooks
//!
//! An [`Event`] is a list of subscriber callbacks. Triggering it calls each
//! subscriber on the triggering thread, in subscription order. Subscribers
//! run outside the subscriber lock and may subscribe further callbacks,
//! which take effect from the next trigger on.

use std::sync::{Arc, Mutex, PoisonError};

type Subscriber = Arc<dyn Fn() + Send + Sync>;

/// A list of callbacks fired together
#[derive(Default)]
pub struct Event {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(callback));
    }

    /// Call every subscriber
    pub fn trigger(&self) {
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for subscriber in &subscribers {
            subscriber();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
