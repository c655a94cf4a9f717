//! Secondary-screen availability notifications
//!
//! The host forwards every display-settings change to
//! [`SecondaryScreenWatcher::handle_display_change`]. Subscribers hear about
//! it later, from the idle queue, and only when availability actually flipped.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use super::idle::IdleSender;
use crate::domain::screen;
use crate::platform::DisplayBackend;
use tracing::{debug, info, warn};

/// Payload delivered to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityChanged {
    pub available: bool,
}

type Handler = Arc<dyn Fn(AvailabilityChanged) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    handlers: BTreeMap<u64, Handler>,
}

/// Tracks whether a secondary screen exists and tells subscribers when that changes
pub struct SecondaryScreenWatcher<D> {
    displays: Arc<D>,
    available: Mutex<bool>,
    subscribers: Arc<Mutex<Subscribers>>,
    idle: IdleSender,
}

/// Keeps a handler attached; dropping it detaches the handler
#[must_use = "dropping the subscription detaches the handler"]
pub struct Subscription {
    subscribers: Weak<Mutex<Subscribers>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .handlers
                .remove(&self.id);
        }
    }
}

impl<D: DisplayBackend> SecondaryScreenWatcher<D> {
    pub fn new(displays: Arc<D>, idle: IdleSender) -> Self {
        let available = secondary_available(displays.as_ref());
        debug!(available, "secondary screen watcher created");
        Self {
            displays,
            available: Mutex::new(available),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
            idle,
        }
    }

    /// Last known availability of a secondary screen
    pub fn is_available(&self) -> bool {
        *self.available.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(AvailabilityChanged) + Send + Sync + 'static,
    {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.handlers.insert(id, Arc::new(handler));
        Subscription {
            subscribers: Arc::downgrade(&self.subscribers),
            id,
        }
    }

    /// Re-queries availability after a display-settings change
    ///
    /// Returns true if availability flipped and a notification was queued.
    /// Query, update and posting happen under one lock, so concurrent calls
    /// apply and notify in the order they queried.
    pub fn handle_display_change(&self) -> bool {
        let mut available = self.available.lock().unwrap_or_else(PoisonError::into_inner);
        let now = secondary_available(self.displays.as_ref());
        if *available == now {
            debug!(available = now, "display change without availability change");
            return false;
        }
        *available = now;

        info!(available = now, "secondary screen availability changed");
        let subscribers = Arc::downgrade(&self.subscribers);
        let posted = self.idle.post(move || {
            let Some(subscribers) = subscribers.upgrade() else {
                return;
            };
            // Snapshot so handlers may subscribe or unsubscribe while running
            let handlers: Vec<Handler> = subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .handlers
                .values()
                .cloned()
                .collect();
            let event = AvailabilityChanged { available: now };
            for handler in handlers {
                handler(event);
            }
        });
        if !posted {
            warn!("idle queue closed; availability change dropped");
        }
        posted
    }
}

fn secondary_available<D: DisplayBackend + ?Sized>(displays: &D) -> bool {
    match displays.screens() {
        Ok(screens) => screen::secondary(&screens).is_some(),
        Err(e) => {
            warn!("monitor enumeration failed: {e}");
            false
        }
    }
}
