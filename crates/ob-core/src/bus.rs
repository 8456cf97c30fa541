use crate::{InvalidationEvent, ListenerId};

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, RwLock};

use log::{debug, warn};

/// Callback receiving every event emitted on the bus
pub type BusListener = dyn Fn(&InvalidationEvent) + Send + Sync;

/// Process-wide fan-out channel for invalidation events.
///
/// The bus knows nothing about tenants, storage or transport; it delivers
/// every event to every listener, in emission order, and listeners filter
/// for themselves. A panicking listener is caught and logged; it never stops
/// delivery to the remaining listeners.
pub struct InvalidationBus {
    inner: Arc<RwLock<BusInner>>,
}

struct BusInner {
    listeners: Vec<(ListenerId, Arc<BusListener>)>,
}

impl InvalidationBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(BusInner {
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener for all events
    pub fn subscribe(&self, listener: impl Fn(&InvalidationEvent) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId::new();
        let mut inner = self.inner.write().unwrap();
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a previously registered listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ListenerId) {
        let mut inner = self.inner.write().unwrap();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    /// Deliver one event to every listener
    pub fn emit(&self, event: &InvalidationEvent) {
        self.emit_many(std::slice::from_ref(event));
    }

    /// Deliver a batch of events, in order, to every listener
    pub fn emit_many(&self, events: &[InvalidationEvent]) {
        if events.is_empty() {
            return;
        }

        // Snapshot before dispatch so listeners may subscribe or unsubscribe
        // while being notified.
        let listeners = {
            let inner = self.inner.read().unwrap();
            inner.listeners.clone()
        };

        debug!(
            "Emitting {} invalidation event(s) to {} listener(s)",
            events.len(),
            listeners.len()
        );

        for event in events {
            for (id, listener) in &listeners {
                let outcome = catch_unwind(AssertUnwindSafe(|| listener(event)));
                if outcome.is_err() {
                    warn!(
                        "Invalidation listener {id} panicked on {} event (tenant {}), continuing delivery",
                        event.entity,
                        event.tenant_id.as_deref().unwrap_or("<none>")
                    );
                }
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        let inner = self.inner.read().unwrap();
        inner.listeners.len()
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InvalidationBus {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
