use crate::{ListenerId, TenantSwitchSignal};

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, RwLock};

use log::{info, warn};

/// Callback invoked with the new tenant id after a distinct tenant transition
pub type TenantListener = dyn Fn(Option<&str>) + Send + Sync;

/// Epoch-versioned holder of the currently selected tenant.
///
/// The epoch strictly increases on every distinct transition, so consumers
/// can detect a missed switch by comparing epochs instead of full state.
/// Re-selecting the current tenant is a pure no-op; cached profile restores
/// that echo the same tenant on every page load never bump the epoch.
pub struct TenantSession {
    inner: Arc<RwLock<SessionInner>>,
    signal: Option<Arc<dyn TenantSwitchSignal>>,
}

struct SessionInner {
    tenant_id: Option<String>,
    epoch: u64,
    listeners: Vec<(ListenerId, Arc<TenantListener>)>,
}

impl TenantSession {
    /// Create the session, optionally bootstrapped with a tenant restored
    /// from a prior run. The bootstrap does not count as a transition.
    pub fn new(bootstrap: Option<&str>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                tenant_id: bootstrap.map(str::to_string),
                epoch: 0,
                listeners: Vec::new(),
            })),
            signal: None,
        }
    }

    /// Same as `new`, with a cross-process signal fired after each distinct
    /// transition.
    pub fn with_signal(bootstrap: Option<&str>, signal: Arc<dyn TenantSwitchSignal>) -> Self {
        let mut session = Self::new(bootstrap);
        session.signal = Some(signal);
        session
    }

    pub fn tenant_id(&self) -> Option<String> {
        let inner = self.inner.read().unwrap();
        inner.tenant_id.clone()
    }

    pub fn epoch(&self) -> u64 {
        let inner = self.inner.read().unwrap();
        inner.epoch
    }

    /// Select the active tenant.
    ///
    /// Setting the value already selected does nothing. Otherwise the epoch
    /// is bumped and every listener is invoked synchronously, in registration
    /// order, with the new value. A panicking listener is caught and logged;
    /// delivery continues with the remaining listeners.
    pub fn set_tenant(&self, next: Option<&str>) {
        let (new_value, epoch, listeners) = {
            let mut inner = self.inner.write().unwrap();
            if inner.tenant_id.as_deref() == next {
                return;
            }
            inner.tenant_id = next.map(str::to_string);
            inner.epoch += 1;
            // Snapshot before dispatch so listeners may subscribe or
            // unsubscribe while being notified.
            (
                inner.tenant_id.clone(),
                inner.epoch,
                inner.listeners.clone(),
            )
        };

        info!(
            "Active tenant set to {} (epoch {})",
            new_value.as_deref().unwrap_or("<none>"),
            epoch
        );

        for (id, listener) in listeners {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener(new_value.as_deref())));
            if outcome.is_err() {
                warn!("Tenant change listener {id} panicked, continuing dispatch");
            }
        }

        if let Some(signal) = &self.signal {
            signal.broadcast(new_value.as_deref());
        }
    }

    /// Equivalent to `set_tenant(None)`
    pub fn reset(&self) {
        self.set_tenant(None);
    }

    /// Register a listener for distinct tenant transitions
    pub fn on_tenant_change(
        &self,
        listener: impl Fn(Option<&str>) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId::new();
        let mut inner = self.inner.write().unwrap();
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a previously registered listener. Unknown ids are ignored.
    pub fn remove_listener(&self, id: ListenerId) {
        let mut inner = self.inner.write().unwrap();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    pub fn listener_count(&self) -> usize {
        let inner = self.inner.read().unwrap();
        inner.listeners.len()
    }
}

impl Clone for TenantSession {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            signal: self.signal.clone(),
        }
    }
}
