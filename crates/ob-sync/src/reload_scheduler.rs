use crate::Metrics;

use ob_config::ReloadConfig;
use ob_core::{EntityKind, InvalidationBus, InvalidationEvent, ListenerId, TenantSession};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Async reload callback supplied by the owning view
pub type ReloadFn = Arc<
    dyn Fn() -> BoxFuture<'static, std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>>
        + Send
        + Sync,
>;

enum ReloadTrigger {
    Epoch { epoch: u64, tenant_selected: bool },
    Invalidation(EntityKind),
}

/// Debounced reload hook for one data-owning consumer.
///
/// Schedules the owner's reload when the session epoch changes or when a
/// qualifying invalidation event arrives on the bus. Qualifying triggers
/// within the debounce window collapse into a single reload, fired after the
/// window elapses with no further trigger (trailing edge).
pub struct ReloadScheduler {
    session: TenantSession,
    bus: InvalidationBus,
    session_listener: Option<ListenerId>,
    bus_listener: Option<ListenerId>,
    trigger_tx: Option<mpsc::UnboundedSender<ReloadTrigger>>,
    worker: Option<JoinHandle<()>>,
}

impl ReloadScheduler {
    /// Wire a consumer up to the session and the bus.
    ///
    /// `interest` is the set of entity kinds the owner cares about; an empty
    /// set means "interested in everything". Must be called from within a
    /// tokio runtime.
    pub fn new(
        session: TenantSession,
        bus: InvalidationBus,
        interest: HashSet<EntityKind>,
        config: ReloadConfig,
        reload: ReloadFn,
    ) -> Self {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();

        // A consumer attaching with a tenant already in view starts from that
        // epoch as its baseline; only later epochs schedule a reload.
        let baseline = session.tenant_id().is_some().then(|| session.epoch());

        let session_listener = {
            let tx = trigger_tx.clone();
            let session_for_listener = session.clone();
            session.on_tenant_change(move |tenant| {
                let _ = tx.send(ReloadTrigger::Epoch {
                    epoch: session_for_listener.epoch(),
                    tenant_selected: tenant.is_some(),
                });
            })
        };

        let bus_listener = {
            let tx = trigger_tx.clone();
            let session_for_listener = session.clone();
            bus.subscribe(move |event| {
                if !Self::event_qualifies(&session_for_listener, &interest, event) {
                    return;
                }
                let _ = tx.send(ReloadTrigger::Invalidation(event.entity));
            })
        };

        let window = Duration::from_millis(config.debounce_window_ms);
        let worker = tokio::spawn(Self::run(
            trigger_rx,
            baseline,
            window,
            reload,
            Metrics::new(),
        ));

        Self {
            session,
            bus,
            session_listener: Some(session_listener),
            bus_listener: Some(bus_listener),
            trigger_tx: Some(trigger_tx),
            worker: Some(worker),
        }
    }

    /// Detach from the session and the bus and cancel any pending debounce.
    /// Idempotent; also invoked on drop. No reload fires afterwards.
    pub fn shutdown(&mut self) {
        if let Some(id) = self.bus_listener.take() {
            self.bus.unsubscribe(id);
        }
        if let Some(id) = self.session_listener.take() {
            self.session.remove_listener(id);
        }
        // Closing the trigger stream lets the worker exit; aborting covers a
        // debounce already in progress.
        self.trigger_tx.take();
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }

    fn event_qualifies(
        session: &TenantSession,
        interest: &HashSet<EntityKind>,
        event: &InvalidationEvent,
    ) -> bool {
        let Some(active_tenant) = session.tenant_id() else {
            // No tenant in view, nothing to reload
            return false;
        };
        if !event.applies_to_tenant(&active_tenant) {
            return false;
        }
        interest.is_empty() || interest.contains(&event.entity)
    }

    async fn run(
        mut triggers: mpsc::UnboundedReceiver<ReloadTrigger>,
        baseline: Option<u64>,
        window: Duration,
        reload: ReloadFn,
        metrics: Metrics,
    ) {
        let mut last_epoch = baseline;
        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                trigger = triggers.recv() => {
                    match trigger {
                        // Scheduler disposed; a pending debounce is discarded
                        None => break,
                        Some(trigger) => {
                            if Self::should_schedule(&mut last_epoch, trigger) {
                                deadline = Some(Instant::now() + window);
                            }
                        }
                    }
                }
                _ = async move { tokio::time::sleep_until(deadline.unwrap()).await }, if deadline.is_some() => {
                    deadline = None;
                    metrics.reload_fired();
                    if let Err(e) = (reload)().await {
                        warn!("Reload failed: {e}");
                    }
                }
            }
        }
    }

    fn should_schedule(last_epoch: &mut Option<u64>, trigger: ReloadTrigger) -> bool {
        match trigger {
            ReloadTrigger::Invalidation(entity) => {
                debug!("Scheduling reload for {entity} invalidation");
                true
            }
            ReloadTrigger::Epoch {
                epoch,
                tenant_selected,
            } => {
                if !tenant_selected {
                    // Tenant cleared; track the epoch, nothing to load
                    *last_epoch = Some(epoch);
                    return false;
                }
                match last_epoch {
                    // First observation of a non-null tenant establishes the
                    // baseline without a reload
                    None => {
                        *last_epoch = Some(epoch);
                        false
                    }
                    Some(last) if *last == epoch => false,
                    Some(_) => {
                        *last_epoch = Some(epoch);
                        debug!("Scheduling reload for epoch {epoch}");
                        true
                    }
                }
            }
        }
    }
}

impl Drop for ReloadScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
