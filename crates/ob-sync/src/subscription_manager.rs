use crate::change_feed::{ChangeCallback, ChangeFilter, ChannelStatus, RawChange, StatusCallback};
use crate::{ChangeChannel, ChangeFeed, Metrics, table_map};

use ob_config::SyncConfig;
use ob_core::{EntityKind, InvalidationBus, InvalidationEvent};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Owner of the process's single realtime subscription.
///
/// At most one channel is open at a time; `start` tears down any previous
/// subscription before opening the next one. Raw table-level changes are
/// mapped to coarse entity kinds and coalesced per `(tenant, entity)` within
/// a fixed window, then published to the invalidation bus as one batch.
pub struct RealtimeSubscriptionManager {
    feed: Arc<dyn ChangeFeed>,
    bus: InvalidationBus,
    config: SyncConfig,
    metrics: Metrics,
    state: Arc<Mutex<ManagerState>>,
}

#[derive(Default)]
struct ManagerState {
    /// Bumped on every start/stop; change callbacks and flush timers from an
    /// older generation are ignored.
    generation: u64,
    active: Option<ActiveSubscription>,
}

struct ActiveSubscription {
    tenant_id: String,
    channel: Box<dyn ChangeChannel>,
    /// Latest event per `(tenant, entity)` observed in the current window
    pending: HashMap<(String, EntityKind), InvalidationEvent>,
    flush_task: Option<JoinHandle<()>>,
}

impl RealtimeSubscriptionManager {
    pub fn new(feed: Arc<dyn ChangeFeed>, bus: InvalidationBus, config: SyncConfig) -> Self {
        Self {
            feed,
            bus,
            config,
            metrics: Metrics::new(),
            state: Arc::new(Mutex::new(ManagerState::default())),
        }
    }

    /// Open the realtime subscription for one tenant.
    ///
    /// Any previously active subscription is fully torn down first: channel
    /// closed, pending coalesced events discarded, flush timer cancelled.
    /// When the channel cannot be opened or subscribed the failure is logged
    /// and the manager stays inactive; the application continues without
    /// realtime invalidation.
    pub async fn start(&self, tenant_id: &str) {
        let generation = {
            let mut state = self.state.lock().unwrap();
            Self::teardown_locked(&mut state, &self.metrics, "restart");
            state.generation += 1;
            state.generation
        };

        let channel_name = format!("{}-{}", self.config.channel_prefix, tenant_id);
        let mut channel = match self.feed.open_channel(&channel_name).await {
            Ok(channel) => channel,
            Err(e) => {
                warn!(
                    "Realtime channel {channel_name} unavailable, continuing without realtime invalidation: {e}"
                );
                return;
            }
        };

        let span = crate::create_sync_span(tenant_id, "subscribe");
        let _guard = span.enter();

        let runtime = Handle::current();
        for (table, _) in table_map::tracked_tables() {
            let filter = ChangeFilter {
                table: table.to_string(),
                tenant_column: table_map::TENANT_COLUMN.to_string(),
                tenant_id: tenant_id.to_string(),
            };
            channel.on_change(filter, self.change_callback(generation, runtime.clone()));
        }

        let status_callback: StatusCallback = Arc::new({
            let channel_name = channel_name.clone();
            move |status: ChannelStatus| match status {
                ChannelStatus::Subscribed => info!("Realtime channel {channel_name} subscribed"),
                ChannelStatus::TimedOut => warn!("Realtime channel {channel_name} timed out"),
                ChannelStatus::Errored => warn!("Realtime channel {channel_name} reported an error"),
                ChannelStatus::Closed => debug!("Realtime channel {channel_name} closed"),
            }
        });
        if let Err(e) = channel.subscribe(status_callback) {
            warn!(
                "Realtime channel {channel_name} failed to subscribe, continuing without realtime invalidation: {e}"
            );
            channel.close();
            return;
        }

        let mut state = self.state.lock().unwrap();
        if state.generation != generation {
            // A newer start or a stop won the race while we were connecting
            debug!("Discarding superseded subscription for tenant {tenant_id}");
            channel.close();
            return;
        }
        state.active = Some(ActiveSubscription {
            tenant_id: tenant_id.to_string(),
            channel,
            pending: HashMap::new(),
            flush_task: None,
        });
        self.metrics.subscription_started();
        info!("Realtime subscription started for tenant {tenant_id}");
    }

    /// Tear down the active subscription, discarding pending coalesced
    /// events. Safe to call repeatedly; extra calls are no-ops.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        Self::teardown_locked(&mut state, &self.metrics, "stop");
    }

    pub fn is_active(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.active.is_some()
    }

    pub fn active_tenant(&self) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.active.as_ref().map(|active| active.tenant_id.clone())
    }

    fn teardown_locked(state: &mut ManagerState, metrics: &Metrics, cause: &str) {
        if let Some(mut active) = state.active.take() {
            if let Some(task) = active.flush_task.take() {
                task.abort();
            }
            if !active.pending.is_empty() {
                // Stale invalidations for a tenant no longer in view are not
                // worth emitting
                debug!(
                    "Discarding {} pending invalidation(s) for tenant {}",
                    active.pending.len(),
                    active.tenant_id
                );
            }
            active.channel.close();
            metrics.subscription_stopped();
            info!(
                "Realtime subscription for tenant {} stopped ({cause})",
                active.tenant_id
            );
        }
    }

    fn change_callback(&self, generation: u64, runtime: Handle) -> ChangeCallback {
        let state = Arc::clone(&self.state);
        let bus = self.bus.clone();
        let metrics = self.metrics.clone();
        let window = Duration::from_millis(self.config.coalesce_window_ms);

        Arc::new(move |change: RawChange| {
            let Some(entity) = table_map::entity_for_table(&change.table) else {
                debug!("Ignoring change from untracked source {}", change.table);
                metrics.change_dropped(&change.table);
                return;
            };

            let mut locked = state.lock().unwrap();
            if locked.generation != generation {
                return;
            }
            let Some(active) = locked.active.as_mut() else {
                return;
            };

            // The server-side filter already restricts rows to this tenant;
            // drop anything that slips through anyway.
            if let Some(row_tenant) = &change.tenant_id
                && row_tenant != &active.tenant_id
            {
                debug!(
                    "Dropping cross-tenant change from {} (row tenant {row_tenant})",
                    change.table
                );
                return;
            }

            let event =
                InvalidationEvent::realtime(active.tenant_id.clone(), entity, change.table.clone());
            let was_empty = active.pending.is_empty();
            active
                .pending
                .insert((active.tenant_id.clone(), entity), event);
            metrics.change_mapped(entity.as_str());

            if was_empty {
                // Arm the flush timer only on the write that makes the map
                // non-empty; the window restarts with each newly-non-empty
                // map rather than ticking at a fixed rate.
                let flush = Self::flush_after(
                    Arc::clone(&state),
                    bus.clone(),
                    metrics.clone(),
                    generation,
                    window,
                );
                active.flush_task = Some(runtime.spawn(flush));
            }
        })
    }

    async fn flush_after(
        state: Arc<Mutex<ManagerState>>,
        bus: InvalidationBus,
        metrics: Metrics,
        generation: u64,
        window: Duration,
    ) {
        tokio::time::sleep(window).await;

        let batch: Vec<InvalidationEvent> = {
            let mut locked = state.lock().unwrap();
            if locked.generation != generation {
                return;
            }
            let Some(active) = locked.active.as_mut() else {
                return;
            };
            active.flush_task = None;
            active.pending.drain().map(|(_, event)| event).collect()
        };

        if batch.is_empty() {
            return;
        }

        debug!("Flushing {} coalesced invalidation event(s)", batch.len());
        metrics.batch_flushed(batch.len());
        // Emit outside the lock; listeners may call back into the manager
        bus.emit_many(&batch);
    }
}
