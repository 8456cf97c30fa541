use metrics::{counter, gauge};

/// Metrics collector for sync operations
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "ob_sync" }
    }

    /// Record a realtime subscription being established
    pub fn subscription_started(&self) {
        counter!(format!("{}.subscriptions.started", self.prefix)).increment(1);
        gauge!(format!("{}.subscriptions.active", self.prefix)).set(1.0);
    }

    /// Record the active subscription being torn down
    pub fn subscription_stopped(&self) {
        counter!(format!("{}.subscriptions.stopped", self.prefix)).increment(1);
        gauge!(format!("{}.subscriptions.active", self.prefix)).set(0.0);
    }

    /// Record a raw change mapped to an entity kind
    pub fn change_mapped(&self, entity: &str) {
        counter!(format!("{}.changes.mapped", self.prefix)).increment(1);
        counter!(format!("{}.changes.mapped.{}", self.prefix, entity)).increment(1);
    }

    /// Record a raw change dropped as untracked
    pub fn change_dropped(&self, table: &str) {
        counter!(format!("{}.changes.dropped", self.prefix)).increment(1);
        counter!(format!("{}.changes.dropped.{}", self.prefix, table)).increment(1);
    }

    /// Record a coalesced batch flushed to the bus
    pub fn batch_flushed(&self, event_count: usize) {
        counter!(format!("{}.batches.flushed", self.prefix)).increment(1);
        counter!(format!("{}.events.emitted", self.prefix)).increment(event_count as u64);
    }

    /// Record a debounced reload firing
    pub fn reload_fired(&self) {
        counter!(format!("{}.reloads.fired", self.prefix)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
