use ob_sync::{
    ChangeCallback, ChangeChannel, ChangeFeed, ChangeFilter, ChannelStatus, RawChange, ReloadFn,
    Result, StatusCallback,
};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

/// In-memory change feed driving raw notifications through registered
/// filters, the way the real transport would
#[derive(Clone, Default)]
pub struct TestChangeFeed {
    listeners: Arc<Mutex<Vec<(ChangeFilter, ChangeCallback)>>>,
}

impl TestChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&self, change: RawChange) {
        let listeners = self.listeners.lock().unwrap().clone();
        for (filter, callback) in listeners {
            if filter.table != change.table {
                continue;
            }
            if change.tenant_id.as_deref() != Some(filter.tenant_id.as_str()) {
                continue;
            }
            callback(change.clone());
        }
    }
}

#[async_trait]
impl ChangeFeed for TestChangeFeed {
    async fn open_channel(&self, _name: &str) -> Result<Box<dyn ChangeChannel>> {
        Ok(Box::new(TestChannel {
            listeners: Arc::clone(&self.listeners),
        }))
    }
}

struct TestChannel {
    listeners: Arc<Mutex<Vec<(ChangeFilter, ChangeCallback)>>>,
}

impl ChangeChannel for TestChannel {
    fn on_change(&mut self, filter: ChangeFilter, callback: ChangeCallback) {
        self.listeners.lock().unwrap().push((filter, callback));
    }

    fn subscribe(&mut self, status: StatusCallback) -> Result<()> {
        status(ChannelStatus::Subscribed);
        Ok(())
    }

    fn close(&mut self) {
        self.listeners.lock().unwrap().clear();
    }
}

/// Reload callback counting its invocations
pub fn counting_reload() -> (ReloadFn, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);
    let reload: ReloadFn = Arc::new(move || {
        let count = Arc::clone(&count_clone);
        Box::pin(async move {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    });
    (reload, count)
}
