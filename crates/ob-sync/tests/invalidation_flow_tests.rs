mod common;

use common::{TestChangeFeed, counting_reload};

use ob_cache::{EvictOptions, KeyValueStore, MemoryStore, TenantCacheStore, tenant_key};
use ob_config::{ReloadConfig, SyncConfig};
use ob_core::{EntityKind, InvalidationBus, TenantSession};
use ob_sync::{ChangeOp, RawChange, RealtimeSubscriptionManager, ReloadScheduler};

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use tokio::time::{Duration, sleep};

const PAST_BOTH_WINDOWS: Duration = Duration::from_millis(800);

fn raw_change(table: &str, tenant: &str) -> RawChange {
    RawChange {
        table: table.to_string(),
        op: ChangeOp::Update,
        tenant_id: Some(tenant.to_string()),
    }
}

/// A remote mutation reaches a data-owning view as exactly one debounced
/// reload: change feed -> coalescing -> bus -> scheduler.
#[tokio::test(start_paused = true)]
async fn given_remote_burst_when_both_windows_elapse_then_owner_reloads_once() {
    let session = TenantSession::new(Some("t1"));
    let bus = InvalidationBus::new();
    let feed = TestChangeFeed::new();
    let manager = RealtimeSubscriptionManager::new(
        Arc::new(feed.clone()),
        bus.clone(),
        SyncConfig::default(),
    );
    let (reload, reloads) = counting_reload();
    let _scheduler = ReloadScheduler::new(
        session,
        bus,
        HashSet::from([EntityKind::Maintenances]),
        ReloadConfig::default(),
        reload,
    );

    manager.start("t1").await;
    for _ in 0..5 {
        feed.deliver(raw_change("maintenances", "t1"));
    }
    sleep(PAST_BOTH_WINDOWS).await;

    assert_eq!(reloads.load(Ordering::SeqCst), 1);
}

/// Tenant switch: epoch bumps, the previous tenant's cache is evicted by the
/// session listener, and the watching consumer reloads once.
#[tokio::test(start_paused = true)]
async fn given_tenant_switch_when_observed_then_cache_evicted_and_reload_fires() {
    // t1 active at epoch 1, as after an initial sign-in
    let session = TenantSession::new(None);
    session.set_tenant(Some("t1"));
    assert_eq!(session.epoch(), 1);

    let durable = Arc::new(MemoryStore::new("durable"));
    for tenant in ["t1", "t2"] {
        durable
            .set(&tenant_key(tenant, "maintenances:list"), "cached")
            .unwrap();
    }
    durable.set("global:z", "shared").unwrap();
    let cache = Arc::new(TenantCacheStore::new(vec![durable.clone() as _]));

    // Application-shell wiring: evict the outgoing tenant on every switch
    let previous_tenant = Arc::new(Mutex::new(session.tenant_id()));
    {
        let cache = Arc::clone(&cache);
        let previous_tenant = Arc::clone(&previous_tenant);
        session.on_tenant_change(move |tenant| {
            let mut previous = previous_tenant.lock().unwrap();
            if let Some(outgoing) = previous.take() {
                cache.evict_tenant(&outgoing, &EvictOptions::default());
            }
            *previous = tenant.map(str::to_string);
        });
    }

    let bus = InvalidationBus::new();
    let (reload, reloads) = counting_reload();
    let _scheduler = ReloadScheduler::new(
        session.clone(),
        bus,
        HashSet::new(),
        ReloadConfig::default(),
        reload,
    );

    session.set_tenant(Some("t2"));
    assert_eq!(session.epoch(), 2);
    sleep(PAST_BOTH_WINDOWS).await;

    // Exactly one debounced reload for the epoch change
    assert_eq!(reloads.load(Ordering::SeqCst), 1);

    // Only t1's namespace was evicted
    let remaining: HashSet<String> = durable.keys().unwrap().into_iter().collect();
    assert!(!remaining.contains(&tenant_key("t1", "maintenances:list")));
    assert!(remaining.contains(&tenant_key("t2", "maintenances:list")));
    assert!(remaining.contains("global:z"));
}

/// Restarting the subscription for the next tenant keeps the old tenant's
/// straggler changes from ever reaching consumers.
#[tokio::test(start_paused = true)]
async fn given_subscription_restarted_for_next_tenant_then_old_changes_ignored() {
    let session = TenantSession::new(Some("t1"));
    let bus = InvalidationBus::new();
    let feed = TestChangeFeed::new();
    let manager = RealtimeSubscriptionManager::new(
        Arc::new(feed.clone()),
        bus.clone(),
        SyncConfig::default(),
    );
    let (reload, reloads) = counting_reload();

    manager.start("t1").await;
    feed.deliver(raw_change("providers", "t1"));

    // Switch before the coalescing window elapses
    session.set_tenant(Some("t2"));
    manager.start("t2").await;

    let _scheduler = ReloadScheduler::new(
        session,
        bus,
        HashSet::new(),
        ReloadConfig::default(),
        reload,
    );

    // t1's pending invalidation was discarded with its subscription
    sleep(PAST_BOTH_WINDOWS).await;
    assert_eq!(reloads.load(Ordering::SeqCst), 0);

    // t2 changes flow normally
    feed.deliver(raw_change("providers", "t2"));
    sleep(PAST_BOTH_WINDOWS).await;
    assert_eq!(reloads.load(Ordering::SeqCst), 1);
}
