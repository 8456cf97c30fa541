use crate::{EntityKind, InvalidationBus, InvalidationEvent};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn given_subscribed_listener_when_emit_then_receives_event() {
    let bus = InvalidationBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_clone = Arc::clone(&seen);
    bus.subscribe(move |event| {
        seen_clone.lock().unwrap().push(event.clone());
    });

    bus.emit(&InvalidationEvent::manual("t1", EntityKind::Maintenances));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].entity, EntityKind::Maintenances);
    assert_eq!(seen[0].tenant_id, Some("t1".to_string()));
}

#[test]
fn given_batch_when_emit_many_then_delivered_in_emission_order() {
    let bus = InvalidationBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_clone = Arc::clone(&seen);
    bus.subscribe(move |event| {
        seen_clone.lock().unwrap().push(event.entity);
    });

    bus.emit_many(&[
        InvalidationEvent::manual("t1", EntityKind::Providers),
        InvalidationEvent::manual("t1", EntityKind::Vehicles),
        InvalidationEvent::manual("t1", EntityKind::Maintenances),
    ]);

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            EntityKind::Providers,
            EntityKind::Vehicles,
            EntityKind::Maintenances
        ]
    );
}

#[test]
fn given_panicking_listener_when_emit_then_delivery_continues() {
    let bus = InvalidationBus::new();
    let survivor_calls = Arc::new(AtomicUsize::new(0));

    bus.subscribe(|_| panic!("listener blew up"));

    let survivor = Arc::clone(&survivor_calls);
    bus.subscribe(move |_| {
        survivor.fetch_add(1, Ordering::SeqCst);
    });

    bus.emit(&InvalidationEvent::system(EntityKind::Categories));

    assert_eq!(survivor_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn given_unsubscribed_listener_when_emit_then_not_invoked() {
    let bus = InvalidationBus::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let calls_clone = Arc::clone(&calls);
    let id = bus.subscribe(move |_| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
    });

    bus.unsubscribe(id);
    bus.emit(&InvalidationEvent::manual("t1", EntityKind::Maintenances));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn given_no_listeners_when_emit_then_no_panic() {
    let bus = InvalidationBus::new();
    bus.emit(&InvalidationEvent::manual("t1", EntityKind::Maintenances));
    bus.emit_many(&[]);
}
