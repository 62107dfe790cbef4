//! End-to-end lifecycle dispatch through a real `EventSource`.
//!
//! These tests drive the engine the way a producer would: emit init,
//! before/after pairs, and destroy on a source, and assert what registered
//! observers see.

use std::sync::Arc;

use parking_lot::Mutex;
use weft_engine::{Engine, HookSet};
use weft_source::{EventSource, ProviderKind, ResourceHandle, ResourceId};

/// A compact record of one delivered event.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Delivered {
    Init {
        id: u64,
        kind: ProviderKind,
        parent: Option<u64>,
    },
    Before(u64),
    After(u64),
    Destroy(u64),
}

type Log = Arc<Mutex<Vec<Delivered>>>;

/// Builds an enabled engine plus a recording observer set.
fn recording_engine() -> (Arc<EventSource>, Arc<Engine>, Log) {
    let source = Arc::new(EventSource::new());
    let engine = Engine::builder(Arc::clone(&source)).finish().unwrap();

    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let (init_log, before_log, after_log, destroy_log) =
        (log.clone(), log.clone(), log.clone(), log.clone());
    engine.add_hooks(
        &HookSet::new()
            .on_init(move |event| {
                init_log.lock().push(Delivered::Init {
                    id: event.id.get(),
                    kind: event.kind,
                    parent: event.parent_id.map(ResourceId::get),
                });
            })
            .on_before(move |event| before_log.lock().push(Delivered::Before(event.id.get())))
            .on_after(move |event| after_log.lock().push(Delivered::After(event.id.get())))
            .on_destroy(move |id| destroy_log.lock().push(Delivered::Destroy(id.get()))),
    );
    engine.enable();

    (source, engine, log)
}

#[test]
fn full_lifecycle_keeps_the_id_stable() {
    let (source, _engine, log) = recording_engine();

    let handle = ResourceHandle::new(ProviderKind::Timer);
    source.emit_init(&handle, None);
    source.emit_before(&handle);
    source.emit_after(&handle);
    source.emit_before(&handle);
    source.emit_after(&handle);
    source.emit_destroy(handle.id().unwrap());

    assert_eq!(
        *log.lock(),
        vec![
            Delivered::Init {
                id: 1,
                kind: ProviderKind::Timer,
                parent: None
            },
            Delivered::Before(1),
            Delivered::After(1),
            Delivered::Before(1),
            Delivered::After(1),
            Delivered::Destroy(1),
        ]
    );
}

#[test]
fn parent_linkage_is_delivered_by_id() {
    let (source, _engine, log) = recording_engine();

    let a = ResourceHandle::new(ProviderKind::Handle);
    source.emit_init(&a, None);

    let b = ResourceHandle::new(ProviderKind::Handle);
    source.emit_init(&b, Some(&a));

    assert_eq!(
        *log.lock(),
        vec![
            Delivered::Init {
                id: 1,
                kind: ProviderKind::Handle,
                parent: None
            },
            Delivered::Init {
                id: 2,
                kind: ProviderKind::Handle,
                parent: Some(1)
            },
        ]
    );
}

#[test]
fn internal_resources_never_reach_observers() {
    let (source, engine, log) = recording_engine();

    let driver = ResourceHandle::new(ProviderKind::TimerDriver);
    source.emit_init(&driver, None);
    source.emit_before(&driver);
    source.emit_after(&driver);

    let id = driver.id().unwrap();
    assert!(engine.is_ignored(id));

    source.emit_destroy(id);
    assert!(
        !engine.is_ignored(id),
        "suppression is cleared by the first destroy"
    );
    assert!(log.lock().is_empty(), "zero observer invocations total");
}

#[test]
fn duplicate_registration_fires_twice_and_removes_once() {
    let source = Arc::new(EventSource::new());
    let engine = Engine::builder(Arc::clone(&source)).finish().unwrap();
    engine.enable();

    let calls = Arc::new(Mutex::new(0usize));
    let calls_hook = Arc::clone(&calls);
    let hooks = HookSet::new().on_init(move |_| *calls_hook.lock() += 1);

    engine.add_hooks(&hooks);
    engine.add_hooks(&hooks);

    source.emit_init(&ResourceHandle::new(ProviderKind::Handle), None);
    assert_eq!(*calls.lock(), 2, "registered twice, fires twice");

    engine.remove_hooks(&hooks);
    source.emit_init(&ResourceHandle::new(ProviderKind::Handle), None);
    assert_eq!(*calls.lock(), 3, "one registration survives the removal");
}

#[test]
fn hooks_added_during_dispatch_miss_the_current_event() {
    let source = Arc::new(EventSource::new());
    let engine = Engine::builder(Arc::clone(&source)).finish().unwrap();
    engine.enable();

    let late_calls = Arc::new(Mutex::new(0usize));
    let engine_inner = Arc::clone(&engine);
    let late_calls_inner = Arc::clone(&late_calls);
    engine.add_hooks(&HookSet::new().on_init(move |_| {
        let late_calls_hook = Arc::clone(&late_calls_inner);
        engine_inner.add_hooks(&HookSet::new().on_init(move |_| {
            *late_calls_hook.lock() += 1;
        }));
    }));

    source.emit_init(&ResourceHandle::new(ProviderKind::Handle), None);
    assert_eq!(
        *late_calls.lock(),
        0,
        "a hook added mid-dispatch is not invoked for that event"
    );

    source.emit_init(&ResourceHandle::new(ProviderKind::Handle), None);
    assert_eq!(*late_calls.lock(), 1, "it is invoked for the next event");
}

#[test]
fn removal_during_dispatch_does_not_skip_neighbors() {
    let source = Arc::new(EventSource::new());
    let engine = Engine::builder(Arc::clone(&source)).finish().unwrap();
    engine.enable();

    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let order_b = Arc::clone(&order);
    let b = HookSet::new().on_init(move |_| order_b.lock().push("b"));

    // `a` removes `b` while the fan-out for the current event is running.
    let engine_inner = Arc::clone(&engine);
    let b_clone = b.clone();
    let order_a = Arc::clone(&order);
    let a = HookSet::new().on_init(move |_| {
        order_a.lock().push("a");
        engine_inner.remove_hooks(&b_clone);
    });

    let order_c = Arc::clone(&order);
    let c = HookSet::new().on_init(move |_| order_c.lock().push("c"));

    engine.add_hooks(&a);
    engine.add_hooks(&b);
    engine.add_hooks(&c);

    source.emit_init(&ResourceHandle::new(ProviderKind::Handle), None);
    assert_eq!(
        *order.lock(),
        vec!["a", "b", "c"],
        "the in-progress fan-out runs its snapshot unchanged"
    );

    order.lock().clear();
    source.emit_init(&ResourceHandle::new(ProviderKind::Handle), None);
    assert_eq!(*order.lock(), vec!["a", "c"], "b is gone for later events");
}

#[test]
fn reentrant_emission_from_an_observer_is_dispatched_inline() {
    let (source, engine, log) = recording_engine();

    // This observer registers after the recorder, so the recorder sees the
    // nested child before the root's fan-out finishes.
    let source_hook = Arc::clone(&source);
    engine.add_hooks(&HookSet::new().on_init(move |event| {
        // Only the root spawns a child, or this would recurse.
        if event.parent_id.is_none() {
            let child = ResourceHandle::new(ProviderKind::DeferredTask);
            source_hook.emit_init(&child, Some(event.handle));
        }
    }));

    let root = ResourceHandle::new(ProviderKind::Handle);
    source.emit_init(&root, None);

    assert_eq!(
        *log.lock(),
        vec![
            Delivered::Init {
                id: 1,
                kind: ProviderKind::Handle,
                parent: None
            },
            Delivered::Init {
                id: 2,
                kind: ProviderKind::DeferredTask,
                parent: Some(1)
            },
        ]
    );
}

#[test]
fn disable_silences_the_source_entirely() {
    let (source, engine, log) = recording_engine();

    engine.disable();

    let handle = ResourceHandle::new(ProviderKind::Handle);
    source.emit_init(&handle, None);
    source.emit_before(&handle);
    source.emit_after(&handle);

    assert!(log.lock().is_empty());
    assert!(handle.id().is_none(), "no id is assigned while disabled");

    engine.enable();
    source.emit_init(&handle, None);
    assert_eq!(log.lock().len(), 1, "dispatch resumes after enable");
}
