//! Lifecycle dispatcher: ignore set, parent resolution, fan-out.
//!
//! The [`LifecycleDispatcher`] is the sink an [`Engine`](crate::Engine) wires
//! into its event source. For each entry point it resolves ignore status,
//! resolves parent linkage (init only), and invokes every registered observer
//! in registration order, synchronously, in the calling thread.
//!
//! # Ignore set
//!
//! Resources whose provider kind is internal plumbing never reach observers:
//! their id enters the ignore set at init, every before/after for that id is
//! dropped, and the first destroy removes the entry without notifying anyone.
//! If destroy never arrives the entry persists for the dispatcher's lifetime.
//!
//! # Observer failures
//!
//! Panics raised by an observer are not caught. They unwind through the
//! event-source call, aborting delivery to the observers not yet invoked for
//! that event. Observers must not panic.

use hashbrown::HashSet;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

use weft_source::{LifecycleSink, ProviderKind, ResourceHandle, ResourceId};

use crate::hooks::{CallbackEvent, HookRegistry, InitEvent};

/// The sink that routes source events through the hook registry.
pub struct LifecycleDispatcher {
    registry: Arc<HookRegistry>,
    /// Ids of internal resources currently suppressed. Keyed by id rather
    /// than by handle because destroy only carries the id.
    ignored: Mutex<HashSet<ResourceId>>,
}

impl LifecycleDispatcher {
    /// Creates a dispatcher that fans out to the given registry.
    #[must_use]
    pub fn new(registry: Arc<HookRegistry>) -> Self {
        Self {
            registry,
            ignored: Mutex::new(HashSet::new()),
        }
    }

    /// Whether events for the given id are currently suppressed.
    #[must_use]
    pub fn is_ignored(&self, id: ResourceId) -> bool {
        self.ignored.lock().contains(&id)
    }
}

impl LifecycleSink for LifecycleDispatcher {
    fn init(
        &self,
        kind: ProviderKind,
        id: ResourceId,
        handle: &ResourceHandle,
        parent: Option<&ResourceHandle>,
    ) {
        handle.bind(id);

        if kind.is_internal() {
            self.ignored.lock().insert(id);
            trace!(target: "weft::dispatch", %id, %kind, "suppressing internal resource");
            return;
        }

        let parent_id = parent.and_then(ResourceHandle::id);
        let event = InitEvent {
            id,
            handle,
            kind,
            parent_id,
            parent,
        };
        for hook in &self.registry.init_snapshot() {
            hook(&event);
        }
    }

    fn before(&self, handle: &ResourceHandle) {
        // An unbound handle means init was never dispatched for it; trust the
        // source and drop the event.
        let Some(id) = handle.id() else {
            return;
        };
        if self.is_ignored(id) {
            return;
        }
        let event = CallbackEvent { id, handle };
        for hook in &self.registry.before_snapshot() {
            hook(&event);
        }
    }

    fn after(&self, handle: &ResourceHandle) {
        let Some(id) = handle.id() else {
            return;
        };
        if self.is_ignored(id) {
            return;
        }
        let event = CallbackEvent { id, handle };
        for hook in &self.registry.after_snapshot() {
            hook(&event);
        }
    }

    fn destroy(&self, id: ResourceId) {
        if self.ignored.lock().remove(&id) {
            trace!(target: "weft::dispatch", %id, "internal resource destroyed, suppression cleared");
            return;
        }
        for hook in &self.registry.destroy_snapshot() {
            hook(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookSet;
    use parking_lot::Mutex;

    fn dispatcher() -> (Arc<HookRegistry>, LifecycleDispatcher) {
        let registry = Arc::new(HookRegistry::new());
        let dispatcher = LifecycleDispatcher::new(Arc::clone(&registry));
        (registry, dispatcher)
    }

    fn id(raw: u64) -> ResourceId {
        ResourceId::new(raw).unwrap()
    }

    #[test]
    fn init_binds_the_id_and_resolves_the_parent() {
        let (registry, dispatcher) = dispatcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_hook = Arc::clone(&seen);
        registry.add(&HookSet::new().on_init(move |event| {
            seen_hook
                .lock()
                .push((event.id, event.kind, event.parent_id));
        }));

        let parent = ResourceHandle::new(ProviderKind::Handle);
        dispatcher.init(ProviderKind::Handle, id(1), &parent, None);

        let child = ResourceHandle::new(ProviderKind::Timer);
        dispatcher.init(ProviderKind::Timer, id(2), &child, Some(&parent));

        assert_eq!(parent.id(), Some(id(1)));
        assert_eq!(child.id(), Some(id(2)));
        assert_eq!(
            *seen.lock(),
            vec![
                (id(1), ProviderKind::Handle, None),
                (id(2), ProviderKind::Timer, Some(id(1))),
            ]
        );
    }

    #[test]
    fn parent_without_a_bound_id_resolves_to_none() {
        let (registry, dispatcher) = dispatcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_hook = Arc::clone(&seen);
        registry.add(&HookSet::new().on_init(move |event| {
            seen_hook.lock().push(event.parent_id);
        }));

        let parent = ResourceHandle::new(ProviderKind::Handle);
        let child = ResourceHandle::new(ProviderKind::Handle);
        dispatcher.init(ProviderKind::Handle, id(5), &child, Some(&parent));

        assert_eq!(*seen.lock(), vec![None]);
    }

    #[test]
    fn internal_resources_are_suppressed_until_destroy() {
        let (registry, dispatcher) = dispatcher();
        let calls = Arc::new(Mutex::new(0usize));
        let count = |calls: &Arc<Mutex<usize>>| {
            let calls = Arc::clone(calls);
            move || *calls.lock() += 1
        };
        let on_init = count(&calls);
        let on_before = count(&calls);
        let on_after = count(&calls);
        let on_destroy = count(&calls);
        registry.add(
            &HookSet::new()
                .on_init(move |_| on_init())
                .on_before(move |_| on_before())
                .on_after(move |_| on_after())
                .on_destroy(move |_| on_destroy()),
        );

        let driver = ResourceHandle::new(ProviderKind::TimerDriver);
        dispatcher.init(ProviderKind::TimerDriver, id(3), &driver, None);
        dispatcher.before(&driver);
        dispatcher.after(&driver);
        assert!(dispatcher.is_ignored(id(3)));

        dispatcher.destroy(id(3));
        assert!(!dispatcher.is_ignored(id(3)));
        assert_eq!(*calls.lock(), 0, "no observer fires for internal resources");

        // The suppression is cleared exactly once; a later destroy for the
        // same id (out-of-order per the trust boundary) reaches observers.
        dispatcher.destroy(id(3));
        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn events_for_unbound_handles_are_dropped() {
        let (registry, dispatcher) = dispatcher();
        let calls = Arc::new(Mutex::new(0usize));
        let calls_hook = Arc::clone(&calls);
        registry.add(&HookSet::new().on_before(move |_| *calls_hook.lock() += 1));

        let handle = ResourceHandle::new(ProviderKind::Handle);
        dispatcher.before(&handle);

        assert_eq!(*calls.lock(), 0);
    }

    #[test]
    fn destroy_delivers_only_the_id() {
        let (registry, dispatcher) = dispatcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_hook = Arc::clone(&seen);
        registry.add(&HookSet::new().on_destroy(move |id| seen_hook.lock().push(id)));

        dispatcher.destroy(id(9));
        assert_eq!(*seen.lock(), vec![id(9)]);
    }
}
