//! Hook sets, the hook registry, and observer event payloads.
//!
//! Observers are plain callbacks bundled into a [`HookSet`]: a record with
//! four optional slots, one per lifecycle event kind. Registering a set
//! appends each present callback to that kind's ordered list; removing it
//! deletes the first occurrence matching callback identity.
//!
//! # Identity
//!
//! Callbacks are stored as `Arc`s and removal compares `Arc` identity, so a
//! caller that wants to remove hooks later must keep (a clone of) the same
//! [`HookSet`] it registered. Registering the same set twice is allowed and
//! makes each callback fire twice per event; removing it once leaves the
//! second registration active.
//!
//! # Example
//!
//! ```
//! use weft_engine::{HookRegistry, HookSet};
//!
//! let registry = HookRegistry::new();
//! let hooks = HookSet::new()
//!     .on_init(|event| println!("+{} ({})", event.id, event.kind))
//!     .on_destroy(|id| println!("-{id}"));
//!
//! registry.add(&hooks);
//! registry.remove(&hooks);
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use weft_source::{ProviderKind, ResourceHandle, ResourceId};

// ─────────────────────────────────────────────────────────────────────────────
// Event payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Payload delivered to init observers.
#[derive(Debug, Clone, Copy)]
pub struct InitEvent<'a> {
    /// Id assigned to the new resource.
    pub id: ResourceId,
    /// The resource's handle, owned by its producer.
    pub handle: &'a ResourceHandle,
    /// Category of the async primitive backing the resource.
    pub kind: ProviderKind,
    /// Id of the resource that caused this creation, if a parent handle was
    /// supplied and had an id bound.
    pub parent_id: Option<ResourceId>,
    /// The parent's handle, if one was supplied.
    pub parent: Option<&'a ResourceHandle>,
}

/// Payload delivered to before and after observers, bracketing one callback
/// execution of the resource.
#[derive(Debug, Clone, Copy)]
pub struct CallbackEvent<'a> {
    /// Id of the resource whose callback is running.
    pub id: ResourceId,
    /// The resource's handle.
    pub handle: &'a ResourceHandle,
}

/// The four lifecycle event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Resource creation.
    Init,
    /// Pre-execution, immediately before the resource's callback runs.
    Before,
    /// Post-execution, immediately after the resource's callback returns.
    After,
    /// Resource destruction.
    Destroy,
}

// ─────────────────────────────────────────────────────────────────────────────
// HookSet
// ─────────────────────────────────────────────────────────────────────────────

/// An init observer callback.
pub type InitHook = Arc<dyn Fn(&InitEvent<'_>) + Send + Sync>;

/// A pre-execution observer callback.
pub type BeforeHook = Arc<dyn Fn(&CallbackEvent<'_>) + Send + Sync>;

/// A post-execution observer callback.
pub type AfterHook = Arc<dyn Fn(&CallbackEvent<'_>) + Send + Sync>;

/// A destroy observer callback. Only the id is delivered; the handle may
/// already be unreachable when destruction is observed.
pub type DestroyHook = Arc<dyn Fn(ResourceId) + Send + Sync>;

/// A record with four optional observer callbacks, one per event kind.
///
/// Cloning a `HookSet` clones the `Arc`s, preserving callback identity: a
/// clone removes the same callbacks the original registered.
#[derive(Clone, Default)]
pub struct HookSet {
    /// Observer for resource creation.
    pub init: Option<InitHook>,
    /// Observer for pre-execution.
    pub before: Option<BeforeHook>,
    /// Observer for post-execution.
    pub after: Option<AfterHook>,
    /// Observer for resource destruction.
    pub destroy: Option<DestroyHook>,
}

impl HookSet {
    /// Creates an empty set with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the init observer.
    #[must_use]
    pub fn on_init(mut self, hook: impl Fn(&InitEvent<'_>) + Send + Sync + 'static) -> Self {
        self.init = Some(Arc::new(hook));
        self
    }

    /// Sets the pre-execution observer.
    #[must_use]
    pub fn on_before(mut self, hook: impl Fn(&CallbackEvent<'_>) + Send + Sync + 'static) -> Self {
        self.before = Some(Arc::new(hook));
        self
    }

    /// Sets the post-execution observer.
    #[must_use]
    pub fn on_after(mut self, hook: impl Fn(&CallbackEvent<'_>) + Send + Sync + 'static) -> Self {
        self.after = Some(Arc::new(hook));
        self
    }

    /// Sets the destroy observer.
    #[must_use]
    pub fn on_destroy(mut self, hook: impl Fn(ResourceId) + Send + Sync + 'static) -> Self {
        self.destroy = Some(Arc::new(hook));
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Removes the first element matching `target` by `Arc` identity, if any.
fn remove_first<T: ?Sized>(list: &mut Vec<Arc<T>>, target: &Arc<T>) {
    if let Some(index) = list.iter().position(|hook| Arc::ptr_eq(hook, target)) {
        list.remove(index);
    }
}

/// Four independent ordered observer lists, one per lifecycle event kind.
///
/// # Re-entrancy
///
/// Dispatch iterates a snapshot cloned under the read lock and released
/// before any callback runs. A hook added during an in-progress fan-out is
/// therefore not invoked for the event being dispatched, and a removal
/// during fan-out neither skips nor double-invokes a neighboring hook.
#[derive(Default)]
pub struct HookRegistry {
    init: RwLock<Vec<InitHook>>,
    before: RwLock<Vec<BeforeHook>>,
    after: RwLock<Vec<AfterHook>>,
    destroy: RwLock<Vec<DestroyHook>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends each callback present in `hooks` to its kind's list.
    ///
    /// No uniqueness check is performed: registering the same callback twice
    /// for the same kind makes it fire twice per event.
    pub fn add(&self, hooks: &HookSet) {
        if let Some(hook) = &hooks.init {
            self.init.write().push(Arc::clone(hook));
        }
        if let Some(hook) = &hooks.before {
            self.before.write().push(Arc::clone(hook));
        }
        if let Some(hook) = &hooks.after {
            self.after.write().push(Arc::clone(hook));
        }
        if let Some(hook) = &hooks.destroy {
            self.destroy.write().push(Arc::clone(hook));
        }
    }

    /// Removes the first occurrence of each callback present in `hooks`,
    /// matched by `Arc` identity. Removing a callback that was never added
    /// is a silent no-op.
    pub fn remove(&self, hooks: &HookSet) {
        if let Some(hook) = &hooks.init {
            remove_first(&mut self.init.write(), hook);
        }
        if let Some(hook) = &hooks.before {
            remove_first(&mut self.before.write(), hook);
        }
        if let Some(hook) = &hooks.after {
            remove_first(&mut self.after.write(), hook);
        }
        if let Some(hook) = &hooks.destroy {
            remove_first(&mut self.destroy.write(), hook);
        }
    }

    /// Returns the number of callbacks registered for the given kind.
    #[must_use]
    pub fn hook_count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Init => self.init.read().len(),
            EventKind::Before => self.before.read().len(),
            EventKind::After => self.after.read().len(),
            EventKind::Destroy => self.destroy.read().len(),
        }
    }

    /// Snapshot of the init observers, in registration order.
    pub(crate) fn init_snapshot(&self) -> Vec<InitHook> {
        self.init.read().clone()
    }

    /// Snapshot of the pre-execution observers, in registration order.
    pub(crate) fn before_snapshot(&self) -> Vec<BeforeHook> {
        self.before.read().clone()
    }

    /// Snapshot of the post-execution observers, in registration order.
    pub(crate) fn after_snapshot(&self) -> Vec<AfterHook> {
        self.after.read().clone()
    }

    /// Snapshot of the destroy observers, in registration order.
    pub(crate) fn destroy_snapshot(&self) -> Vec<DestroyHook> {
        self.destroy.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_registers_only_present_slots() {
        let registry = HookRegistry::new();
        let hooks = HookSet::new().on_init(|_| {}).on_destroy(|_| {});

        registry.add(&hooks);

        assert_eq!(registry.hook_count(EventKind::Init), 1);
        assert_eq!(registry.hook_count(EventKind::Before), 0);
        assert_eq!(registry.hook_count(EventKind::After), 0);
        assert_eq!(registry.hook_count(EventKind::Destroy), 1);
    }

    #[test]
    fn duplicate_registration_is_allowed() {
        let registry = HookRegistry::new();
        let hooks = HookSet::new().on_before(|_| {});

        registry.add(&hooks);
        registry.add(&hooks);
        assert_eq!(registry.hook_count(EventKind::Before), 2);

        // One removal deletes only the first occurrence.
        registry.remove(&hooks);
        assert_eq!(registry.hook_count(EventKind::Before), 1);
    }

    #[test]
    fn removal_matches_callback_identity_not_shape() {
        let registry = HookRegistry::new();
        let registered = HookSet::new().on_init(|_| {});
        let lookalike = HookSet::new().on_init(|_| {});

        registry.add(&registered);
        registry.remove(&lookalike);
        assert_eq!(
            registry.hook_count(EventKind::Init),
            1,
            "a different callback must not match"
        );

        // A clone of the registered set carries the same identity.
        registry.remove(&registered.clone());
        assert_eq!(registry.hook_count(EventKind::Init), 0);
    }

    #[test]
    fn removing_unregistered_hooks_is_a_noop() {
        let registry = HookRegistry::new();
        let hooks = HookSet::new().on_after(|_| {}).on_destroy(|_| {});

        registry.remove(&hooks);

        assert_eq!(registry.hook_count(EventKind::After), 0);
        assert_eq!(registry.hook_count(EventKind::Destroy), 0);
    }

    #[test]
    fn snapshots_preserve_registration_order() {
        let registry = HookRegistry::new();
        let first = HookSet::new().on_destroy(|_| {});
        let second = HookSet::new().on_destroy(|_| {});

        registry.add(&first);
        registry.add(&second);

        let snapshot = registry.destroy_snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(Arc::ptr_eq(&snapshot[0], first.destroy.as_ref().unwrap()));
        assert!(Arc::ptr_eq(&snapshot[1], second.destroy.as_ref().unwrap()));
    }
}
