//! Identity and opaque resource handles.
//!
//! A [`ResourceId`] is assigned once by the [`EventSource`](crate::EventSource)
//! when a resource is created and stays with the resource for all four of its
//! lifecycle events. The [`ResourceHandle`] is the opaque object producers own
//! for the resource's natural lifetime; the engine only binds the id into the
//! handle's write-once slot and reads it back later, it never takes ownership.

use core::fmt;
use core::num::NonZeroU64;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::provider::ProviderKind;

// ─────────────────────────────────────────────────────────────────────────────
// ResourceId
// ─────────────────────────────────────────────────────────────────────────────

/// Process-unique identifier for one async resource.
///
/// Ids are monotonically increasing, start at 1, and are never reused while
/// the resource is tracked. The same id accompanies all four lifecycle events
/// of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(NonZeroU64);

impl ResourceId {
    /// Creates an id from a raw value. Returns `None` for zero, which is
    /// reserved as the "unassigned" sentinel in handle slots.
    #[must_use]
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceHandle
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque handle for one async resource.
///
/// Owned by the producer that created the resource. Carries the resource's
/// [`ProviderKind`] and a write-once id slot: the slot starts empty, the
/// engine binds the id at init, and every later event reads it back. The
/// first bind wins; later binds are ignored.
#[derive(Debug)]
pub struct ResourceHandle {
    kind: ProviderKind,
    /// Raw id value; zero until bound.
    id: AtomicU64,
}

impl ResourceHandle {
    /// Creates a handle for a resource of the given kind, with no id bound.
    #[must_use]
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            id: AtomicU64::new(0),
        }
    }

    /// The kind of async primitive backing this resource.
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// The id bound to this handle, or `None` before init.
    #[must_use]
    pub fn id(&self) -> Option<ResourceId> {
        ResourceId::new(self.id.load(Ordering::Acquire))
    }

    /// Binds an id into the handle's slot. The first bind wins.
    pub fn bind(&self, id: ResourceId) {
        let _ = self
            .id
            .compare_exchange(0, id.get(), Ordering::AcqRel, Ordering::Acquire);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_starts_unbound() {
        let handle = ResourceHandle::new(ProviderKind::Handle);
        assert_eq!(handle.kind(), ProviderKind::Handle);
        assert!(handle.id().is_none());
    }

    #[test]
    fn first_bind_wins() {
        let handle = ResourceHandle::new(ProviderKind::Timer);
        let first = ResourceId::new(7).unwrap();
        let second = ResourceId::new(9).unwrap();

        handle.bind(first);
        handle.bind(second);

        assert_eq!(handle.id(), Some(first));
    }

    #[test]
    fn zero_is_not_a_valid_id() {
        assert!(ResourceId::new(0).is_none());
        assert_eq!(ResourceId::new(1).unwrap().get(), 1);
    }
}
