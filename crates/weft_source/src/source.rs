//! The lifecycle sink contract and the in-process event source.
//!
//! An [`EventSource`] is the host facility that producers emit resource
//! transitions into. It assigns each new resource a [`ResourceId`], gates
//! emission behind an enabled flag, and forwards each event synchronously to
//! the single installed [`LifecycleSink`] in the calling thread. It performs
//! no dispatch logic of its own; ordering, suppression, and fan-out live in
//! the sink.
//!
//! Sources are explicit instances, not process globals. Constructing one
//! source per engine (or per test) gives full isolation.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_source::{EventSource, ProviderKind, ResourceHandle};
//!
//! let source = Arc::new(EventSource::new());
//! // ... install a sink, then:
//! source.set_enabled(true);
//!
//! let handle = ResourceHandle::new(ProviderKind::Timer);
//! source.emit_init(&handle, None);
//! source.emit_before(&handle);
//! source.emit_after(&handle);
//! if let Some(id) = handle.id() {
//!     source.emit_destroy(id);
//! }
//! ```

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::handle::{ResourceHandle, ResourceId};
use crate::provider::ProviderKind;

// ─────────────────────────────────────────────────────────────────────────────
// LifecycleSink
// ─────────────────────────────────────────────────────────────────────────────

/// The four entry points an engine wires into an [`EventSource`].
///
/// The source calls each entry point synchronously at the moment a resource
/// transitions state. The valid per-resource sequence is
/// `init → (before → after)* → destroy`; the source trusts its producers to
/// respect it and the sink does not reject out-of-order calls.
pub trait LifecycleSink: Send + Sync {
    /// A resource was created. `id` is freshly assigned and not yet bound to
    /// `handle`; `parent` is the handle of the resource that caused this one,
    /// if any.
    fn init(
        &self,
        kind: ProviderKind,
        id: ResourceId,
        handle: &ResourceHandle,
        parent: Option<&ResourceHandle>,
    );

    /// The resource's callback is about to run.
    fn before(&self, handle: &ResourceHandle);

    /// The resource's callback finished running.
    fn after(&self, handle: &ResourceHandle);

    /// The resource was destroyed. Only the id is available; the handle may
    /// already be unreachable.
    fn destroy(&self, id: ResourceId);
}

// ─────────────────────────────────────────────────────────────────────────────
// EventSource
// ─────────────────────────────────────────────────────────────────────────────

/// In-process event source: id assignment, enable gate, and a single sink slot.
///
/// # Wiring
///
/// The sink slot holds at most one [`LifecycleSink`]. A second
/// [`install`](Self::install) silently replaces the first — callers that need
/// two independent engines should construct two sources.
///
/// # Gating
///
/// While disabled (the initial state) every `emit_*` call is a no-op: no sink
/// entry point fires and no id is assigned.
pub struct EventSource {
    /// Single wiring slot for the dispatcher entry points.
    sink: RwLock<Option<Arc<dyn LifecycleSink>>>,
    /// Whether emission is active at all.
    enabled: AtomicBool,
    /// Next id to hand out; ids start at 1 and never repeat.
    next_id: AtomicU64,
}

impl Default for EventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource {
    /// Creates a disabled source with no sink installed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: RwLock::new(None),
            enabled: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        }
    }

    /// Installs the sink that receives every emitted event, replacing any
    /// previously installed sink.
    pub fn install(&self, sink: Arc<dyn LifecycleSink>) {
        let replaced = self.sink.write().replace(sink).is_some();
        debug!(target: "weft::source", replaced, "lifecycle sink installed");
    }

    /// Starts or stops emission. While disabled the source invokes no sink
    /// entry point.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        debug!(target: "weft::source", enabled, "emission toggled");
    }

    /// Whether the source currently emits events.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// The sink to forward to, if emission is active.
    ///
    /// The `Arc` is cloned out of the slot so no lock is held while the sink
    /// runs; sink code may re-enter this source.
    fn active_sink(&self) -> Option<Arc<dyn LifecycleSink>> {
        if !self.is_enabled() {
            return None;
        }
        self.sink.read().clone()
    }

    /// Emits creation of the resource behind `handle`, assigning its id.
    ///
    /// `parent` is the handle of the resource whose callback caused this
    /// creation, if the producer knows it.
    pub fn emit_init(&self, handle: &ResourceHandle, parent: Option<&ResourceHandle>) {
        let Some(sink) = self.active_sink() else {
            return;
        };
        let raw = self.next_id.fetch_add(1, Ordering::Relaxed);
        let Some(id) = ResourceId::new(raw) else {
            return;
        };
        sink.init(handle.kind(), id, handle, parent);
    }

    /// Emits the pre-execution event for `handle`.
    pub fn emit_before(&self, handle: &ResourceHandle) {
        if let Some(sink) = self.active_sink() {
            sink.before(handle);
        }
    }

    /// Emits the post-execution event for `handle`.
    pub fn emit_after(&self, handle: &ResourceHandle) {
        if let Some(sink) = self.active_sink() {
            sink.after(handle);
        }
    }

    /// Emits destruction of the resource with the given id.
    pub fn emit_destroy(&self, id: ResourceId) {
        if let Some(sink) = self.active_sink() {
            sink.destroy(id);
        }
    }
}
