//! Traced futures (promise-like continuations).
//!
//! A [`Tracer`] wraps futures into [`Traced`] resources: creation emits init,
//! every poll is bracketed by before and after, and destroy fires once when
//! the wrapper is dropped — whether or not the future ever completed.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::sync::{Arc, OnceLock};

use tracing::trace;
use weft_engine::{Engine, Producer};
use weft_source::{EventSource, ProviderKind, ResourceHandle};

use crate::ProducerError;

/// Adapter registering a future tracer with an engine.
#[derive(Clone, Default)]
pub struct TracerProducer {
    slot: Arc<OnceLock<Tracer>>,
}

impl Producer for TracerProducer {
    fn setup(&self, engine: &Engine) {
        let _ = self.slot.set(Tracer {
            source: Arc::clone(engine.source()),
        });
    }
}

impl TracerProducer {
    /// Returns the tracer wired during engine construction.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError::NotWired`] if no engine ran this adapter's
    /// setup yet.
    pub fn tracer(&self) -> Result<Tracer, ProducerError> {
        self.slot.get().cloned().ok_or(ProducerError::NotWired)
    }
}

/// Wraps futures into traced lifecycle resources.
#[derive(Clone)]
pub struct Tracer {
    source: Arc<EventSource>,
}

impl Tracer {
    /// Traces a future with no parent resource.
    pub fn trace<F: Future>(&self, future: F) -> Traced<F> {
        self.trace_from(None, future)
    }

    /// Traces a future caused by the resource behind `parent`.
    pub fn trace_from<F: Future>(&self, parent: Option<&ResourceHandle>, future: F) -> Traced<F> {
        let handle = ResourceHandle::new(ProviderKind::Promise);
        self.source.emit_init(&handle, parent);
        trace!(target: "weft::producers", id = ?handle.id(), "future traced");
        Traced {
            inner: Box::pin(future),
            handle,
            source: Arc::clone(&self.source),
        }
    }
}

/// A future whose polls and destruction are reported as lifecycle events.
///
/// The inner future is boxed so the wrapper is `Unpin` regardless of the
/// future it carries.
pub struct Traced<F> {
    inner: Pin<Box<F>>,
    handle: ResourceHandle,
    source: Arc<EventSource>,
}

impl<F> Traced<F> {
    /// The handle of the resource backing this future, usable as the parent
    /// of resources it spawns.
    #[must_use]
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }
}

impl<F: Future> Future for Traced<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        this.source.emit_before(&this.handle);
        let result = this.inner.as_mut().poll(cx);
        this.source.emit_after(&this.handle);
        result
    }
}

impl<F> Drop for Traced<F> {
    fn drop(&mut self) {
        if let Some(id) = self.handle.id() {
            self.source.emit_destroy(id);
        }
    }
}
