//! Deferred-callback queue.
//!
//! A [`TaskQueue`] is the instrumented analog of a next-tick queue: every
//! deferred callback is one async resource. `defer` emits init, and `drain`
//! brackets each callback between before and after, then emits destroy.
//! Callbacks deferred while a drain is running are picked up by the same
//! drain, in order.

use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::trace;
use weft_engine::{Engine, Producer};
use weft_source::{EventSource, ProviderKind, ResourceHandle};

use crate::ProducerError;

/// Adapter registering a deferred-callback queue with an engine.
///
/// Cloneable factory: register a clone, then fetch the wired queue with
/// [`queue`](Self::queue).
#[derive(Clone, Default)]
pub struct TaskQueueProducer {
    slot: Arc<OnceLock<Arc<TaskQueue>>>,
}

impl Producer for TaskQueueProducer {
    fn setup(&self, engine: &Engine) {
        let _ = self
            .slot
            .set(Arc::new(TaskQueue::new(Arc::clone(engine.source()))));
    }
}

impl TaskQueueProducer {
    /// Returns the queue wired during engine construction.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError::NotWired`] if no engine ran this adapter's
    /// setup yet.
    pub fn queue(&self) -> Result<Arc<TaskQueue>, ProducerError> {
        self.slot.get().cloned().ok_or(ProducerError::NotWired)
    }
}

/// One pending deferred callback.
struct Task {
    handle: Arc<ResourceHandle>,
    run: Box<dyn FnOnce() + Send>,
}

/// An instrumented deferred-callback queue.
pub struct TaskQueue {
    source: Arc<EventSource>,
    pending: Mutex<VecDeque<Task>>,
}

impl TaskQueue {
    fn new(source: Arc<EventSource>) -> Self {
        Self {
            source,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Defers a callback with no parent resource.
    pub fn defer(&self, run: impl FnOnce() + Send + 'static) {
        self.defer_from(None, run);
    }

    /// Defers a callback caused by the resource behind `parent`.
    pub fn defer_from(&self, parent: Option<&ResourceHandle>, run: impl FnOnce() + Send + 'static) {
        let handle = Arc::new(ResourceHandle::new(ProviderKind::DeferredTask));
        self.source.emit_init(&handle, parent);
        trace!(target: "weft::producers", id = ?handle.id(), "task deferred");
        self.pending.lock().push_back(Task {
            handle,
            run: Box::new(run),
        });
    }

    /// Runs every pending callback, including callbacks deferred while the
    /// drain is running. Returns the number of callbacks run.
    pub fn drain(&self) -> usize {
        let mut ran = 0;
        // Pop one task at a time so the lock is never held across a callback;
        // callbacks may defer new tasks or emit events re-entrantly.
        loop {
            let Some(task) = self.pending.lock().pop_front() else {
                break;
            };
            self.source.emit_before(&task.handle);
            (task.run)();
            self.source.emit_after(&task.handle);
            if let Some(id) = task.handle.id() {
                self.source.emit_destroy(id);
            }
            ran += 1;
        }
        ran
    }

    /// Number of callbacks currently pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether no callbacks are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}
