//! Timer queue with a manually advanced clock.
//!
//! A [`TimerQueue`] multiplexes user-facing timers onto one internal driver
//! handle, the way timer wheels do. The driver is a resource of
//! [`ProviderKind::TimerDriver`] and therefore invisible to observers; each
//! user timer is a separate [`ProviderKind::Timer`] resource with the full
//! init/before/after/destroy stream. Dropping the queue destroys the driver,
//! which clears its suppression entry.
//!
//! The clock is advanced explicitly with [`advance`](TimerQueue::advance);
//! the queue never schedules work on its own.

use core::time::Duration;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::trace;
use weft_engine::{Engine, Producer};
use weft_source::{EventSource, ProviderKind, ResourceHandle};

use crate::ProducerError;

/// Adapter registering a timer queue with an engine.
#[derive(Clone, Default)]
pub struct TimerProducer {
    slot: Arc<OnceLock<Arc<TimerQueue>>>,
}

impl Producer for TimerProducer {
    fn setup(&self, engine: &Engine) {
        let _ = self
            .slot
            .set(Arc::new(TimerQueue::new(Arc::clone(engine.source()))));
    }
}

impl TimerProducer {
    /// Returns the queue wired during engine construction.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError::NotWired`] if no engine ran this adapter's
    /// setup yet.
    pub fn queue(&self) -> Result<Arc<TimerQueue>, ProducerError> {
        self.slot.get().cloned().ok_or(ProducerError::NotWired)
    }
}

/// One scheduled timer.
struct TimerEntry {
    deadline: Duration,
    /// Tie-breaker preserving schedule order among equal deadlines.
    seq: u64,
    handle: Arc<ResourceHandle>,
    run: Box<dyn FnOnce() + Send>,
}

struct TimerState {
    now: Duration,
    next_seq: u64,
    timers: Vec<TimerEntry>,
}

/// An instrumented timer queue driven by a manual clock.
pub struct TimerQueue {
    source: Arc<EventSource>,
    driver: Arc<ResourceHandle>,
    state: Mutex<TimerState>,
}

impl TimerQueue {
    fn new(source: Arc<EventSource>) -> Self {
        Self {
            source,
            driver: Arc::new(ResourceHandle::new(ProviderKind::TimerDriver)),
            state: Mutex::new(TimerState {
                now: Duration::ZERO,
                next_seq: 0,
                timers: Vec::new(),
            }),
        }
    }

    /// Schedules a callback to fire once `delay` has elapsed on the queue's
    /// clock, with no parent resource.
    pub fn schedule(&self, delay: Duration, run: impl FnOnce() + Send + 'static) {
        self.schedule_from(None, delay, run);
    }

    /// Schedules a callback caused by the resource behind `parent`.
    pub fn schedule_from(
        &self,
        parent: Option<&ResourceHandle>,
        delay: Duration,
        run: impl FnOnce() + Send + 'static,
    ) {
        // The driver comes to life on first use, like the timer wheel it
        // stands for. Its init is suppressed as internal plumbing, but its id
        // must exist so its destroy can clear the suppression entry later.
        if self.driver.id().is_none() {
            self.source.emit_init(&self.driver, None);
        }

        let handle = Arc::new(ResourceHandle::new(ProviderKind::Timer));
        self.source.emit_init(&handle, parent);
        trace!(target: "weft::producers", id = ?handle.id(), ?delay, "timer scheduled");

        let mut state = self.state.lock();
        let deadline = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.timers.push(TimerEntry {
            deadline,
            seq,
            handle,
            run: Box::new(run),
        });
    }

    /// Advances the clock and fires every due timer in deadline order
    /// (schedule order among ties). Returns the number of timers fired.
    ///
    /// Timers scheduled by a firing callback fire in the same advance if
    /// their deadline is already due.
    pub fn advance(&self, dt: Duration) -> usize {
        {
            let mut state = self.state.lock();
            state.now += dt;
        }

        let mut fired = 0;
        // One due timer at a time; the lock is never held across a callback,
        // so callbacks may schedule timers or emit events re-entrantly.
        while let Some(entry) = self.pop_due() {
            self.source.emit_before(&entry.handle);
            (entry.run)();
            self.source.emit_after(&entry.handle);
            if let Some(id) = entry.handle.id() {
                self.source.emit_destroy(id);
            }
            fired += 1;
        }
        fired
    }

    /// Removes and returns the earliest due timer, if any.
    fn pop_due(&self) -> Option<TimerEntry> {
        let mut state = self.state.lock();
        let now = state.now;
        let index = state
            .timers
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= now)
            .min_by_key(|(_, entry)| (entry.deadline, entry.seq))
            .map(|(index, _)| index)?;
        Some(state.timers.remove(index))
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// The internal driver handle. Exposed so embedders can correlate the
    /// suppressed driver resource, e.g. in diagnostics.
    #[must_use]
    pub fn driver_handle(&self) -> &ResourceHandle {
        &self.driver
    }
}

impl Drop for TimerQueue {
    fn drop(&mut self) {
        if let Some(id) = self.driver.id() {
            self.source.emit_destroy(id);
        }
    }
}
