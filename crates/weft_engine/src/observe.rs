//! Ready-made observers built on `tracing`.

use tracing::trace;

use crate::hooks::HookSet;

/// Returns a [`HookSet`] that logs all four lifecycle events at `TRACE`
/// level under the `weft::lifecycle` target.
///
/// Keep a clone of the returned set to remove the observers later; removal
/// matches callback identity.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use weft_engine::{Engine, trace_hooks};
/// use weft_source::EventSource;
///
/// let engine = Engine::builder(Arc::new(EventSource::new()))
///     .finish()
///     .unwrap();
/// let logging = trace_hooks();
/// engine.add_hooks(&logging);
/// // ...
/// engine.remove_hooks(&logging);
/// ```
#[must_use]
pub fn trace_hooks() -> HookSet {
    HookSet::new()
        .on_init(|event| {
            trace!(
                target: "weft::lifecycle",
                id = event.id.get(),
                kind = %event.kind,
                parent = event.parent_id.map(|id| id.get()),
                "init"
            );
        })
        .on_before(|event| {
            trace!(target: "weft::lifecycle", id = event.id.get(), "before");
        })
        .on_after(|event| {
            trace!(target: "weft::lifecycle", id = event.id.get(), "after");
        })
        .on_destroy(|id| {
            trace!(target: "weft::lifecycle", id = id.get(), "destroy");
        })
}
