//! An instrumentation substrate for async resource lifecycles.
//!
//! weft assigns every async resource a process-unique id, preserves
//! parent/child causality, and fans four lifecycle events — init, before,
//! after, destroy — out to registered observers in registration order.

/// Layer 1: event source contract and primitives.
pub use weft_source;

/// Layer 2: hook registry, dispatcher, and engine facade.
pub use weft_engine;

/// Layer 3: producer adapters for concrete async primitives.
pub use weft_producers;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use weft_engine::prelude::*;
    pub use weft_producers::prelude::*;
    pub use weft_source::prelude::*;
}
