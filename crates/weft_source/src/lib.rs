//! Event source primitives for weft (Layer 1).
//!
//! `weft_source` defines the contract between the things that *detect* async
//! resource transitions and the engine that *dispatches* them to observers:
//!
//! - [`ProviderKind`] - category tags for async resources
//! - [`ResourceId`] / [`ResourceHandle`] - identity and the opaque per-resource handle
//! - [`LifecycleSink`] - the four entry points an engine wires into a source
//! - [`EventSource`] - the in-process source: id assignment, enable gate, sink slot
//!
//! # Architecture
//!
//! This crate is Layer 1 of the weft architecture:
//!
//! - **Layer 1** (`weft_source`): source contract and primitives (this crate)
//! - **Layer 2** (`weft_engine`): hook registry, dispatcher, engine facade
//! - **Layer 3** (`weft_producers`): adapters that route async primitives
//!   through a source
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_source::{EventSource, ProviderKind, ResourceHandle};
//!
//! let source = Arc::new(EventSource::new());
//! source.set_enabled(true);
//!
//! // With no sink installed every emission is a no-op.
//! let handle = ResourceHandle::new(ProviderKind::Handle);
//! source.emit_init(&handle, None);
//! assert!(handle.id().is_none());
//! ```

/// Identity and opaque resource handles.
pub mod handle;

/// Provider-kind categories for async resources.
pub mod provider;

/// The lifecycle sink contract and the in-process event source.
pub mod source;

pub use handle::{ResourceHandle, ResourceId};
pub use provider::ProviderKind;
pub use source::{EventSource, LifecycleSink};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::handle::{ResourceHandle, ResourceId};
    pub use crate::provider::ProviderKind;
    pub use crate::source::{EventSource, LifecycleSink};
}
