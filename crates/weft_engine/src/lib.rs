//! Hook registry, lifecycle dispatcher, and engine facade for weft (Layer 2).
//!
//! `weft_engine` is the dispatch core: it receives the four lifecycle events
//! from a [`weft_source::EventSource`] and fans each one out to every
//! registered observer in registration order.
//!
//! # Core Concepts
//!
//! - [`HookSet`] - a record with four optional observer callbacks
//! - [`HookRegistry`] - ordered observer lists, one per event kind
//! - [`LifecycleDispatcher`] - the sink that enforces ignore and parent
//!   semantics before fan-out
//! - [`Engine`] - the public facade: registration, enable/disable,
//!   introspection
//! - [`Producer`] - the trait adapters implement to wire themselves at
//!   engine construction
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_engine::{Engine, HookSet};
//! use weft_source::{EventSource, ProviderKind, ResourceHandle};
//!
//! let source = Arc::new(EventSource::new());
//! let engine = Engine::builder(Arc::clone(&source)).finish().unwrap();
//!
//! let hooks = HookSet::new().on_init(|event| {
//!     println!("resource {} created ({})", event.id, event.kind);
//! });
//! engine.add_hooks(&hooks);
//! engine.enable();
//!
//! let handle = ResourceHandle::new(ProviderKind::Handle);
//! source.emit_init(&handle, None);
//! ```
//!
//! # Architecture
//!
//! This crate is Layer 2 of the weft architecture:
//!
//! - **Layer 1** (`weft_source`): source contract and primitives
//! - **Layer 2** (`weft_engine`): dispatch core (this crate)
//! - **Layer 3** (`weft_producers`): adapters for concrete async primitives

/// Lifecycle dispatcher: ignore set, parent resolution, fan-out.
pub mod dispatch;

/// Engine facade and builder.
pub mod engine;

/// Hook sets, the hook registry, and observer event payloads.
pub mod hooks;

/// Ready-made observers built on `tracing`.
pub mod observe;

/// The producer-adapter trait.
pub mod producer;

pub use dispatch::LifecycleDispatcher;
pub use engine::{Engine, EngineBuilder, EngineError};
pub use hooks::{CallbackEvent, EventKind, HookRegistry, HookSet, InitEvent};
pub use observe::trace_hooks;
pub use producer::Producer;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::dispatch::LifecycleDispatcher;
    pub use crate::engine::{Engine, EngineBuilder, EngineError};
    pub use crate::hooks::{CallbackEvent, EventKind, HookRegistry, HookSet, InitEvent};
    pub use crate::observe::trace_hooks;
    pub use crate::producer::Producer;
}
