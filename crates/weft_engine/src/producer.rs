//! The producer-adapter trait.
//!
//! A producer routes one family of async primitives through an engine's
//! event source: it creates resource handles, emits init/before/after/destroy
//! at the right moments, and supplies parent handles where it knows the
//! causality. Producers are registered on the [`EngineBuilder`] and wired
//! exactly once, during [`finish`](crate::EngineBuilder::finish).
//!
//! [`EngineBuilder`]: crate::EngineBuilder

use crate::engine::Engine;

/// An adapter that wires a family of async primitives against an engine.
///
/// `setup` is called exactly once per engine, before the engine's dispatcher
/// is installed into the event source. The usual implementation captures the
/// engine's [`EventSource`](weft_source::EventSource) so the adapter can emit
/// lifecycle events later.
pub trait Producer: Send + Sync + 'static {
    /// Wires this adapter against the engine being constructed.
    fn setup(&self, engine: &Engine);
}
