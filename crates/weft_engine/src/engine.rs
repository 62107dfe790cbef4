//! Engine facade and builder.
//!
//! The [`Engine`] is the single public object bundling the hook registry, the
//! lifecycle dispatcher, and the enable switch for one
//! [`EventSource`](weft_source::EventSource). It is constructed through
//! [`EngineBuilder`], which runs every registered [`Producer`]'s setup exactly
//! once and then installs the dispatcher into the source's wiring slot.
//!
//! Installing a second engine on the same source silently replaces the
//! first's wiring — the slot holds one sink. Callers that need independent
//! engines should give each its own source.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_engine::{Engine, HookSet};
//! use weft_source::EventSource;
//!
//! let source = Arc::new(EventSource::new());
//! let engine = Engine::builder(source).finish().unwrap();
//!
//! engine.add_hooks(&HookSet::new().on_destroy(|id| println!("-{id}")));
//! engine.enable();
//! ```

use core::any::TypeId;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hashbrown::HashSet;
use tracing::debug;
use weft_source::{EventSource, ProviderKind, ResourceId};

use crate::dispatch::LifecycleDispatcher;
use crate::hooks::{HookRegistry, HookSet};
use crate::producer::Producer;

// ─────────────────────────────────────────────────────────────────────────────
// EngineError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while constructing an engine.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// The same producer type was registered more than once.
    DuplicateProducer {
        /// Type name of the duplicate producer.
        name: &'static str,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::DuplicateProducer { name } => {
                write!(f, "producer '{name}' registered more than once")
            }
        }
    }
}

impl core::error::Error for EngineError {}

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

/// The public facade: observer registration, enable/disable, introspection.
pub struct Engine {
    registry: Arc<HookRegistry>,
    dispatcher: Arc<LifecycleDispatcher>,
    source: Arc<EventSource>,
    enabled: AtomicBool,
    version: &'static str,
}

impl Engine {
    /// Starts building an engine bound to the given source.
    #[must_use]
    pub fn builder(source: Arc<EventSource>) -> EngineBuilder {
        EngineBuilder {
            source,
            producers: Vec::new(),
        }
    }

    /// Registers each callback present in `hooks` as an observer, appended in
    /// registration order.
    pub fn add_hooks(&self, hooks: &HookSet) {
        self.registry.add(hooks);
    }

    /// Removes the first occurrence of each callback present in `hooks`.
    /// Removing callbacks that were never added is a silent no-op.
    pub fn remove_hooks(&self, hooks: &HookSet) {
        self.registry.remove(hooks);
    }

    /// Starts lifecycle tracking: the source begins emitting events.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
        self.source.set_enabled(true);
        debug!(target: "weft::engine", "engine enabled");
    }

    /// Stops lifecycle tracking: the source stops emitting events. The
    /// dispatcher stays wired and dispatch resumes on the next
    /// [`enable`](Self::enable).
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
        self.source.set_enabled(false);
        debug!(target: "weft::engine", "engine disabled");
    }

    /// Whether this engine currently has tracking enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Version tag, for cross-registration conflict detection.
    #[must_use]
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// The provider-kind enumeration, for observers that interpret the
    /// `kind` field of init events.
    #[must_use]
    pub fn provider_kinds(&self) -> &'static [ProviderKind] {
        ProviderKind::ALL
    }

    /// The event source this engine is wired into.
    #[must_use]
    pub fn source(&self) -> &Arc<EventSource> {
        &self.source
    }

    /// Whether events for the given id are currently suppressed as internal
    /// plumbing.
    #[must_use]
    pub fn is_ignored(&self, id: ResourceId) -> bool {
        self.dispatcher.is_ignored(id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EngineBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Pending producer registration.
struct ProducerEntry {
    type_id: TypeId,
    type_name: &'static str,
    producer: Box<dyn Producer>,
}

/// Builder collecting producers before the engine is wired.
pub struct EngineBuilder {
    source: Arc<EventSource>,
    producers: Vec<ProducerEntry>,
}

impl EngineBuilder {
    /// Adds a producer adapter. Its `setup` runs exactly once during
    /// [`finish`](Self::finish), in registration order.
    #[must_use]
    pub fn add_producer<P: Producer>(mut self, producer: P) -> Self {
        self.producers.push(ProducerEntry {
            type_id: TypeId::of::<P>(),
            type_name: core::any::type_name::<P>(),
            producer: Box::new(producer),
        });
        self
    }

    /// Wires the engine: runs every producer's setup, then installs the
    /// dispatcher into the source's sink slot.
    ///
    /// The engine starts disabled; call [`Engine::enable`] to begin tracking.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateProducer`] if the same producer type
    /// was added more than once.
    pub fn finish(self) -> Result<Arc<Engine>, EngineError> {
        let mut seen = HashSet::new();
        for entry in &self.producers {
            if !seen.insert(entry.type_id) {
                return Err(EngineError::DuplicateProducer {
                    name: entry.type_name,
                });
            }
        }

        let registry = Arc::new(HookRegistry::new());
        let dispatcher = Arc::new(LifecycleDispatcher::new(Arc::clone(&registry)));
        let engine = Arc::new(Engine {
            registry,
            dispatcher: Arc::clone(&dispatcher),
            source: self.source,
            enabled: AtomicBool::new(false),
            version: env!("CARGO_PKG_VERSION"),
        });

        for entry in &self.producers {
            entry.producer.setup(&engine);
            debug!(target: "weft::engine", producer = entry.type_name, "producer wired");
        }

        engine.source.install(dispatcher);
        Ok(engine)
    }
}
