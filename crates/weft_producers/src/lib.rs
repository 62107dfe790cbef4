//! Producer adapters routing async primitives through a weft engine (Layer 3).
//!
//! Each adapter in this crate implements [`Producer`](weft_engine::Producer):
//! it is handed to [`EngineBuilder::add_producer`], wired exactly once during
//! `finish()`, and from then on routes one family of async primitives through
//! the engine's event source:
//!
//! - [`TaskQueueProducer`] / [`TaskQueue`] - deferred callbacks
//! - [`TracerProducer`] / [`Tracer`] - promise-like continuations (futures)
//! - [`TimerProducer`] / [`TimerQueue`] - timers multiplexed onto an internal
//!   driver handle
//!
//! The adapters are cloneable factories: keep a clone, register the adapter,
//! and fetch the wired primitive afterwards.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_engine::Engine;
//! use weft_producers::TaskQueueProducer;
//! use weft_source::EventSource;
//!
//! let tasks = TaskQueueProducer::default();
//! let engine = Engine::builder(Arc::new(EventSource::new()))
//!     .add_producer(tasks.clone())
//!     .finish()
//!     .unwrap();
//! engine.enable();
//!
//! let queue = tasks.queue().unwrap();
//! queue.defer(|| println!("deferred"));
//! queue.drain();
//! ```
//!
//! [`EngineBuilder::add_producer`]: weft_engine::EngineBuilder::add_producer

/// Traced futures (promise-like continuations).
pub mod future;

/// Deferred-callback queue.
pub mod task_queue;

/// Timer queue with a manually advanced clock.
pub mod timer;

use thiserror::Error;

pub use future::{Traced, Tracer, TracerProducer};
pub use task_queue::{TaskQueue, TaskQueueProducer};
pub use timer::{TimerProducer, TimerQueue};

/// Errors raised by producer adapters.
#[derive(Debug, Error)]
pub enum ProducerError {
    /// The adapter was used before an engine's construction wired it.
    #[error("producer adapter used before an engine wired it")]
    NotWired,
}

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::ProducerError;
    pub use crate::future::{Traced, Tracer, TracerProducer};
    pub use crate::task_queue::{TaskQueue, TaskQueueProducer};
    pub use crate::timer::{TimerProducer, TimerQueue};
}
