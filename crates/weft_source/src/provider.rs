//! Provider-kind categories for async resources.
//!
//! Every resource a source emits is tagged with the kind of async primitive
//! backing it. Observers receive the kind with each init event and can use
//! it to interpret the handle. Exactly one kind, [`ProviderKind::TimerDriver`],
//! is internal plumbing: user-facing timers are multiplexed onto a shared
//! driver handle, and without suppression observers would see two lifecycle
//! streams for what is conceptually one user-visible resource. The engine
//! keeps resources of that kind invisible to observers.

use core::fmt;

/// Category tag identifying the async primitive backing a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// A generic async handle with no more specific category.
    Handle,
    /// A deferred callback scheduled on a task queue.
    DeferredTask,
    /// A promise-like continuation (a traced future).
    Promise,
    /// A user-facing timer.
    Timer,
    /// The shared driver handle that user-facing timers run on.
    ///
    /// Internal plumbing: resources of this kind are suppressed from
    /// observers for their entire lifetime.
    TimerDriver,
}

impl ProviderKind {
    /// Every provider kind, for observers that enumerate the categories.
    pub const ALL: &'static [ProviderKind] = &[
        ProviderKind::Handle,
        ProviderKind::DeferredTask,
        ProviderKind::Promise,
        ProviderKind::Timer,
        ProviderKind::TimerDriver,
    ];

    /// Whether resources of this kind are internal plumbing, invisible to
    /// observers.
    #[must_use]
    pub fn is_internal(self) -> bool {
        matches!(self, ProviderKind::TimerDriver)
    }

    /// Stable name for logging and diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Handle => "handle",
            ProviderKind::DeferredTask => "deferred_task",
            ProviderKind::Promise => "promise",
            ProviderKind::Timer => "timer",
            ProviderKind::TimerDriver => "timer_driver",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
