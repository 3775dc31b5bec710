//! Listener plumbing for component events.
//!
//! Each component (retry executor, cache, rate limiter) defines its own event
//! enum implementing [`FetchEvent`] and keeps an [`EventListeners`] set that
//! its config builder fills through `on_*` callbacks.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// An event emitted by a hardened-fetch component.
pub trait FetchEvent: Send + Sync + fmt::Debug {
    /// Short event name such as `"retry"` or `"eviction"`.
    fn event_type(&self) -> &'static str;

    /// When the event happened.
    fn timestamp(&self) -> Instant;

    /// Name of the component instance that emitted it.
    fn component(&self) -> &str;
}

/// Receives events of one type.
pub trait EventListener<E: FetchEvent>: Send + Sync {
    /// Handles a single event.
    fn on_event(&self, event: &E);
}

/// An ordered set of listeners for one event type.
pub struct EventListeners<E: FetchEvent> {
    listeners: Vec<Arc<dyn EventListener<E>>>,
}

impl<E: FetchEvent> Clone for EventListeners<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<E: FetchEvent> fmt::Debug for EventListeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}

impl<E: FetchEvent> EventListeners<E> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Appends a listener.
    pub fn add<L>(&mut self, listener: L)
    where
        L: EventListener<E> + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Delivers `event` to every listener in registration order.
    ///
    /// A listener that panics is skipped; the rest still run.
    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener.on_event(event);
            }));
        }
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl<E: FetchEvent> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapts a closure into an [`EventListener`].
pub struct FnListener<E, F> {
    f: F,
    _event: std::marker::PhantomData<fn(&E)>,
}

impl<E, F> FnListener<E, F>
where
    F: Fn(&E) + Send + Sync,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _event: std::marker::PhantomData,
        }
    }
}

impl<E, F> EventListener<E> for FnListener<E, F>
where
    E: FetchEvent,
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        (self.f)(event)
    }
}
