//! Subscription and notification layer.
//!
//! Listeners are plain closures. Each completed mutation is delivered to
//! every listener registered when its round starts, exactly once, in
//! registration order. A mutation made from inside a listener is applied
//! immediately but its event is queued and delivered as its own round after
//! the current one finishes, so rounds never interleave.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::event::{CartEvent, CartSummary};

type Listener = Rc<RefCell<dyn FnMut(&CartEvent, &CartSummary)>>;

/// Identifies one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
    queue: RefCell<VecDeque<(CartEvent, CartSummary)>>,
    dispatching: Cell<bool>,
}

impl Registry {
    fn is_registered(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow().iter().any(|(i, _)| *i == id)
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(i, _)| *i != id);
        listeners.len() < before
    }
}

/// Fan-out of store changes to registered listeners.
#[derive(Clone, Default)]
pub struct Notifier {
    registry: Rc<Registry>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` and return its deregistration handle.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&CartEvent, &CartSummary) + 'static,
    {
        let id = SubscriptionId(self.registry.next_id.get());
        self.registry.next_id.set(id.0 + 1);

        let listener: Listener = Rc::new(RefCell::new(listener));
        self.registry.listeners.borrow_mut().push((id, listener));
        trace!(subscription = id.0, "listener subscribed");

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.listeners.borrow().len()
    }

    /// Deliver `event` to every listener.
    ///
    /// If a delivery round is already running (the caller is a listener),
    /// the event is queued behind it and this returns immediately.
    pub fn notify(&self, event: CartEvent, summary: CartSummary) {
        self.registry.queue.borrow_mut().push_back((event, summary));
        if self.registry.dispatching.get() {
            return;
        }

        let _guard = DispatchGuard::enter(&self.registry);
        loop {
            let next = self.registry.queue.borrow_mut().pop_front();
            let Some((event, summary)) = next else {
                break;
            };
            self.deliver(&event, &summary);
        }
    }

    fn deliver(&self, event: &CartEvent, summary: &CartSummary) {
        // Snapshot so listeners may (un)subscribe while we iterate.
        let round: Vec<(SubscriptionId, Listener)> = self.registry.listeners.borrow().clone();
        trace!(?event, listeners = round.len(), "notifying");

        for (id, listener) in round {
            if !self.registry.is_registered(id) {
                continue;
            }
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (&mut *callback)(event, summary);
            }
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Clears the dispatching flag even if a listener panics.
struct DispatchGuard<'a> {
    registry: &'a Registry,
}

impl<'a> DispatchGuard<'a> {
    fn enter(registry: &'a Registry) -> Self {
        registry.dispatching.set(true);
        Self { registry }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.registry.dispatching.set(false);
        self.registry.queue.borrow_mut().clear();
    }
}

/// Handle returned by [`Notifier::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
/// The handle may be moved into the listener itself, which can then
/// unsubscribe from inside its own callback.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the listener. Returns `false` if it was already removed or the
    /// store is gone.
    ///
    /// Takes effect immediately: if a round is in progress, the listener is
    /// skipped for the rest of it.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => {
                let removed = registry.remove(self.id);
                if removed {
                    trace!(subscription = self.id.0, "listener unsubscribed");
                }
                removed
            }
            None => false,
        }
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map_or(false, |registry| registry.is_registered(self.id))
    }
}
