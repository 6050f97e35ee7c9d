//! Named publish/subscribe events
//!
//! Every event name has two independent subscriber lists: plain
//! subscribers fired by [`EventBus::publish`] and argument subscribers fired
//! by [`EventBus::publish_with`]. Dispatch works on a snapshot of the list,
//! so handlers may subscribe or unsubscribe on the same bus while it runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{trace, warn};

/// Payload element passed to argument subscribers
pub type EventArg = serde_json::Value;

type PlainHandler = Arc<dyn Fn() + Send + Sync>;
type ArgsHandler = Arc<dyn Fn(&[EventArg]) + Send + Sync>;

/// Handle returned by subscribe, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
enum Handler {
    Plain(PlainHandler),
    WithArgs(ArgsHandler),
}

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    handler: Handler,
}

/// Publish/subscribe registry keyed by event name
pub struct EventBus {
    next_id: AtomicU64,
    events: RwLock<HashMap<String, Vec<Subscriber>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.events.read().len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            events: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe a handler to plain publishes of `event`
    pub fn subscribe<F>(&self, event: &str, handler: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.add(event, Handler::Plain(Arc::new(handler)))
    }

    /// Subscribe a handler to publishes of `event` that carry arguments
    pub fn subscribe_with_args<F>(&self, event: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&[EventArg]) + Send + Sync + 'static,
    {
        self.add(event, Handler::WithArgs(Arc::new(handler)))
    }

    /// Remove a subscription; returns false if it was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut events = self.events.write();
        let mut removed = false;

        events.retain(|_, subscribers| {
            let before = subscribers.len();
            subscribers.retain(|s| s.id != id);
            removed |= subscribers.len() != before;
            !subscribers.is_empty()
        });

        removed
    }

    /// Fire the plain subscribers of `event`; returns how many ran
    pub fn publish(&self, event: &str) -> usize {
        let handlers: Vec<PlainHandler> = self
            .snapshot(event)
            .into_iter()
            .filter_map(|s| match s.handler {
                Handler::Plain(h) => Some(h),
                Handler::WithArgs(_) => None,
            })
            .collect();

        trace!(event, listeners = handlers.len(), "Publishing event");
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    /// Fire the argument subscribers of `event`; returns how many ran
    ///
    /// Logs a warning when nobody listens for arguments on this event.
    pub fn publish_with(&self, event: &str, args: &[EventArg]) -> usize {
        let handlers: Vec<ArgsHandler> = self
            .snapshot(event)
            .into_iter()
            .filter_map(|s| match s.handler {
                Handler::WithArgs(h) => Some(h),
                Handler::Plain(_) => None,
            })
            .collect();

        if handlers.is_empty() {
            warn!(event, "No listeners for event");
            return 0;
        }

        trace!(event, listeners = handlers.len(), args = args.len(), "Publishing event");
        for handler in &handlers {
            handler(args);
        }
        handlers.len()
    }

    /// Number of subscribers (both kinds) for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.events.read().get(event).map_or(0, Vec::len)
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }

    fn add(&self, event: &str, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.events
            .write()
            .entry(event.to_string())
            .or_default()
            .push(Subscriber { id, handler });
        id
    }

    // The lock is released before any handler runs
    fn snapshot(&self, event: &str) -> Vec<Subscriber> {
        self.events.read().get(event).cloned().unwrap_or_default()
    }
}
