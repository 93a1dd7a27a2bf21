//! Publish/subscribe channel for terminal API failures
//!
//! The fetch path announces every unrecoverable failure here so that a
//! presentation layer can surface it without the transport knowing about it.
//! Nothing is queued: a subscriber registered after a dispatch never sees it.

use papaya::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Event name carried by every notification.
pub const API_ERROR_EVENT: &str = "api-error";

/// A single terminal API failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorEvent {
    pub message: String,
    pub title: String,
}

/// Handle returned by [`ErrorBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&ApiErrorEvent) + Send + Sync>;

/// Stateless fan-out of [`ApiErrorEvent`]s to registered listeners
#[derive(Clone, Default)]
pub struct ErrorBus {
    listeners: Arc<HashMap<SubscriptionId, Listener>>,
    next_id: Arc<AtomicU64>,
}

impl ErrorBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the lifetime of the caller's mounted state
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ApiErrorEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.pin().insert(id, Arc::new(listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.pin().remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.pin().len()
    }

    /// Broadcast one event to every current listener
    ///
    /// With no listeners this is a no-op.
    pub fn dispatch(&self, message: impl Into<String>, title: impl Into<String>) {
        let event = ApiErrorEvent {
            message: message.into(),
            title: title.into(),
        };

        // Snapshot first so listeners may (un)subscribe while being called.
        let listeners: Vec<Listener> = self
            .listeners
            .pin()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        debug!(
            event = API_ERROR_EVENT,
            title = %event.title,
            listeners = listeners.len(),
            "Dispatching API error"
        );

        for listener in listeners {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for ErrorBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
