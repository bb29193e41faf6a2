//! Change notifications for the key-value store
//!
//! Every write to a store fires a [`ChangeEvent`] naming the key that changed.
//! Interested parties register a callback with [`ChangeNotifier::subscribe`]
//! and reload whatever they derived from the store. Events can also be fired
//! by hand, which is how another process's writes are surfaced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// A change to the shared store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The modified key, or `None` when the whole store was cleared
    pub key: Option<String>,
}

impl ChangeEvent {
    /// Event for a single modified key
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    /// Event for a cleared store
    pub fn cleared() -> Self {
        Self { key: None }
    }
}

/// Handle returned by [`ChangeNotifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Observer registry for store changes
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: AtomicU64,
    subscribers: RwLock<Vec<(SubscriptionId, Callback)>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every future event
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    /// Deliver an event to every subscriber
    ///
    /// Callbacks run after the registry lock is released, so a callback may
    /// read from the store or subscribe again without deadlocking.
    pub fn notify(&self, event: &ChangeEvent) {
        let callbacks: Vec<Callback> = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        tracing::trace!(key = ?event.key, subscribers = callbacks.len(), "store change");

        for callback in callbacks {
            callback(event);
        }
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .map(|s| s.len())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_subscribe_and_notify() {
        let notifier = ChangeNotifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        notifier.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        notifier.notify(&ChangeEvent::key("budgets-2024-03"));
        notifier.notify(&ChangeEvent::cleared());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].key.as_deref(), Some("budgets-2024-03"));
        assert_eq!(seen[1].key, None);
    }

    #[test]
    fn test_unsubscribe() {
        let notifier = ChangeNotifier::new();
        let count = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&count);
        let id = notifier.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(notifier.subscriber_count(), 1);

        notifier.notify(&ChangeEvent::key("a"));
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify(&ChangeEvent::key("a"));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
