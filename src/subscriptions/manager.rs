//! Subscription manager for notifying observers of state changes.

use crate::error::{Result, StoreError};
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::types::{StateWatcher, Subscriber, SubscriptionId};

/// Default number of snapshots a watcher may fall behind before it is dropped.
pub const DEFAULT_WATCHER_BUFFER: usize = 1000;

/// Holds callbacks (in registration order) and channel watchers.
pub struct SubscriptionManager<S> {
    /// Callback subscribers, in registration order.
    callbacks: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    /// Channel watchers by ID.
    watchers: RwLock<HashMap<SubscriptionId, Sender<Arc<S>>>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
    /// Channel capacity for new watchers.
    watcher_buffer: usize,
}

impl<S> SubscriptionManager<S> {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self::with_watcher_buffer(DEFAULT_WATCHER_BUFFER)
    }

    /// Create a new subscription manager with a custom watcher capacity.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_watcher_buffer(watcher_buffer: usize) -> Self {
        Self {
            callbacks: RwLock::new(Vec::new()),
            watchers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            watcher_buffer: watcher_buffer.max(1),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Append a callback to the notification order.
    pub fn subscribe(&self, subscriber: Subscriber) -> SubscriptionId {
        let id = self.next_id();
        self.callbacks.write().push((id, subscriber));
        debug!(subscription = %id, "subscriber registered");
        id
    }

    /// Register a channel watcher.
    pub fn watch(&self) -> StateWatcher<S> {
        let id = self.next_id();
        let (sender, receiver) = bounded(self.watcher_buffer);
        self.watchers.write().insert(id, sender);
        debug!(subscription = %id, buffer = self.watcher_buffer, "watcher registered");
        StateWatcher { id, receiver }
    }

    /// Remove a callback. Returns false if `id` is not a registered callback.
    ///
    /// A callback removed while a notification round is in progress still
    /// runs in that round.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.write();
        match callbacks.iter().position(|(sub_id, _)| *sub_id == id) {
            Some(pos) => {
                callbacks.remove(pos);
                debug!(subscription = %id, "unsubscribed");
                true
            }
            None => false,
        }
    }

    /// Remove a watcher. Returns false if `id` is not a registered watcher.
    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        // Dropping the sender disconnects the watcher's receiver.
        let removed = self.watchers.write().remove(&id).is_some();
        if removed {
            debug!(subscription = %id, "watcher removed");
        }
        removed
    }

    /// Number of callback subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Number of live watchers.
    pub fn watcher_count(&self) -> usize {
        self.watchers.read().len()
    }

    // --- Notification ---

    /// Announce a committed state.
    ///
    /// Watchers receive the snapshot first, then callbacks run in
    /// registration order. The callback list is captured up front, so
    /// callbacks may subscribe, unsubscribe or dispatch while running. The
    /// first failing callback stops the round and its error is returned.
    pub fn notify(&self, state: &Arc<S>) -> Result<()> {
        self.broadcast_snapshot(state);

        let subscribers: Vec<(SubscriptionId, Subscriber)> = self
            .callbacks
            .read()
            .iter()
            .map(|(id, sub)| (*id, Arc::clone(sub)))
            .collect();

        for (id, subscriber) in subscribers {
            trace!(subscription = %id, "notifying subscriber");
            if let Err(e) = subscriber() {
                warn!(subscription = %id, error = %e, "subscriber failed, skipping the rest");
                return Err(StoreError::Subscriber {
                    id,
                    source: Box::new(e),
                });
            }
        }

        Ok(())
    }

    /// Send a snapshot to every watcher. Drops watchers that are full or gone.
    fn broadcast_snapshot(&self, state: &Arc<S>) {
        let mut to_remove = Vec::new();

        {
            let watchers = self.watchers.read();
            for (id, sender) in watchers.iter() {
                if sender.try_send(Arc::clone(state)).is_err() {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut watchers = self.watchers.write();
            for id in to_remove {
                watchers.remove(&id);
                warn!(subscription = %id, "watcher dropped (buffer full or receiver gone)");
            }
        }
    }
}

impl<S> Default for SubscriptionManager<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    fn recording(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Subscriber {
        let log = Arc::clone(log);
        Arc::new(move || {
            log.lock().push(name);
            Ok(())
        })
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let manager: SubscriptionManager<i32> = SubscriptionManager::new();

        let id = manager.subscribe(Arc::new(|| -> Result<()> { Ok(()) }));
        assert_eq!(manager.subscriber_count(), 1);

        assert!(manager.unsubscribe(id));
        assert_eq!(manager.subscriber_count(), 0);
        assert!(!manager.unsubscribe(id));
    }

    #[test]
    fn test_ids_are_unique() {
        let manager: SubscriptionManager<i32> = SubscriptionManager::new();
        let a = manager.subscribe(Arc::new(|| -> Result<()> { Ok(()) }));
        let b = manager.watch().id;
        let c = manager.subscribe(Arc::new(|| -> Result<()> { Ok(()) }));
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn test_notify_in_registration_order() {
        let manager: SubscriptionManager<i32> = SubscriptionManager::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        manager.subscribe(recording(&log, "first"));
        manager.subscribe(recording(&log, "second"));
        manager.subscribe(recording(&log, "third"));

        manager.notify(&Arc::new(1)).unwrap();
        assert_eq!(*log.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failing_subscriber_stops_round() {
        let manager: SubscriptionManager<i32> = SubscriptionManager::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        manager.subscribe(recording(&log, "first"));
        let failing = manager.subscribe(Arc::new(|| -> Result<()> {
            Err(StoreError::Transition("boom".to_string()))
        }));
        manager.subscribe(recording(&log, "third"));

        let result = manager.notify(&Arc::new(1));
        match result {
            Err(StoreError::Subscriber { id, .. }) => assert_eq!(id, failing),
            other => panic!("Expected Subscriber error, got {:?}", other),
        }
        assert_eq!(*log.lock(), vec!["first"]);
    }

    #[test]
    fn test_watcher_receives_snapshots() {
        let manager: SubscriptionManager<i32> = SubscriptionManager::new();
        let watcher = manager.watch();

        manager.notify(&Arc::new(7)).unwrap();

        let snapshot = watcher.recv_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(*snapshot, 7);
    }

    #[test]
    fn test_drop_slow_watcher() {
        let manager: SubscriptionManager<i32> = SubscriptionManager::with_watcher_buffer(2);
        let watcher = manager.watch();

        for i in 0..10 {
            manager.notify(&Arc::new(i)).unwrap();
        }

        assert_eq!(manager.watcher_count(), 0);
        // Buffered snapshots are still readable, then the channel reports disconnect.
        assert_eq!(watcher.drain().len(), 2);
        assert!(matches!(
            watcher.try_recv(),
            Err(crossbeam_channel::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_unwatch_disconnects() {
        let manager: SubscriptionManager<i32> = SubscriptionManager::new();
        let watcher = manager.watch();

        assert!(manager.unwatch(watcher.id));
        assert_eq!(manager.watcher_count(), 0);
        assert!(matches!(
            watcher.try_recv(),
            Err(crossbeam_channel::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_dropped_receiver_removes_watcher() {
        let manager: SubscriptionManager<i32> = SubscriptionManager::new();
        drop(manager.watch());

        manager.notify(&Arc::new(1)).unwrap();
        assert_eq!(manager.watcher_count(), 0);
    }

    #[test]
    fn test_unsubscribe_and_unwatch_are_separate() {
        let manager: SubscriptionManager<i32> = SubscriptionManager::new();
        let callback = manager.subscribe(Arc::new(|| -> Result<()> { Ok(()) }));
        let watcher = manager.watch();

        assert!(!manager.unwatch(callback));
        assert_eq!(manager.subscriber_count(), 1);
        assert!(!manager.unsubscribe(watcher.id));
        assert_eq!(manager.watcher_count(), 1);

        assert!(manager.unsubscribe(callback));
        assert!(manager.unwatch(watcher.id));
    }

    #[test]
    fn test_zero_watcher_buffer_is_raised() {
        let manager: SubscriptionManager<i32> = SubscriptionManager::with_watcher_buffer(0);
        let watcher = manager.watch();

        manager.notify(&Arc::new(5)).unwrap();

        assert_eq!(manager.watcher_count(), 1);
        assert_eq!(*watcher.try_recv().unwrap(), 5);
    }
}
