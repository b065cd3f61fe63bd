//! Main Store struct tying the state, transition and subscriptions together.

use crate::error::{Result, StoreError};
use crate::subscriptions::{
    StateWatcher, Subscriber, SubscriptionId, SubscriptionManager, DEFAULT_WATCHER_BUFFER,
};
use crate::types::StoreStats;
use parking_lot::{ReentrantMutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, debug_span, warn};

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Name attached to log output.
    pub name: String,

    /// Snapshots a watcher may fall behind before it is dropped.
    pub watcher_buffer: usize,
}

impl StoreConfig {
    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.watcher_buffer == 0 {
            return Err(StoreError::InvalidConfig(
                "watcher_buffer must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            watcher_buffer: DEFAULT_WATCHER_BUFFER,
        }
    }
}

/// Transition function held by a store for its whole lifetime.
pub type Transition<S, A> = Box<dyn Fn(&S, &A) -> Result<S> + Send + Sync>;

/// A single state container.
///
/// Holds one immutable state snapshot, replaces it on every dispatched
/// action and notifies subscribers afterwards. There is no global instance;
/// share a store by reference or through an `Arc`.
///
/// Dispatches from different threads are serialized, including their
/// notification rounds. A subscriber may dispatch again from inside its
/// callback; that dispatch runs to completion, with its own notification
/// round, before the outer round continues.
pub struct Store<S, A> {
    /// Store configuration.
    config: StoreConfig,

    /// Current snapshot. Only ever replaced, never mutated.
    state: RwLock<Arc<S>>,

    /// Transition function.
    transition: Transition<S, A>,

    /// Subscriber registry.
    subscriptions: SubscriptionManager<S>,

    /// Serializes replace-and-notify. Re-entrant so subscribers can dispatch.
    dispatch_lock: ReentrantMutex<()>,

    /// Number of committed dispatches.
    dispatch_count: AtomicU64,
}

impl<S, A> Store<S, A> {
    /// Create a store with the default configuration.
    ///
    /// The initial state is taken as-is; subscribers are not notified of it.
    pub fn create<F>(initial_state: S, transition: F) -> Self
    where
        F: Fn(&S, &A) -> Result<S> + Send + Sync + 'static,
    {
        Self::with_config(initial_state, transition, StoreConfig::default())
    }

    /// Create a store from a transition that cannot fail.
    pub fn create_pure<F>(initial_state: S, transition: F) -> Self
    where
        F: Fn(&S, &A) -> S + Send + Sync + 'static,
    {
        Self::create(initial_state, move |state: &S, action: &A| {
            Ok(transition(state, action))
        })
    }

    /// Create a store with a custom configuration.
    ///
    /// The configuration is not validated here; a `watcher_buffer` of zero
    /// is treated as one. Call [`StoreConfig::validate`] to reject it.
    pub fn with_config<F>(initial_state: S, transition: F, config: StoreConfig) -> Self
    where
        F: Fn(&S, &A) -> Result<S> + Send + Sync + 'static,
    {
        debug!(store = %config.name, "store created");
        Self {
            subscriptions: SubscriptionManager::with_watcher_buffer(config.watcher_buffer),
            config,
            state: RwLock::new(Arc::new(initial_state)),
            transition: Box::new(transition),
            dispatch_lock: ReentrantMutex::new(()),
            dispatch_count: AtomicU64::new(0),
        }
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current state snapshot.
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&self.state.read())
    }

    // --- Dispatch ---

    /// Apply an action and notify subscribers.
    ///
    /// If the transition fails the state is left as it was and no subscriber
    /// runs. If a subscriber fails the new state is already committed; the
    /// remaining subscribers of this round are skipped and the error is
    /// returned.
    pub fn dispatch(&self, action: A) -> Result<()>
    where
        A: fmt::Debug,
    {
        let _lock = self.dispatch_lock.lock();
        let _span = debug_span!("dispatch", store = %self.config.name).entered();

        let current = self.get_state();
        let next = match (self.transition)(&current, &action) {
            Ok(next) => Arc::new(next),
            Err(e) => {
                warn!(?action, error = %e, "transition failed, state unchanged");
                return Err(e);
            }
        };

        *self.state.write() = Arc::clone(&next);
        let sequence = self.dispatch_count.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(?action, sequence, "state replaced");

        self.subscriptions.notify(&next)
    }

    // --- Subscriptions ---

    /// Register a callback to run after every committed dispatch.
    ///
    /// The callback is not invoked at registration time.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.try_subscribe(move || {
            callback();
            Ok(())
        })
    }

    /// Register a callback that may fail. A failure aborts the remaining
    /// notifications of that dispatch.
    pub fn try_subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        let subscriber: Subscriber = Arc::new(callback);
        self.subscriptions.subscribe(subscriber)
    }

    /// Remove a callback. Returns false if `id` is not a registered callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(id)
    }

    /// Open a channel receiving every committed state.
    pub fn watch(&self) -> StateWatcher<S> {
        self.subscriptions.watch()
    }

    /// Close a watcher's channel. Returns false if `id` is not a watcher.
    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        self.subscriptions.unwatch(id)
    }

    /// Dispatch and subscription counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            dispatch_count: self.dispatch_count.load(Ordering::SeqCst),
            subscriber_count: self.subscriptions.subscriber_count(),
            watcher_count: self.subscriptions.watcher_count(),
        }
    }
}
