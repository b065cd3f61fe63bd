//! Subscription system for state change notifications.
//!
//! Two kinds of subscription are supported:
//! - Callbacks: zero-argument functions run synchronously after every
//!   committed state, in registration order.
//! - Watchers: bounded channels receiving each committed state snapshot,
//!   dropped when they fall too far behind.
//!
//! # Example
//!
//! ```ignore
//! let manager = SubscriptionManager::<u32>::new();
//!
//! let id = manager.subscribe(Arc::new(|| {
//!     println!("state changed");
//!     Ok(())
//! }));
//!
//! let watcher = manager.watch();
//! manager.notify(&Arc::new(1))?;
//! assert_eq!(*watcher.recv()?, 1);
//!
//! manager.unsubscribe(id);
//! manager.unwatch(watcher.id);
//! ```

mod manager;
mod types;

pub use manager::{SubscriptionManager, DEFAULT_WATCHER_BUFFER};
pub use types::{StateWatcher, Subscriber, SubscriptionId};
