//! # Pup Store
//!
//! A single state container driven by a pure transition function, with
//! ordered subscriber notification after every change.
//!
//! ## Core Concepts
//!
//! - **Store**: holds one immutable state snapshot and replaces it on every
//!   dispatched action
//! - **Actions**: inert, typed values describing a requested change
//! - **Transitions**: pure `(state, action) -> state` functions
//! - **Subscriptions**: zero-argument callbacks run in registration order,
//!   plus channel watchers receiving snapshots
//!
//! ## Example
//!
//! ```ignore
//! use pupstore::{add_item_from, gallery, GalleryConfig};
//! use std::sync::Arc;
//!
//! let store = Arc::new(gallery::create_store(&GalleryConfig::default())?);
//!
//! let render = {
//!     let store = Arc::downgrade(&store);
//!     move || {
//!         if let Some(store) = store.upgrade() {
//!             println!("{} pups", store.get_state().items().len());
//!         }
//!     }
//! };
//! render();
//! store.subscribe(render);
//!
//! store.dispatch(add_item_from("https://example.com/pup.gif", "4"))?;
//! ```

pub mod actions;
pub mod error;
pub mod gallery;
pub mod state;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use actions::{add_item, add_item_from, Action};
pub use error::{Result, StoreError};
pub use gallery::{GalleryConfig, GalleryStore, ItemForm};
pub use state::{reduce, reduce_checked};
pub use store::{Store, StoreConfig, Transition};
pub use subscriptions::{
    StateWatcher, Subscriber, SubscriptionId, SubscriptionManager, DEFAULT_WATCHER_BUFFER,
};
pub use types::*;
