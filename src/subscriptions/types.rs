//! Subscription types.

use crate::error::Result;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A zero-argument notification callback.
///
/// Subscribers read the new state through the store themselves. Returning an
/// error aborts the remaining notifications of the current dispatch.
pub type Subscriber = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Handle for a channel-based subscription.
///
/// Every committed state is sent as a snapshot. A watcher that falls
/// `buffer_size` snapshots behind is dropped; the receiver then reports
/// disconnection once drained.
pub struct StateWatcher<S> {
    pub id: SubscriptionId,
    /// Channel to receive snapshots.
    pub receiver: crossbeam_channel::Receiver<Arc<S>>,
}

impl<S> StateWatcher<S> {
    /// Receive the next snapshot (blocking).
    pub fn recv(&self) -> std::result::Result<Arc<S>, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a snapshot (non-blocking).
    pub fn try_recv(&self) -> std::result::Result<Arc<S>, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> std::result::Result<Arc<S>, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain all pending snapshots.
    pub fn drain(&self) -> Vec<Arc<S>> {
        self.receiver.try_iter().collect()
    }
}
