//! Port for the real-time stream of inserted notification rows.
//!
//! Every subscriber sees every row; addressing is decided by the listener.
//! Delivery is best effort: a subscriber that falls behind skips the rows it
//! missed rather than stalling the publisher.

use tokio::sync::broadcast;
use tracing::warn;

use crate::domain::Notification;

/// Receiving half of a change-feed subscription.
///
/// Dropping it unsubscribes.
#[derive(Debug)]
pub struct ChangeSubscription {
    receiver: broadcast::Receiver<Notification>,
}

impl ChangeSubscription {
    pub fn new(receiver: broadcast::Receiver<Notification>) -> Self {
        Self { receiver }
    }

    /// Wait for the next row. Returns `None` once the feed has shut down.
    pub async fn next(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.recv().await {
                Ok(row) => return Some(row),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification subscriber lagged; rows dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ChangeFeed: Send + Sync {
    /// Open a subscription to rows inserted from now on.
    fn subscribe(&self) -> ChangeSubscription;
}

/// Feed that never delivers anything; subscriptions end immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChangeFeed;

impl ChangeFeed for FixtureChangeFeed {
    fn subscribe(&self) -> ChangeSubscription {
        let (_sender, receiver) = broadcast::channel(1);
        ChangeSubscription::new(receiver)
    }
}
