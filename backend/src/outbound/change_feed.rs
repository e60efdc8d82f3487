//! In-process change feed for inserted notification rows.
//!
//! Rows are published by decorating the notification repository, so every
//! successful insert reaches every live subscriber in insertion order.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::ports::{
    ChangeFeed, ChangeSubscription, NotificationRepository, NotificationRepositoryError,
};
use crate::domain::{NewNotification, Notification};

/// Rows a subscriber may fall behind by before it starts skipping.
pub const DEFAULT_FEED_CAPACITY: usize = 1024;

/// Broadcast channel fronting the notifications table.
#[derive(Debug, Clone)]
pub struct BroadcastChangeFeed {
    sender: broadcast::Sender<Notification>,
}

impl Default for BroadcastChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl BroadcastChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Deliver a row to current subscribers. Returns how many saw it.
    pub fn publish(&self, row: Notification) -> usize {
        self.sender.send(row).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ChangeFeed for BroadcastChangeFeed {
    fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription::new(self.sender.subscribe())
    }
}

/// Notification repository that publishes every stored row.
pub struct PublishingNotificationRepository<R: ?Sized> {
    inner: Arc<R>,
    feed: BroadcastChangeFeed,
}

impl<R: ?Sized> PublishingNotificationRepository<R> {
    pub fn new(inner: Arc<R>, feed: BroadcastChangeFeed) -> Self {
        Self { inner, feed }
    }
}

#[async_trait]
impl<R> NotificationRepository for PublishingNotificationRepository<R>
where
    R: NotificationRepository + ?Sized,
{
    async fn insert_many(
        &self,
        rows: &[NewNotification],
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let stored = self.inner.insert_many(rows).await?;
        for row in &stored {
            let delivered = self.feed.publish(*row);
            debug!(notification_id = %row.id, delivered, "notification published");
        }
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::ports::{FixtureNotificationRepository, MockNotificationRepository};
    use crate::domain::{ProfileId, RequestId};

    #[tokio::test]
    async fn stored_rows_reach_subscribers_in_order() {
        let feed = BroadcastChangeFeed::new(8);
        let mut subscription = feed.subscribe();
        let repo = PublishingNotificationRepository::new(
            Arc::new(FixtureNotificationRepository),
            feed.clone(),
        );
        let request = RequestId::random();
        let rows = [
            NewNotification::to_vendor(ProfileId::random(), request),
            NewNotification::to_vendor(ProfileId::random(), request),
        ];

        let stored = repo.insert_many(&rows).await.expect("insert");

        for expected in &stored {
            assert_eq!(subscription.next().await.as_ref(), Some(expected));
        }
    }

    #[tokio::test]
    async fn failed_inserts_publish_nothing() {
        let feed = BroadcastChangeFeed::new(8);
        let mut subscription = feed.subscribe();
        let mut inner = MockNotificationRepository::new();
        inner
            .expect_insert_many()
            .returning(|_| Err(NotificationRepositoryError::connection("down")));
        let repo = PublishingNotificationRepository::new(Arc::new(inner), feed);

        let rows = [NewNotification::to_vendor(
            ProfileId::random(),
            RequestId::random(),
        )];
        assert!(repo.insert_many(&rows).await.is_err());
        let next = tokio::time::timeout(Duration::from_millis(20), subscription.next()).await;
        assert!(next.is_err(), "nothing should be published");
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let feed = BroadcastChangeFeed::default();
        let row = Notification::from_new(
            crate::domain::NotificationId::random(),
            NewNotification::to_vendor(ProfileId::random(), RequestId::random()),
            chrono::Utc::now(),
        );
        assert_eq!(feed.publish(row), 0);
        assert_eq!(feed.subscriber_count(), 0);
    }
}
