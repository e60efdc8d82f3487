//! Port for the append-only notifications table.

use async_trait::async_trait;

use crate::domain::{NewNotification, Notification};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert all rows in one statement and return them as stored.
    ///
    /// An empty slice is a no-op.
    async fn insert_many(
        &self,
        rows: &[NewNotification],
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;
}

/// Repository that stores rows nowhere but reports them inserted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationRepository;

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn insert_many(
        &self,
        rows: &[NewNotification],
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let now = chrono::Utc::now();
        Ok(rows
            .iter()
            .map(|row| Notification::from_new(crate::domain::NotificationId::random(), *row, now))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProfileId, RequestId};

    #[tokio::test]
    async fn fixture_reports_every_row() {
        let request_id = RequestId::random();
        let rows = [
            NewNotification::to_vendor(ProfileId::random(), request_id),
            NewNotification::to_vendor(ProfileId::random(), request_id),
        ];
        let stored = FixtureNotificationRepository
            .insert_many(&rows)
            .await
            .expect("fixture insert succeeds");
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|n| n.request_id == request_id));
    }
}
