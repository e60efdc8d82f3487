//! PostgreSQL-backed `NotificationRepository`.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{NewNotification, Notification};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::DbPool;
use super::schema::notifications;

#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert_many(
        &self,
        rows: &[NewNotification],
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        use diesel::SelectableHelper;

        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let new_rows: Vec<NewNotificationRow> = rows.iter().map(NewNotificationRow::fresh).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Vec<NotificationRow> = diesel::insert_into(notifications::table)
            .values(&new_rows)
            .returning(NotificationRow::as_returning())
            .get_results(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into_iter().map(Notification::from).collect())
    }
}
