//! PostgreSQL-backed `RequestRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{RequestRepository, RequestRepositoryError};
use crate::domain::{PartRequest, RequestId, RequestStatus, Requester};

use super::diesel_error_mapping::{corrupt_row, map_diesel_error, map_pool_error};
use super::models::{NewRequestRow, RequestRow};
use super::pool::DbPool;
use super::schema::requests;

#[derive(Clone)]
pub struct DieselRequestRepository {
    pool: DbPool,
}

impl DieselRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode(row: RequestRow) -> Result<PartRequest, RequestRepositoryError> {
    PartRequest::try_from(row).map_err(|reason| corrupt_row("requests", &reason))
}

#[async_trait]
impl RequestRepository for DieselRequestRepository {
    async fn insert(&self, request: &PartRequest) -> Result<(), RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(requests::table)
            .values(NewRequestRow::from(request))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &RequestId) -> Result<Option<PartRequest>, RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RequestRow> = requests::table
            .filter(requests::id.eq(id.as_uuid()))
            .select(RequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(decode).transpose()
    }

    async fn mark_closed(
        &self,
        id: &RequestId,
        closed_at: DateTime<Utc>,
    ) -> Result<bool, RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            requests::table
                .filter(requests::id.eq(id.as_uuid()))
                .filter(requests::status.eq(RequestStatus::Open.as_str())),
        )
        .set((
            requests::status.eq(RequestStatus::Closed.as_str()),
            requests::closed_at.eq(Some(closed_at)),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if updated == 0 {
            debug!(request_id = %id, "close lost the race or request missing");
        }
        Ok(updated == 1)
    }

    async fn list_open_client_requests(&self) -> Result<Vec<PartRequest>, RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RequestRow> = requests::table
            .filter(requests::status.eq(RequestStatus::Open.as_str()))
            .filter(requests::client_id.is_not_null())
            .order_by(requests::created_at.desc())
            .select(RequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }

    async fn list_by_requester(
        &self,
        requester: &Requester,
    ) -> Result<Vec<PartRequest>, RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = requests::table.into_boxed();
        query = match requester {
            Requester::Client(id) => query.filter(requests::client_id.eq(id.as_uuid())),
            Requester::Vendor(id) => query.filter(requests::vendor_id.eq(id.as_uuid())),
        };
        let rows: Vec<RequestRow> = query
            .order_by(requests::created_at.desc())
            .select(RequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }
}
