//! PostgreSQL-backed `ResponseRepository`.
//!
//! Decisions are written with `INSERT .. ON CONFLICT (request_id, vendor_id)
//! DO UPDATE`, and completion is an `UPDATE` guarded on the accepted status,
//! so neither path reads before it writes.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ResponseRepository, ResponseRepositoryError};
use crate::domain::{PartResponse, ProfileId, RequestId, ResponseId, ResponseStatus};

use super::diesel_error_mapping::{corrupt_row, map_diesel_error, map_pool_error};
use super::models::{NewResponseRow, ResponseRow};
use super::pool::DbPool;
use super::schema::request_responses;

#[derive(Clone)]
pub struct DieselResponseRepository {
    pool: DbPool,
}

impl DieselResponseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode(row: ResponseRow) -> Result<PartResponse, ResponseRepositoryError> {
    PartResponse::try_from(row).map_err(|reason| corrupt_row("request_responses", &reason))
}

#[async_trait]
impl ResponseRepository for DieselResponseRepository {
    async fn find(
        &self,
        request_id: &RequestId,
        vendor_id: &ProfileId,
    ) -> Result<Option<PartResponse>, ResponseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ResponseRow> = request_responses::table
            .filter(request_responses::request_id.eq(request_id.as_uuid()))
            .filter(request_responses::vendor_id.eq(vendor_id.as_uuid()))
            .select(ResponseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(decode).transpose()
    }

    async fn upsert_decision(
        &self,
        request_id: &RequestId,
        vendor_id: &ProfileId,
        status: ResponseStatus,
    ) -> Result<PartResponse, ResponseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewResponseRow {
            id: *ResponseId::random().as_uuid(),
            request_id: *request_id.as_uuid(),
            vendor_id: *vendor_id.as_uuid(),
            status: status.as_str(),
        };
        let stored: ResponseRow = diesel::insert_into(request_responses::table)
            .values(&row)
            .on_conflict((request_responses::request_id, request_responses::vendor_id))
            .do_update()
            .set(request_responses::status.eq(excluded(request_responses::status)))
            .returning(ResponseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        decode(stored)
    }

    async fn complete(
        &self,
        request_id: &RequestId,
        vendor_id: &ProfileId,
    ) -> Result<Option<PartResponse>, ResponseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ResponseRow> = diesel::update(
            request_responses::table
                .filter(request_responses::request_id.eq(request_id.as_uuid()))
                .filter(request_responses::vendor_id.eq(vendor_id.as_uuid()))
                .filter(request_responses::status.eq(ResponseStatus::Accepted.as_str())),
        )
        .set(request_responses::status.eq(ResponseStatus::Completed.as_str()))
        .returning(ResponseRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(decode).transpose()
    }

    async fn accepted_vendors(
        &self,
        request_id: &RequestId,
    ) -> Result<Vec<ProfileId>, ResponseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let vendors: Vec<uuid::Uuid> = request_responses::table
            .filter(request_responses::request_id.eq(request_id.as_uuid()))
            .filter(request_responses::status.eq(ResponseStatus::Accepted.as_str()))
            .select(request_responses::vendor_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(vendors.into_iter().map(ProfileId::from_uuid).collect())
    }

    async fn list_for_requests(
        &self,
        request_ids: &[RequestId],
    ) -> Result<Vec<PartResponse>, ResponseRepositoryError> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<uuid::Uuid> = request_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ResponseRow> = request_responses::table
            .filter(request_responses::request_id.eq_any(uuids))
            .order_by(request_responses::created_at.desc())
            .select(ResponseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }
}
