//! PostgreSQL-backed `ProfileRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, ProfileId, Role};

use super::diesel_error_mapping::{corrupt_row, map_diesel_error, map_pool_error};
use super::models::{NewProfileRow, ProfileChanges, ProfileRow};
use super::pool::DbPool;
use super::schema::profiles;

#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode(row: ProfileRow) -> Result<Profile, ProfileRepositoryError> {
    Profile::try_from(row).map_err(|reason| corrupt_row("profiles", &reason))
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProfileRow> = profiles::table
            .filter(profiles::id.eq(id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(decode).transpose()
    }

    async fn find_many(&self, ids: &[ProfileId]) -> Result<Vec<Profile>, ProfileRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<_> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProfileRow> = profiles::table
            .filter(profiles::id.eq_any(uuids))
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }

    async fn list_vendors(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProfileRow> = profiles::table
            .filter(profiles::role.eq(Role::Vendor.as_str()))
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }

    async fn update_phone(
        &self,
        id: &ProfileId,
        phone: &str,
    ) -> Result<bool, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(profiles::table.filter(profiles::id.eq(id.as_uuid())))
            .set(profiles::phone.eq(phone))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated == 1)
    }

    async fn insert(&self, profile: &Profile) -> Result<bool, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(profiles::table)
            .values(NewProfileRow::from(profile))
            .on_conflict(profiles::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }

    async fn update_details(&self, profile: &Profile) -> Result<bool, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(profiles::table.filter(profiles::id.eq(profile.id.as_uuid())))
            .set(ProfileChanges::from(profile))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated == 1)
    }
}
