//! Port for reading and updating marketplace profiles.
//!
//! Matching needs the whole vendor population on every preview and every
//! fan-out, so `list_vendors` is the hot path; adapters should serve it from
//! a single query.

use async_trait::async_trait;

use crate::domain::{Error, Profile, ProfileId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch a single profile.
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Profiles for each of `ids` that exists, in no particular order.
    async fn find_many(&self, ids: &[ProfileId]) -> Result<Vec<Profile>, ProfileRepositoryError>;

    /// Every vendor-role profile, in no particular order.
    async fn list_vendors(&self) -> Result<Vec<Profile>, ProfileRepositoryError>;

    /// Store the profile of a new account. Returns `false` when a profile
    /// with the same id already exists; the stored row is left untouched.
    async fn insert(&self, profile: &Profile) -> Result<bool, ProfileRepositoryError>;

    /// Overwrite the editable fields of an existing profile. Email and role
    /// are never written. Returns `false` when no such profile exists.
    async fn update_details(&self, profile: &Profile) -> Result<bool, ProfileRepositoryError>;

    /// Store a phone number on the profile. Returns `false` when no such
    /// profile exists.
    async fn update_phone(
        &self,
        id: &ProfileId,
        phone: &str,
    ) -> Result<bool, ProfileRepositoryError>;
}

/// Empty marketplace: no profiles, no vendors. Inserts are accepted and
/// forgotten.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileRepository;

#[async_trait]
impl ProfileRepository for FixtureProfileRepository {
    async fn find_by_id(&self, _id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(None)
    }

    async fn find_many(&self, _ids: &[ProfileId]) -> Result<Vec<Profile>, ProfileRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_vendors(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _profile: &Profile) -> Result<bool, ProfileRepositoryError> {
        Ok(true)
    }

    async fn update_details(&self, _profile: &Profile) -> Result<bool, ProfileRepositoryError> {
        Ok(false)
    }

    async fn update_phone(
        &self,
        _id: &ProfileId,
        _phone: &str,
    ) -> Result<bool, ProfileRepositoryError> {
        Ok(false)
    }
}

impl From<ProfileRepositoryError> for Error {
    fn from(err: ProfileRepositoryError) -> Self {
        match err {
            ProfileRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("profile repository unavailable: {message}"))
            }
            ProfileRepositoryError::Query { message } => Error::internal(format!("profile repository error: {message}")),
        }
    }
}
