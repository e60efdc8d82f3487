//! Port for vendor responses.
//!
//! At most one response exists per `(request_id, vendor_id)`. Adapters
//! enforce that with a unique key and write through a single conditional
//! statement, never a read followed by an insert or update.

use async_trait::async_trait;

use crate::domain::{Error, PartResponse, ProfileId, RequestId, ResponseStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by response repository adapters.
    pub enum ResponseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "response repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "response repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    async fn find(
        &self,
        request_id: &RequestId,
        vendor_id: &ProfileId,
    ) -> Result<Option<PartResponse>, ResponseRepositoryError>;

    /// Insert or overwrite the vendor's accept/reject decision.
    async fn upsert_decision(
        &self,
        request_id: &RequestId,
        vendor_id: &ProfileId,
        status: ResponseStatus,
    ) -> Result<PartResponse, ResponseRepositoryError>;

    /// Move an accepted response to completed.
    ///
    /// Returns `None` when there is no accepted response to complete.
    async fn complete(
        &self,
        request_id: &RequestId,
        vendor_id: &ProfileId,
    ) -> Result<Option<PartResponse>, ResponseRepositoryError>;

    /// Vendors whose response to `request_id` is currently accepted.
    async fn accepted_vendors(
        &self,
        request_id: &RequestId,
    ) -> Result<Vec<ProfileId>, ResponseRepositoryError>;

    /// Every response to any of `request_ids`, newest first.
    async fn list_for_requests(
        &self,
        request_ids: &[RequestId],
    ) -> Result<Vec<PartResponse>, ResponseRepositoryError>;
}

/// Repository with no stored responses.
///
/// Decisions are echoed back as freshly created rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureResponseRepository;

#[async_trait]
impl ResponseRepository for FixtureResponseRepository {
    async fn find(
        &self,
        _request_id: &RequestId,
        _vendor_id: &ProfileId,
    ) -> Result<Option<PartResponse>, ResponseRepositoryError> {
        Ok(None)
    }

    async fn upsert_decision(
        &self,
        request_id: &RequestId,
        vendor_id: &ProfileId,
        status: ResponseStatus,
    ) -> Result<PartResponse, ResponseRepositoryError> {
        Ok(PartResponse {
            id: crate::domain::ResponseId::random(),
            request_id: *request_id,
            vendor_id: *vendor_id,
            status,
            created_at: chrono::Utc::now(),
        })
    }

    async fn complete(
        &self,
        _request_id: &RequestId,
        _vendor_id: &ProfileId,
    ) -> Result<Option<PartResponse>, ResponseRepositoryError> {
        Ok(None)
    }

    async fn accepted_vendors(
        &self,
        _request_id: &RequestId,
    ) -> Result<Vec<ProfileId>, ResponseRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_requests(
        &self,
        _request_ids: &[RequestId],
    ) -> Result<Vec<PartResponse>, ResponseRepositoryError> {
        Ok(Vec::new())
    }
}

impl From<ResponseRepositoryError> for Error {
    fn from(err: ResponseRepositoryError) -> Self {
        match err {
            ResponseRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("response repository unavailable: {message}"))
            }
            ResponseRepositoryError::Query { message } => Error::internal(format!("response repository error: {message}")),
        }
    }
}
