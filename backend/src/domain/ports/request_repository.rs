//! Port for part request persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, PartRequest, RequestId, Requester};

use super::define_port_error;

define_port_error! {
    /// Errors raised by request repository adapters.
    pub enum RequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "request repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Persist a newly created request.
    async fn insert(&self, request: &PartRequest) -> Result<(), RequestRepositoryError>;

    async fn find_by_id(&self, id: &RequestId) -> Result<Option<PartRequest>, RequestRepositoryError>;

    /// Close an open request.
    ///
    /// The update is conditional on the stored status still being open, so
    /// two concurrent closes cannot both succeed. Returns `true` when this
    /// call performed the transition.
    async fn mark_closed(
        &self,
        id: &RequestId,
        closed_at: DateTime<Utc>,
    ) -> Result<bool, RequestRepositoryError>;

    /// Open requests posted by clients, newest first.
    async fn list_open_client_requests(&self) -> Result<Vec<PartRequest>, RequestRepositoryError>;

    /// Every request `requester` posted, open or closed, newest first.
    async fn list_by_requester(
        &self,
        requester: &Requester,
    ) -> Result<Vec<PartRequest>, RequestRepositoryError>;
}

/// Repository with no stored requests that accepts every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRequestRepository;

#[async_trait]
impl RequestRepository for FixtureRequestRepository {
    async fn insert(&self, _request: &PartRequest) -> Result<(), RequestRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &RequestId,
    ) -> Result<Option<PartRequest>, RequestRepositoryError> {
        Ok(None)
    }

    async fn mark_closed(
        &self,
        _id: &RequestId,
        _closed_at: DateTime<Utc>,
    ) -> Result<bool, RequestRepositoryError> {
        Ok(false)
    }

    async fn list_open_client_requests(&self) -> Result<Vec<PartRequest>, RequestRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_by_requester(
        &self,
        _requester: &Requester,
    ) -> Result<Vec<PartRequest>, RequestRepositoryError> {
        Ok(Vec::new())
    }
}

impl From<RequestRepositoryError> for Error {
    fn from(err: RequestRepositoryError) -> Self {
        match err {
            RequestRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("request repository unavailable: {message}"))
            }
            RequestRepositoryError::Query { message } => Error::internal(format!("request repository error: {message}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_never_closes_anything() {
        let closed = FixtureRequestRepository
            .mark_closed(&RequestId::random(), Utc::now())
            .await
            .expect("fixture update succeeds");
        assert!(!closed);
    }
}
