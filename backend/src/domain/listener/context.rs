//! [`NotificationContext`] served straight from the repositories.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    NotificationContext, NotificationContextError, ProfileRepository, ProfileRepositoryError,
    RequestRepository, RequestRepositoryError, ResponseRepository, ResponseRepositoryError,
};
use crate::domain::{PartRequest, PartResponse, Profile, ProfileId, RequestId};

pub struct RepositoryNotificationContext<P: ?Sized, R: ?Sized, S: ?Sized> {
    profiles: Arc<P>,
    requests: Arc<R>,
    responses: Arc<S>,
}

impl<P: ?Sized, R: ?Sized, S: ?Sized> RepositoryNotificationContext<P, R, S> {
    pub fn new(profiles: Arc<P>, requests: Arc<R>, responses: Arc<S>) -> Self {
        Self {
            profiles,
            requests,
            responses,
        }
    }
}

impl From<ProfileRepositoryError> for NotificationContextError {
    fn from(error: ProfileRepositoryError) -> Self {
        match error {
            ProfileRepositoryError::Connection { message } => Self::unavailable(message),
            ProfileRepositoryError::Query { message } => Self::lookup(message),
        }
    }
}

impl From<RequestRepositoryError> for NotificationContextError {
    fn from(error: RequestRepositoryError) -> Self {
        match error {
            RequestRepositoryError::Connection { message } => Self::unavailable(message),
            RequestRepositoryError::Query { message } => Self::lookup(message),
        }
    }
}

impl From<ResponseRepositoryError> for NotificationContextError {
    fn from(error: ResponseRepositoryError) -> Self {
        match error {
            ResponseRepositoryError::Connection { message } => Self::unavailable(message),
            ResponseRepositoryError::Query { message } => Self::lookup(message),
        }
    }
}

#[async_trait]
impl<P: ?Sized, R: ?Sized, S: ?Sized> NotificationContext for RepositoryNotificationContext<P, R, S>
where
    P: ProfileRepository,
    R: RequestRepository,
    S: ResponseRepository,
{
    async fn request(&self, id: &RequestId) -> Result<Option<PartRequest>, NotificationContextError> {
        Ok(self.requests.find_by_id(id).await?)
    }

    async fn profile(&self, id: &ProfileId) -> Result<Option<Profile>, NotificationContextError> {
        Ok(self.profiles.find_by_id(id).await?)
    }

    async fn response(
        &self,
        request_id: &RequestId,
        vendor_id: &ProfileId,
    ) -> Result<Option<PartResponse>, NotificationContextError> {
        Ok(self.responses.find(request_id, vendor_id).await?)
    }
}
