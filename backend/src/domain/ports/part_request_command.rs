//! Driving port for everything that changes a request's state.
//!
//! Inbound adapters call this port; the domain service behind it validates,
//! persists and then fans out notifications.

use async_trait::async_trait;

use crate::domain::{
    Error, FanoutReport, PartRequest, PartResponse, ProfileId, RequestDraft, RequestId,
    ResponseStatus,
};

/// Outcome of posting a request.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRequest {
    pub request: PartRequest,
    pub fanout: FanoutReport,
}

/// Outcome of closing a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedRequest {
    pub request: PartRequest,
    pub fanout: FanoutReport,
}

/// An image attached to a request before it is posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartRequestCommand: Send + Sync {
    /// Post a new request on behalf of `caller`.
    async fn create_request(
        &self,
        caller: &ProfileId,
        draft: RequestDraft,
    ) -> Result<CreatedRequest, Error>;

    /// Close one of the caller's open requests.
    async fn close_request(
        &self,
        caller: &ProfileId,
        request_id: &RequestId,
    ) -> Result<ClosedRequest, Error>;

    /// Record a vendor's reaction to someone else's request.
    async fn respond(
        &self,
        caller: &ProfileId,
        request_id: &RequestId,
        status: ResponseStatus,
    ) -> Result<PartResponse, Error>;

    /// Store the caller's phone number.
    async fn set_phone(&self, caller: &ProfileId, phone: &str) -> Result<(), Error>;

    /// Store an image and return its public URL.
    async fn upload_request_image(
        &self,
        caller: &ProfileId,
        image: ImageUpload,
    ) -> Result<String, Error>;
}

/// Command port that refuses every change.
///
/// Used when the server starts without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePartRequestCommand;

fn no_store() -> Error {
    Error::service_unavailable("request storage is not configured")
}

#[async_trait]
impl PartRequestCommand for FixturePartRequestCommand {
    async fn create_request(
        &self,
        _caller: &ProfileId,
        _draft: RequestDraft,
    ) -> Result<CreatedRequest, Error> {
        Err(no_store())
    }

    async fn close_request(
        &self,
        _caller: &ProfileId,
        _request_id: &RequestId,
    ) -> Result<ClosedRequest, Error> {
        Err(no_store())
    }

    async fn respond(
        &self,
        _caller: &ProfileId,
        _request_id: &RequestId,
        _status: ResponseStatus,
    ) -> Result<PartResponse, Error> {
        Err(no_store())
    }

    async fn set_phone(&self, _caller: &ProfileId, _phone: &str) -> Result<(), Error> {
        Err(no_store())
    }

    async fn upload_request_image(
        &self,
        _caller: &ProfileId,
        _image: ImageUpload,
    ) -> Result<String, Error> {
        Err(no_store())
    }
}
