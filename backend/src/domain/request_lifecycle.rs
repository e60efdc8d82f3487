//! Request lifecycle service implementing [`PartRequestCommand`].
//!
//! Each operation validates, performs its one primary write, and then hands
//! off to the [`FanoutNotifier`]. Notification failures never undo or fail
//! the primary write.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    BlobStore, ClosedRequest, CreatedRequest, ImageUpload, NotificationRepository,
    PartRequestCommand, ProfileRepository, RequestRepository, ResponseRepository,
};
use crate::domain::{
    Error, FanoutNotifier, PartRequest, PartResponse, Profile, ProfileId, RequestDraft,
    RequestDraftError, RequestId, Requester, ResponseStatus, Role,
};

const MAX_EXTENSION_LEN: usize = 5;

/// Collaborators of [`RequestLifecycleService`].
pub struct RequestLifecyclePorts<P: ?Sized, R: ?Sized, S: ?Sized, N: ?Sized, B: ?Sized> {
    pub profiles: Arc<P>,
    pub requests: Arc<R>,
    pub responses: Arc<S>,
    pub notifications: Arc<N>,
    pub blobs: Arc<B>,
    pub clock: Arc<dyn Clock>,
}

/// Request lifecycle service.
pub struct RequestLifecycleService<P: ?Sized, R: ?Sized, S: ?Sized, N: ?Sized, B: ?Sized> {
    profiles: Arc<P>,
    requests: Arc<R>,
    responses: Arc<S>,
    blobs: Arc<B>,
    clock: Arc<dyn Clock>,
    notifier: FanoutNotifier<P, S, N>,
}

impl<P: ?Sized, R: ?Sized, S: ?Sized, N: ?Sized, B: ?Sized> RequestLifecycleService<P, R, S, N, B>
where
    P: ProfileRepository,
    R: RequestRepository,
    S: ResponseRepository,
    N: NotificationRepository,
    B: BlobStore,
{
    pub fn new(ports: RequestLifecyclePorts<P, R, S, N, B>) -> Self {
        let RequestLifecyclePorts {
            profiles,
            requests,
            responses,
            notifications,
            blobs,
            clock,
        } = ports;
        let notifier = FanoutNotifier::new(
            Arc::clone(&profiles),
            Arc::clone(&responses),
            notifications,
        );
        Self {
            profiles,
            requests,
            responses,
            blobs,
            clock,
            notifier,
        }
    }

    fn draft_error(error: RequestDraftError) -> Error {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": error.field(),
            "code": error.code(),
        }))
    }

    async fn caller_profile(&self, caller: &ProfileId) -> Result<Profile, Error> {
        self.profiles
            .find_by_id(caller)
            .await?
            .ok_or_else(|| Error::not_found("profile not found"))
    }

    async fn load_request(&self, id: &RequestId) -> Result<PartRequest, Error> {
        self.requests
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("request not found"))
    }

    async fn write_response(
        &self,
        request_id: &RequestId,
        vendor_id: &ProfileId,
        status: ResponseStatus,
    ) -> Result<PartResponse, Error> {
        let previous = self
            .responses
            .find(request_id, vendor_id)
            .await?
            .map(|response| response.status);
        if !status.may_follow(previous) {
            return Err(not_accepted());
        }
        match status {
            // The store re-checks acceptance so a concurrent change still loses.
            ResponseStatus::Completed => self
                .responses
                .complete(request_id, vendor_id)
                .await?
                .ok_or_else(not_accepted),
            ResponseStatus::Accepted | ResponseStatus::Rejected => self
                .responses
                .upsert_decision(request_id, vendor_id, status)
                .await
                .map_err(Error::from),
        }
    }
}

fn not_accepted() -> Error {
    Error::conflict("only an accepted response can be completed")
        .with_details(json!({ "field": "status", "code": "not_accepted" }))
}

fn image_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

#[async_trait]
impl<P: ?Sized, R: ?Sized, S: ?Sized, N: ?Sized, B: ?Sized> PartRequestCommand
    for RequestLifecycleService<P, R, S, N, B>
where
    P: ProfileRepository,
    R: RequestRepository,
    S: ResponseRepository,
    N: NotificationRepository,
    B: BlobStore,
{
    async fn create_request(
        &self,
        caller: &ProfileId,
        draft: RequestDraft,
    ) -> Result<CreatedRequest, Error> {
        let profile = self.caller_profile(caller).await?;
        let requester = match profile.role {
            Role::Client => Requester::Client(profile.id),
            Role::Vendor => Requester::Vendor(profile.id),
            Role::Admin => return Err(Error::forbidden("administrators cannot post requests")),
        };
        let request = draft
            .into_request(RequestId::random(), requester, self.clock.utc())
            .map_err(Self::draft_error)?;
        self.requests
            .insert(&request)
            .await?;
        info!(request_id = %request.id, area = %request.area, "request posted");

        let fanout = self.notifier.notify_request_created(&request).await;
        Ok(CreatedRequest { request, fanout })
    }

    async fn close_request(
        &self,
        caller: &ProfileId,
        request_id: &RequestId,
    ) -> Result<ClosedRequest, Error> {
        let mut request = self.load_request(request_id).await?;
        if request.requester.id() != *caller {
            return Err(Error::forbidden("only the requester may close this request"));
        }
        let now = self.clock.utc();
        request
            .close(now)
            .map_err(|err| Error::conflict(err.to_string()))?;
        let closed = self
            .requests
            .mark_closed(request_id, now)
            .await?;
        if !closed {
            return Err(Error::conflict("request is already closed"));
        }
        info!(request_id = %request.id, "request closed");

        let fanout = self.notifier.notify_request_closed(&request).await;
        Ok(ClosedRequest { request, fanout })
    }

    async fn respond(
        &self,
        caller: &ProfileId,
        request_id: &RequestId,
        status: ResponseStatus,
    ) -> Result<PartResponse, Error> {
        let profile = self.caller_profile(caller).await?;
        if !profile.is_vendor() {
            return Err(Error::forbidden("only vendors can respond to requests"));
        }
        let request = self.load_request(request_id).await?;
        if request.requester.id() == profile.id {
            return Err(Error::forbidden("vendors cannot respond to their own request"));
        }
        if status != ResponseStatus::Completed && !request.is_open() {
            return Err(Error::conflict("request is closed"));
        }
        if status == ResponseStatus::Accepted && !profile.has_phone() {
            return Err(
                Error::invalid_request("a phone number is required to accept a request")
                    .with_details(json!({ "field": "phone", "code": "phone_required" })),
            );
        }

        let response = self.write_response(request_id, caller, status).await?;
        info!(request_id = %request.id, status = status.as_str(), "response recorded");
        self.notifier
            .notify_response(&request, profile.id, status)
            .await;
        Ok(response)
    }

    async fn set_phone(&self, caller: &ProfileId, phone: &str) -> Result<(), Error> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(Error::invalid_request("phone number must not be empty")
                .with_details(json!({ "field": "phone", "code": "required" })));
        }
        let updated = self
            .profiles
            .update_phone(caller, phone)
            .await?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found("profile not found"))
        }
    }

    async fn upload_request_image(
        &self,
        caller: &ProfileId,
        image: ImageUpload,
    ) -> Result<String, Error> {
        if !image.content_type.starts_with("image/") {
            return Err(Error::invalid_request("only images can be attached")
                .with_details(json!({ "field": "image", "code": "not_an_image" })));
        }
        if image.bytes.is_empty() {
            return Err(Error::invalid_request("image must not be empty")
                .with_details(json!({ "field": "image", "code": "required" })));
        }
        let ext = image_extension(&image.file_name).ok_or_else(|| {
            Error::invalid_request("image file name needs an extension")
                .with_details(json!({ "field": "image", "code": "missing_extension" }))
        })?;
        let millis = self.clock.utc().timestamp_millis();
        let path = format!("requests/{caller}/{millis}.{ext}");
        self.blobs
            .upload(&path, &image.content_type, image.bytes)
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "request_lifecycle_tests.rs"]
mod tests;
