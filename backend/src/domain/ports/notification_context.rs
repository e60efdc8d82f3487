//! Port supplying the rows a listener needs to render a notification.
//!
//! A notification row only carries ids. To turn it into a sentence the
//! listener looks up the request, the people involved and the current
//! response status.

use async_trait::async_trait;

use crate::domain::{PartRequest, PartResponse, Profile, ProfileId, RequestId};

use super::define_port_error;

define_port_error! {
    /// Errors raised while loading notification context.
    pub enum NotificationContextError {
        /// Backing store unreachable.
        Unavailable { message: String } =>
            "notification context unavailable: {message}",
        /// Lookup failed.
        Lookup { message: String } =>
            "notification context lookup failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationContext: Send + Sync {
    async fn request(&self, id: &RequestId) -> Result<Option<PartRequest>, NotificationContextError>;

    async fn profile(&self, id: &ProfileId) -> Result<Option<Profile>, NotificationContextError>;

    async fn response(
        &self,
        request_id: &RequestId,
        vendor_id: &ProfileId,
    ) -> Result<Option<PartResponse>, NotificationContextError>;
}
