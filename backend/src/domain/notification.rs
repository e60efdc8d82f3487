//! Fan-out notification rows.
//!
//! A row's target is encoded by which slot is filled:
//!
//! - `vendor_id` set, `client_id` empty: addressed to that vendor (new
//!   request, closure, or a response to a vendor-authored request when
//!   `responder_id` is set).
//! - `client_id` set: addressed to that client; `vendor_id` names the
//!   responding vendor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NotificationId, ProfileId, RequestId};

/// A notification row to be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub vendor_id: Option<ProfileId>,
    pub client_id: Option<ProfileId>,
    pub responder_id: Option<ProfileId>,
    pub request_id: RequestId,
}

impl NewNotification {
    /// Tell a vendor about a request (new or closed).
    pub fn to_vendor(vendor_id: ProfileId, request_id: RequestId) -> Self {
        Self {
            vendor_id: Some(vendor_id),
            client_id: None,
            responder_id: None,
            request_id,
        }
    }

    /// Tell a client that `responder` reacted to their request.
    pub fn to_client(client_id: ProfileId, responder: ProfileId, request_id: RequestId) -> Self {
        Self {
            vendor_id: Some(responder),
            client_id: Some(client_id),
            responder_id: Some(responder),
            request_id,
        }
    }

    /// Tell a vendor requester that another vendor reacted to their request.
    pub fn to_vendor_requester(
        requester: ProfileId,
        responder: ProfileId,
        request_id: RequestId,
    ) -> Self {
        Self {
            vendor_id: Some(requester),
            client_id: None,
            responder_id: Some(responder),
            request_id,
        }
    }
}

/// A persisted notification row as delivered by the change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub vendor_id: Option<ProfileId>,
    pub client_id: Option<ProfileId>,
    pub responder_id: Option<ProfileId>,
    pub request_id: RequestId,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Materialise an inserted row.
    pub fn from_new(id: NotificationId, row: NewNotification, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            vendor_id: row.vendor_id,
            client_id: row.client_id,
            responder_id: row.responder_id,
            request_id: row.request_id,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_rows_leave_client_slot_empty() {
        let vendor = ProfileId::random();
        let row = NewNotification::to_vendor(vendor, RequestId::random());
        assert_eq!(row.vendor_id, Some(vendor));
        assert!(row.client_id.is_none());
        assert!(row.responder_id.is_none());
    }

    #[test]
    fn client_rows_name_the_responder_in_the_vendor_slot() {
        let client = ProfileId::random();
        let vendor = ProfileId::random();
        let row = NewNotification::to_client(client, vendor, RequestId::random());
        assert_eq!(row.client_id, Some(client));
        assert_eq!(row.vendor_id, Some(vendor));
    }

    #[test]
    fn vendor_requester_rows_keep_reference_addressing() {
        let requester = ProfileId::random();
        let responder = ProfileId::random();
        let row = NewNotification::to_vendor_requester(requester, responder, RequestId::random());
        assert_eq!(row.vendor_id, Some(requester));
        assert!(row.client_id.is_none());
        assert_eq!(row.responder_id, Some(responder));
    }
}
