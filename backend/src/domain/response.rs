//! Vendor responses to part requests.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProfileId, RequestId, ResponseId, UnknownVariant};

/// A vendor's reaction to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Accepted,
    Rejected,
    Completed,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// Whether a response currently in `previous` may move to `self`.
    ///
    /// `completed` is only reachable from `accepted`; accept and reject may
    /// be given (or changed) at any time.
    ///
    /// # Examples
    /// ```
    /// use partfinder::domain::ResponseStatus;
    ///
    /// assert!(ResponseStatus::Completed.may_follow(Some(ResponseStatus::Accepted)));
    /// assert!(!ResponseStatus::Completed.may_follow(None));
    /// assert!(ResponseStatus::Rejected.may_follow(Some(ResponseStatus::Accepted)));
    /// ```
    pub fn may_follow(self, previous: Option<Self>) -> bool {
        match self {
            Self::Completed => previous == Some(Self::Accepted),
            Self::Accepted | Self::Rejected => true,
        }
    }
}

impl FromStr for ResponseStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownVariant {
                kind: "response status",
                value: other.to_owned(),
            }),
        }
    }
}

/// At most one exists per `(request_id, vendor_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartResponse {
    pub id: ResponseId,
    pub request_id: RequestId,
    pub vendor_id: ProfileId,
    pub status: ResponseStatus,
    pub created_at: DateTime<Utc>,
}
