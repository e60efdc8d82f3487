//! Rendering notification rows into human-readable alerts.

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use super::Addressee;
use crate::domain::ports::{NotificationContext, NotificationContextError};
use crate::domain::{
    ANONYMOUS_VENDOR, Notification, PartRequest, Profile, ProfileId, Requester, ResponseStatus,
};

/// Shown when a client's profile has no usable name.
pub const ANONYMOUS_CLIENT: &str = "A client";

/// How long an alert toast stays on screen.
pub const ALERT_TOAST_DURATION: Duration = Duration::from_secs(8);

/// Visual and audible flavour of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

impl AlertKind {
    /// The tone played for this kind.
    pub fn tone(self) -> Tone {
        match self {
            Self::Success => Tone::new(800, 300),
            Self::Error => Tone::new(300, 500),
            Self::Info => Tone::new(600, 200),
        }
    }
}

/// A short sine tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u64,
}

impl Tone {
    pub const fn new(frequency_hz: u32, duration_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Operating-system notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemNotification {
    pub title: String,
    pub body: String,
    pub tag: String,
}

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub kind: AlertKind,
    pub audience: Addressee,
}

impl Alert {
    fn new(
        audience: Addressee,
        kind: AlertKind,
        title: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            title: title.to_owned(),
            message: message.into(),
            kind,
            audience,
        }
    }

    /// The OS notification for this alert.
    pub fn system_notification(&self) -> SystemNotification {
        let tag = match self.audience {
            Addressee::Vendor => "vendor-notification",
            Addressee::Client => "client-notification",
        };
        SystemNotification {
            title: self.title.clone(),
            body: self.message.clone(),
            tag: tag.to_owned(),
        }
    }
}

fn client_name(profile: Option<&Profile>) -> &str {
    profile
        .map(|p| p.full_name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(ANONYMOUS_CLIENT)
}

fn requester_name(requester: Requester, profile: Option<&Profile>) -> &str {
    match requester {
        Requester::Client(_) => client_name(profile),
        Requester::Vendor(_) => profile.map_or(ANONYMOUS_VENDOR, Profile::vendor_display_name),
    }
}

/// Render `event` for the user it was addressed to.
///
/// Returns `Ok(None)` when the referenced request no longer exists.
pub async fn resolve_alert<C>(
    context: &C,
    event: &Notification,
    addressee: Addressee,
) -> Result<Option<Alert>, NotificationContextError>
where
    C: NotificationContext + ?Sized,
{
    let Some(request) = context.request(&event.request_id).await? else {
        warn!(request_id = %event.request_id, "notification references a missing request");
        return Ok(None);
    };

    let responder = match addressee {
        Addressee::Client => event.responder_id.or(event.vendor_id),
        Addressee::Vendor => event.responder_id,
    };
    let alert = match responder {
        Some(vendor) => response_alert(context, addressee, &request, vendor).await?,
        None => request_alert(context, &request).await?,
    };
    Ok(Some(alert))
}

async fn request_alert<C>(
    context: &C,
    request: &PartRequest,
) -> Result<Alert, NotificationContextError>
where
    C: NotificationContext + ?Sized,
{
    let part = &request.part_name;
    if !request.is_open() {
        let profile = context.profile(&request.requester.id()).await?;
        let name = requester_name(request.requester, profile.as_ref());
        return Ok(Alert::new(
            Addressee::Vendor,
            AlertKind::Error,
            "Request Closed",
            format!("{name} closed the request for {part}"),
        ));
    }
    match request.requester {
        Requester::Vendor(_) => Ok(Alert::new(
            Addressee::Vendor,
            AlertKind::Info,
            "Vendor Looking for Part",
            format!("Another vendor needs: {part}"),
        )),
        Requester::Client(client) => {
            let profile = context.profile(&client).await?;
            let name = client_name(profile.as_ref());
            Ok(Alert::new(
                Addressee::Vendor,
                AlertKind::Success,
                "New Request Received",
                format!("{name} requested {part}"),
            ))
        }
    }
}

async fn response_alert<C>(
    context: &C,
    audience: Addressee,
    request: &PartRequest,
    vendor: ProfileId,
) -> Result<Alert, NotificationContextError>
where
    C: NotificationContext + ?Sized,
{
    let profile = context.profile(&vendor).await?;
    let name = profile
        .as_ref()
        .map_or(ANONYMOUS_VENDOR, Profile::vendor_display_name);
    let status = context
        .response(&request.id, &vendor)
        .await?
        .map(|response| response.status);
    let part = &request.part_name;
    let alert = match status {
        Some(ResponseStatus::Accepted) => Alert::new(
            audience,
            AlertKind::Success,
            "Vendor Accepted",
            format!("{name} accepted your request for {part}"),
        ),
        Some(ResponseStatus::Rejected) => Alert::new(
            audience,
            AlertKind::Error,
            "Vendor Rejected",
            format!("{name} rejected your request"),
        ),
        Some(ResponseStatus::Completed) => Alert::new(
            audience,
            AlertKind::Success,
            "Request Completed",
            format!("{name} marked your request as completed"),
        ),
        None => Alert::new(
            audience,
            AlertKind::Info,
            "Vendor Responded",
            format!("{name} responded to your request"),
        ),
    };
    Ok(alert)
}
