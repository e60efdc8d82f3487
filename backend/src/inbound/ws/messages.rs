//! Wire-level frames exchanged over the `/ws` socket.
//!
//! Every frame is a JSON object tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::domain::{ListenerState, PlaceSuggestion, SystemNotification, Toast, ToastId, Tone};

/// Frames sent by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientFrame {
    /// Text typed into a location field.
    PlaceSearch { query: String },
    /// The user closed a toast.
    DismissToast { id: ToastId },
    /// Result of the browser's notification permission prompt.
    NotificationPermission { granted: bool },
}

/// Frames pushed to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerFrame {
    /// Full list of active toasts, oldest first.
    Toast { toasts: Vec<Toast> },
    /// Play a short beep.
    Tone(Tone),
    /// Show an operating-system notification.
    SystemNotification(SystemNotification),
    /// Whether the live notification subscription is up.
    ListenerState { state: ListenerState },
    /// Settled suggestions for a `placeSearch` query.
    PlaceResults {
        query: String,
        results: Vec<PlaceSuggestion>,
    },
}
