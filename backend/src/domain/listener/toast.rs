//! In-app toast bus.
//!
//! One bus per application root, handed to whoever needs to raise or render
//! toasts. Subscribers observe the full list of active toasts; dropping a
//! subscription unsubscribes it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::AlertKind;

/// Visible duration when the caller does not pick one.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Identifier of a toast on one bus.
///
/// Travels to clients as a bare number so they can ask for a dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(u64);

/// Toast to raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToast {
    pub title: String,
    pub message: Option<String>,
    pub kind: AlertKind,
    /// `None` uses [`DEFAULT_TOAST_DURATION`]; zero never expires.
    pub duration: Option<Duration>,
}

/// An active toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    pub message: Option<String>,
    pub kind: AlertKind,
    pub duration_ms: u64,
}

struct Inner {
    next_id: AtomicU64,
    active: watch::Sender<Vec<Toast>>,
}

impl Inner {
    fn remove(&self, id: ToastId) -> bool {
        self.active.send_if_modified(|toasts| {
            let before = toasts.len();
            toasts.retain(|toast| toast.id != id);
            toasts.len() != before
        })
    }
}

/// Observable list of toasts.
#[derive(Clone)]
pub struct ToastBus {
    inner: Arc<Inner>,
}

impl Default for ToastBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastBus {
    pub fn new() -> Self {
        let (active, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(0),
                active,
            }),
        }
    }

    /// Raise a toast and schedule its expiry.
    ///
    /// Expiry needs a Tokio runtime; outside one the toast stays until
    /// dismissed.
    pub fn notify(&self, toast: NewToast) -> ToastId {
        let id = ToastId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let duration = toast.duration.unwrap_or(DEFAULT_TOAST_DURATION);
        let entry = Toast {
            id,
            title: toast.title,
            message: toast.message,
            kind: toast.kind,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        };
        self.inner.active.send_modify(|toasts| toasts.push(entry));
        debug!(toast_id = id.0, "toast raised");

        if !duration.is_zero() {
            self.schedule_expiry(id, duration);
        }
        id
    }

    /// Remove a toast. Returns `false` when it was already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        self.inner.remove(id)
    }

    /// Snapshot of active toasts, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        self.inner.active.borrow().clone()
    }

    pub fn subscribe(&self) -> ToastSubscription {
        ToastSubscription {
            receiver: self.inner.active.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.active.receiver_count()
    }

    fn schedule_expiry(&self, id: ToastId, after: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(toast_id = id.0, "no runtime; toast will not expire");
            return;
        };
        let bus: Weak<Inner> = Arc::downgrade(&self.inner);
        runtime.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(inner) = bus.upgrade() {
                inner.remove(id);
            }
        });
    }
}

/// Live view of a [`ToastBus`].
pub struct ToastSubscription {
    receiver: watch::Receiver<Vec<Toast>>,
}

impl ToastSubscription {
    /// Wait for the list to change and return it.
    ///
    /// Returns `None` once the bus is gone.
    pub async fn changed(&mut self) -> Option<Vec<Toast>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    pub fn current(&self) -> Vec<Toast> {
        self.receiver.borrow().clone()
    }
}
