//! Per-session notification listener.
//!
//! A listener is bound to at most one identity at a time. Attaching a new
//! identity tears the old subscription down and opens a fresh one; nothing
//! carries over between identities.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, trace, warn};

use super::{Alert, AlertDispatcher, classify, resolve_alert};
use crate::domain::ports::{ChangeFeed, NotificationContext};
use crate::domain::{Notification, ProfileId};

/// Connection state of a [`NotificationListener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ListenerState {
    Disconnected,
    Connecting,
    Connected,
}

/// Process one change-feed row for `user`.
///
/// Rows addressed to somebody else are dropped. Returns the alert that was
/// dispatched, if any. Context lookups that fail are logged and swallowed.
pub async fn handle_event<C>(
    context: &C,
    dispatcher: &AlertDispatcher,
    user: &ProfileId,
    event: &Notification,
) -> Option<Alert>
where
    C: NotificationContext + ?Sized,
{
    let Some(addressee) = classify(event, user) else {
        trace!(notification_id = %event.id, "notification not addressed to this session");
        return None;
    };
    match resolve_alert(context, event, addressee).await {
        Ok(Some(alert)) => {
            dispatcher.dispatch(&alert);
            debug!(notification_id = %event.id, title = %alert.title, "alert dispatched");
            Some(alert)
        }
        Ok(None) => None,
        Err(error) => {
            warn!(notification_id = %event.id, %error, "could not render notification");
            None
        }
    }
}

struct Shared {
    state: watch::Sender<ListenerState>,
    generation: AtomicU64,
}

impl Shared {
    fn set_if_current(&self, generation: u64, state: ListenerState) {
        if self.generation.load(Ordering::SeqCst) == generation {
            self.state.send_replace(state);
        }
    }
}

struct Attachment {
    user: ProfileId,
    task: JoinHandle<()>,
}

/// Listens to the change feed on behalf of one signed-in user.
pub struct NotificationListener {
    feed: Arc<dyn ChangeFeed>,
    context: Arc<dyn NotificationContext>,
    dispatcher: AlertDispatcher,
    shared: Arc<Shared>,
    attachment: Mutex<Option<Attachment>>,
}

impl NotificationListener {
    pub fn new(
        feed: Arc<dyn ChangeFeed>,
        context: Arc<dyn NotificationContext>,
        dispatcher: AlertDispatcher,
    ) -> Self {
        let (state, _) = watch::channel(ListenerState::Disconnected);
        Self {
            feed,
            context,
            dispatcher,
            shared: Arc::new(Shared {
                state,
                generation: AtomicU64::new(0),
            }),
            attachment: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ListenerState {
        *self.shared.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ListenerState> {
        self.shared.state.subscribe()
    }

    /// The identity currently attached, if any.
    pub fn user(&self) -> Option<ProfileId> {
        self.lock().as_ref().map(|attachment| attachment.user)
    }

    /// Start listening for `user`.
    ///
    /// Re-attaching the identity already attached keeps the live
    /// subscription. Must be called inside a Tokio runtime.
    pub fn attach(&self, user: ProfileId) {
        let mut slot = self.lock();
        if let Some(current) = slot.as_ref() {
            if current.user == user && !current.task.is_finished() {
                return;
            }
        }
        if let Some(previous) = slot.take() {
            previous.task.abort();
            info!(user_id = %previous.user, "notification listener detached");
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.state.send_replace(ListenerState::Connecting);
        let mut subscription = self.feed.subscribe();
        self.shared.state.send_replace(ListenerState::Connected);
        info!(user_id = %user, "notification listener attached");

        let shared = Arc::clone(&self.shared);
        let context = Arc::clone(&self.context);
        let dispatcher = self.dispatcher.clone();
        let task = tokio::spawn(
            async move {
                while let Some(event) = subscription.next().await {
                    handle_event(context.as_ref(), &dispatcher, &user, &event).await;
                }
                info!("change feed closed");
                shared.set_if_current(generation, ListenerState::Disconnected);
            }
            .instrument(info_span!("notification_listener", user_id = %user)),
        );
        *slot = Some(Attachment { user, task });
    }

    /// Stop listening.
    pub fn detach(&self) {
        let mut slot = self.lock();
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = slot.take() {
            previous.task.abort();
            info!(user_id = %previous.user, "notification listener detached");
        }
        self.shared.state.send_replace(ListenerState::Disconnected);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Attachment>> {
        self.attachment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for NotificationListener {
    fn drop(&mut self) {
        if let Some(attachment) = self.lock().take() {
            attachment.task.abort();
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
