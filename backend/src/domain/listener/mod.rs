//! Real-time notification listener.
//!
//! Turns change-feed rows into alerts for the signed-in user and fans each
//! alert out to the tone, system-notification and toast sinks.

mod alert;
mod classify;
mod context;
mod dispatch;
mod session;
mod sign_out;
mod toast;

pub use alert::{
    ALERT_TOAST_DURATION, ANONYMOUS_CLIENT, Alert, AlertKind, SystemNotification, Tone,
    resolve_alert,
};
pub use classify::{Addressee, classify};
pub use context::RepositoryNotificationContext;
pub use dispatch::AlertDispatcher;
pub use session::{ListenerState, NotificationListener, handle_event};
pub use sign_out::{SIGN_OUT_CAPACITY, SignOutBus, SignOutWatch};
pub use toast::{
    DEFAULT_TOAST_DURATION, NewToast, Toast, ToastBus, ToastId, ToastSubscription,
};
