//! Output ports for surfacing an alert to the person at the keyboard.
//!
//! Each sink is independent and best effort: a sink that fails is logged by
//! the dispatcher and the remaining sinks still run.

use crate::domain::{SystemNotification, Tone};

use super::define_port_error;

define_port_error! {
    /// Errors raised by alert sinks.
    pub enum AlertSinkError {
        /// The sink's output channel is gone (for example, the socket closed).
        Disconnected => "alert sink disconnected",
        /// The sink could not render the alert.
        Failed { message: String } => "alert sink failed: {message}",
    }
}

/// Plays a short audible tone.
#[cfg_attr(test, mockall::automock)]
pub trait TonePlayer: Send + Sync {
    fn play(&self, tone: Tone) -> Result<(), AlertSinkError>;
}

/// Shows an operating-system notification.
#[cfg_attr(test, mockall::automock)]
pub trait SystemNotifier: Send + Sync {
    /// Whether the user granted notification permission.
    fn permission_granted(&self) -> bool;

    fn show(&self, notification: &SystemNotification) -> Result<(), AlertSinkError>;
}

/// Silent tone player.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTonePlayer;

impl TonePlayer for FixtureTonePlayer {
    fn play(&self, _tone: Tone) -> Result<(), AlertSinkError> {
        Ok(())
    }
}

/// Notifier for which permission was never granted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSystemNotifier;

impl SystemNotifier for FixtureSystemNotifier {
    fn permission_granted(&self) -> bool {
        false
    }

    fn show(&self, _notification: &SystemNotification) -> Result<(), AlertSinkError> {
        Err(AlertSinkError::failed("notification permission not granted"))
    }
}
