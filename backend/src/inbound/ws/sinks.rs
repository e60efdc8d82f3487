//! Alert sinks that render by pushing frames to the browser.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::ports::{AlertSinkError, SystemNotifier, TonePlayer};
use crate::domain::{SystemNotification, Tone};
use crate::inbound::ws::messages::ServerFrame;

/// Asks the browser to beep.
pub struct FrameTonePlayer {
    frames: UnboundedSender<ServerFrame>,
}

impl FrameTonePlayer {
    pub fn new(frames: UnboundedSender<ServerFrame>) -> Self {
        Self { frames }
    }
}

impl TonePlayer for FrameTonePlayer {
    fn play(&self, tone: Tone) -> Result<(), AlertSinkError> {
        self.frames
            .send(ServerFrame::Tone(tone))
            .map_err(|_| AlertSinkError::disconnected())
    }
}

/// Asks the browser to raise an operating-system notification.
///
/// Permission is whatever the browser last reported on this connection.
pub struct FrameSystemNotifier {
    frames: UnboundedSender<ServerFrame>,
    permission: Arc<AtomicBool>,
}

impl FrameSystemNotifier {
    pub fn new(frames: UnboundedSender<ServerFrame>, permission: Arc<AtomicBool>) -> Self {
        Self { frames, permission }
    }
}

impl SystemNotifier for FrameSystemNotifier {
    fn permission_granted(&self) -> bool {
        self.permission.load(Ordering::Acquire)
    }

    fn show(&self, notification: &SystemNotification) -> Result<(), AlertSinkError> {
        self.frames
            .send(ServerFrame::SystemNotification(notification.clone()))
            .map_err(|_| AlertSinkError::disconnected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AlertKind;
    use tokio::sync::mpsc;

    #[test]
    fn tones_become_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        FrameTonePlayer::new(tx)
            .play(AlertKind::Error.tone())
            .expect("channel open");
        assert_eq!(rx.try_recv().ok(), Some(ServerFrame::Tone(AlertKind::Error.tone())));
    }

    #[test]
    fn closed_socket_reports_disconnection() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let err = FrameTonePlayer::new(tx)
            .play(AlertKind::Info.tone())
            .expect_err("receiver gone");
        assert!(matches!(err, AlertSinkError::Disconnected));
    }

    #[test]
    fn permission_follows_the_shared_flag() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let flag = Arc::new(AtomicBool::new(false));
        let notifier = FrameSystemNotifier::new(tx, Arc::clone(&flag));
        assert!(!notifier.permission_granted());
        flag.store(true, Ordering::Release);
        assert!(notifier.permission_granted());
    }
}
