//! Fan one alert out to the tone, OS notification and toast sinks.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{ALERT_TOAST_DURATION, Alert, NewToast, ToastBus, ToastId};
use crate::domain::ports::{SystemNotifier, TonePlayer};

/// Delivers alerts to every sink.
///
/// Sinks are independent: a failure in one is logged and the rest still
/// run. Nothing is retried.
#[derive(Clone)]
pub struct AlertDispatcher {
    tones: Arc<dyn TonePlayer>,
    system: Arc<dyn SystemNotifier>,
    toasts: ToastBus,
}

impl AlertDispatcher {
    pub fn new(
        tones: Arc<dyn TonePlayer>,
        system: Arc<dyn SystemNotifier>,
        toasts: ToastBus,
    ) -> Self {
        Self {
            tones,
            system,
            toasts,
        }
    }

    pub fn toasts(&self) -> &ToastBus {
        &self.toasts
    }

    pub fn dispatch(&self, alert: &Alert) -> ToastId {
        if let Err(error) = self.tones.play(alert.kind.tone()) {
            warn!(%error, title = %alert.title, "alert tone failed");
        }

        if self.system.permission_granted() {
            if let Err(error) = self.system.show(&alert.system_notification()) {
                warn!(%error, title = %alert.title, "system notification failed");
            }
        } else {
            debug!(title = %alert.title, "system notifications not permitted");
        }

        self.toasts.notify(NewToast {
            title: alert.title.clone(),
            message: Some(alert.message.clone()),
            kind: alert.kind,
            duration: Some(ALERT_TOAST_DURATION),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{AlertSinkError, MockSystemNotifier, MockTonePlayer};
    use crate::domain::{Addressee, AlertKind, Tone};

    fn alert() -> Alert {
        Alert {
            title: "Vendor Rejected".into(),
            message: "Ravi Motors rejected your request".into(),
            kind: AlertKind::Error,
            audience: Addressee::Client,
        }
    }

    #[tokio::test]
    async fn every_sink_receives_the_alert() {
        let mut tones = MockTonePlayer::new();
        tones
            .expect_play()
            .withf(|tone| *tone == Tone::new(300, 500))
            .times(1)
            .returning(|_| Ok(()));
        let mut system = MockSystemNotifier::new();
        system.expect_permission_granted().return_const(true);
        system
            .expect_show()
            .withf(|n| n.tag == "client-notification" && n.title == "Vendor Rejected")
            .times(1)
            .returning(|_| Ok(()));
        let bus = ToastBus::new();
        let dispatcher = AlertDispatcher::new(Arc::new(tones), Arc::new(system), bus.clone());

        let id = dispatcher.dispatch(&alert());

        let active = bus.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, id);
        assert_eq!(active[0].duration_ms, 8_000);
    }

    #[tokio::test]
    async fn failing_sinks_do_not_block_the_toast() {
        let mut tones = MockTonePlayer::new();
        tones
            .expect_play()
            .returning(|_| Err(AlertSinkError::disconnected()));
        let mut system = MockSystemNotifier::new();
        system.expect_permission_granted().return_const(true);
        system
            .expect_show()
            .returning(|_| Err(AlertSinkError::failed("blocked")));
        let bus = ToastBus::new();

        AlertDispatcher::new(Arc::new(tones), Arc::new(system), bus.clone()).dispatch(&alert());

        assert_eq!(bus.active().len(), 1);
    }

    #[tokio::test]
    async fn no_permission_skips_the_system_notification() {
        let mut tones = MockTonePlayer::new();
        tones.expect_play().returning(|_| Ok(()));
        let mut system = MockSystemNotifier::new();
        system.expect_permission_granted().return_const(false);
        system.expect_show().never();

        AlertDispatcher::new(Arc::new(tones), Arc::new(system), ToastBus::new())
            .dispatch(&alert());
    }
}
