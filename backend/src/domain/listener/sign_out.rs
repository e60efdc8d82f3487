//! Explicit sign-out broadcast.
//!
//! A sign-out through the API must move every live listener held by that
//! profile to `Disconnected`, wherever the listener runs. Each live
//! connection subscribes for its own profile and stops when told to.

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::domain::ProfileId;

/// Sign-outs a slow subscriber may miss before it starts skipping.
pub const SIGN_OUT_CAPACITY: usize = 64;

/// Fan-out of sign-out events to live connections.
#[derive(Clone)]
pub struct SignOutBus {
    sender: broadcast::Sender<ProfileId>,
}

impl Default for SignOutBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SignOutBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SIGN_OUT_CAPACITY);
        Self { sender }
    }

    /// Announce that `profile` signed out. Returns how many live
    /// connections were listening.
    pub fn sign_out(&self, profile: ProfileId) -> usize {
        match self.sender.send(profile) {
            Ok(listening) => listening,
            Err(_) => {
                debug!(profile_id = %profile, "sign-out with no live connections");
                0
            }
        }
    }

    /// Watch for `profile` signing out.
    pub fn subscribe(&self, profile: ProfileId) -> SignOutWatch {
        SignOutWatch {
            profile,
            receiver: self.sender.subscribe(),
        }
    }
}

/// One connection's view of the [`SignOutBus`].
pub struct SignOutWatch {
    profile: ProfileId,
    receiver: broadcast::Receiver<ProfileId>,
}

impl SignOutWatch {
    /// Resolve once the watched profile signs out.
    ///
    /// Cancel safe. Never resolves once the bus is gone.
    pub async fn signed_out(&mut self) {
        loop {
            match self.receiver.recv().await {
                Ok(profile) if profile == self.profile => return,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "sign-out watch lagged");
                }
                Err(RecvError::Closed) => std::future::pending::<()>().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn only_the_watched_profile_resolves() {
        let bus = SignOutBus::new();
        let me = ProfileId::random();
        let mut watch = bus.subscribe(me);

        assert_eq!(bus.sign_out(ProfileId::random()), 1);
        let early = tokio::time::timeout(Duration::from_millis(20), watch.signed_out()).await;
        assert!(early.is_err(), "someone else's sign-out must not resolve");

        bus.sign_out(me);
        tokio::time::timeout(Duration::from_secs(1), watch.signed_out())
            .await
            .expect("own sign-out resolves");
    }

    #[test]
    fn sign_out_without_connections_reaches_nobody() {
        assert_eq!(SignOutBus::new().sign_out(ProfileId::random()), 0);
    }

    #[tokio::test]
    async fn every_connection_of_a_profile_hears_it() {
        let bus = SignOutBus::new();
        let me = ProfileId::random();
        let mut phone = bus.subscribe(me);
        let mut laptop = bus.subscribe(me);

        assert_eq!(bus.sign_out(me), 2);
        tokio::time::timeout(Duration::from_secs(1), async {
            phone.signed_out().await;
            laptop.signed_out().await;
        })
        .await
        .expect("both connections told");
    }
}
