//! Shared WebSocket adapter state.
//!
//! Each connection builds its own listener, toast bus and debounced place
//! search from these ports.

use std::sync::Arc;

use crate::domain::SignOutBus;
use crate::domain::ports::{ChangeFeed, Geocoder, NotificationContext};

use super::OriginPolicy;

/// Dependency bundle for WebSocket connections.
#[derive(Clone)]
pub struct WsState {
    pub feed: Arc<dyn ChangeFeed>,
    pub context: Arc<dyn NotificationContext>,
    pub geocoder: Arc<dyn Geocoder>,
    pub origins: OriginPolicy,
    pub sign_outs: SignOutBus,
}

impl WsState {
    pub fn new(
        feed: Arc<dyn ChangeFeed>,
        context: Arc<dyn NotificationContext>,
        geocoder: Arc<dyn Geocoder>,
        origins: OriginPolicy,
    ) -> Self {
        Self {
            feed,
            context,
            geocoder,
            origins,
            sign_outs: SignOutBus::new(),
        }
    }

    /// Listen for sign-outs on `bus` instead of a private one.
    #[must_use]
    pub fn with_sign_outs(mut self, bus: SignOutBus) -> Self {
        self.sign_outs = bus;
        self
    }
}
