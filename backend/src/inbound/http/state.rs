//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be tested with fixtures or mocks and no I/O.

use std::sync::Arc;

use crate::domain::SignOutBus;
use crate::domain::ports::{
    AccountCommand, FixtureAccountCommand, FixtureGeocoder, FixtureMatchPreviewQuery,
    FixturePartRequestCommand, FixtureRequestHistoryQuery, FixtureVendorRequestFeed, Geocoder,
    LoginService, MatchPreviewQuery, PartRequestCommand, RequestHistoryQuery, VendorRequestFeed,
};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub requests: Arc<dyn PartRequestCommand>,
    pub preview: Arc<dyn MatchPreviewQuery>,
    pub feed: Arc<dyn VendorRequestFeed>,
    pub history: Arc<dyn RequestHistoryQuery>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl HttpStatePorts {
    /// Ports with every collaborator but login replaced by a fixture.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use partfinder::domain::ProviderLoginService;
    /// use partfinder::domain::ports::FixtureIdentityProvider;
    /// use partfinder::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let login = Arc::new(ProviderLoginService::new(Arc::new(FixtureIdentityProvider)));
    /// let state = HttpState::new(HttpStatePorts::fixtures(login));
    /// let _ = state.geocoder.clone();
    /// ```
    pub fn fixtures(login: Arc<dyn LoginService>) -> Self {
        Self {
            login,
            accounts: Arc::new(FixtureAccountCommand),
            requests: Arc::new(FixturePartRequestCommand),
            preview: Arc::new(FixtureMatchPreviewQuery),
            feed: Arc::new(FixtureVendorRequestFeed),
            history: Arc::new(FixtureRequestHistoryQuery),
            geocoder: Arc::new(FixtureGeocoder),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub requests: Arc<dyn PartRequestCommand>,
    pub preview: Arc<dyn MatchPreviewQuery>,
    pub feed: Arc<dyn VendorRequestFeed>,
    pub history: Arc<dyn RequestHistoryQuery>,
    pub geocoder: Arc<dyn Geocoder>,
    /// Shared with the WebSocket adapter so sign-out ends live listeners.
    pub sign_outs: SignOutBus,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            accounts,
            requests,
            preview,
            feed,
            history,
            geocoder,
        } = ports;
        Self {
            login,
            accounts,
            requests,
            preview,
            feed,
            history,
            geocoder,
            sign_outs: SignOutBus::new(),
        }
    }

    /// Announce sign-outs on `bus` instead of a private one.
    #[must_use]
    pub fn with_sign_outs(mut self, bus: SignOutBus) -> Self {
        self.sign_outs = bus;
        self
    }
}
