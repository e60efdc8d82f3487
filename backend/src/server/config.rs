//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use partfinder::domain::ports::{
    BlobStore, FixtureBlobStore, FixtureGeocoder, FixtureIdentityProvider, Geocoder,
    IdentityProvider,
};
use partfinder::inbound::ws::OriginPolicy;
use partfinder::outbound::change_feed::BroadcastChangeFeed;
use partfinder::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
///
/// Starts from fixture adapters; each `with_*` call swaps in a real one.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity: Arc<dyn IdentityProvider>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) geocoder: Arc<dyn Geocoder>,
    pub(crate) origins: OriginPolicy,
    pub(crate) feed: BroadcastChangeFeed,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        origins: OriginPolicy,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            identity: Arc::new(FixtureIdentityProvider),
            blobs: Arc::new(FixtureBlobStore),
            geocoder: Arc::new(FixtureGeocoder),
            origins,
            feed: BroadcastChangeFeed::default(),
        }
    }

    /// Back the repositories with PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Sign in and store images through the hosted service.
    #[must_use]
    pub fn with_hosted(
        mut self,
        identity: Arc<dyn IdentityProvider>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        self.identity = identity;
        self.blobs = blobs;
        self
    }

    #[must_use]
    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    #[must_use]
    pub fn with_feed(mut self, feed: BroadcastChangeFeed) -> Self {
        self.feed = feed;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
