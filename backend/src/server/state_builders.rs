//! Builders for the HTTP and WebSocket port bundles.
//!
//! Repositories are Diesel-backed when a pool is configured and fixtures
//! otherwise. Either way notification inserts go through the publishing
//! decorator, so live alerts work in both modes.

use std::sync::Arc;

use mockable::DefaultClock;
use partfinder::domain::ports::{
    FixtureNotificationRepository, FixtureProfileRepository, FixtureRequestRepository,
    FixtureResponseRepository, NotificationRepository, ProfileRepository, RequestRepository,
    ResponseRepository,
};
use partfinder::domain::{
    AccountService, MatchPreviewService, ProviderLoginService, RepositoryNotificationContext,
    RequestFeedService, RequestHistoryService, RequestLifecyclePorts, RequestLifecycleService,
    SignOutBus,
};
use partfinder::inbound::http::state::{HttpState, HttpStatePorts};
use partfinder::inbound::ws::state::WsState;
use partfinder::outbound::change_feed::PublishingNotificationRepository;
use partfinder::outbound::persistence::{
    DbPool, DieselNotificationRepository, DieselProfileRepository, DieselRequestRepository,
    DieselResponseRepository,
};

use super::ServerConfig;

struct Repositories {
    profiles: Arc<dyn ProfileRepository>,
    requests: Arc<dyn RequestRepository>,
    responses: Arc<dyn ResponseRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl Repositories {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
            requests: Arc::new(DieselRequestRepository::new(pool.clone())),
            responses: Arc::new(DieselResponseRepository::new(pool.clone())),
            notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        }
    }

    fn fixtures() -> Self {
        Self {
            profiles: Arc::new(FixtureProfileRepository),
            requests: Arc::new(FixtureRequestRepository),
            responses: Arc::new(FixtureResponseRepository),
            notifications: Arc::new(FixtureNotificationRepository),
        }
    }
}

/// Assemble the adapter states for one server instance.
pub(super) fn build_states(config: &ServerConfig) -> (HttpState, WsState) {
    let Repositories {
        profiles,
        requests,
        responses,
        notifications,
    } = config
        .db_pool
        .as_ref()
        .map_or_else(Repositories::fixtures, Repositories::diesel);
    let notifications: Arc<dyn NotificationRepository> = Arc::new(
        PublishingNotificationRepository::new(notifications, config.feed.clone()),
    );

    let lifecycle = RequestLifecycleService::new(RequestLifecyclePorts {
        profiles: Arc::clone(&profiles),
        requests: Arc::clone(&requests),
        responses: Arc::clone(&responses),
        notifications,
        blobs: Arc::clone(&config.blobs),
        clock: Arc::new(DefaultClock),
    });

    let http = HttpState::new(HttpStatePorts {
        login: Arc::new(ProviderLoginService::new(Arc::clone(&config.identity))),
        accounts: Arc::new(AccountService::new(
            Arc::clone(&config.identity),
            Arc::clone(&profiles),
        )),
        requests: Arc::new(lifecycle),
        preview: Arc::new(MatchPreviewService::new(Arc::clone(&profiles))),
        feed: Arc::new(RequestFeedService::new(
            Arc::clone(&profiles),
            Arc::clone(&requests),
        )),
        history: Arc::new(RequestHistoryService::new(
            Arc::clone(&profiles),
            Arc::clone(&requests),
            Arc::clone(&responses),
        )),
        geocoder: Arc::clone(&config.geocoder),
    });
    let sign_outs = SignOutBus::new();
    let http = http.with_sign_outs(sign_outs.clone());
    let ws = WsState::new(
        Arc::new(config.feed.clone()),
        Arc::new(RepositoryNotificationContext::new(
            profiles, requests, responses,
        )),
        Arc::clone(&config.geocoder),
        config.origins.clone(),
    )
    .with_sign_outs(sign_outs);
    (http, ws)
}
