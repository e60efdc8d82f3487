//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, change feed, blob store, geocoder, identity
//! provider, alert sinks) are implemented by outbound adapters. Driving
//! ports (`PartRequestCommand`, `MatchPreviewQuery`, `VendorRequestFeed`,
//! `RequestHistoryQuery`, `LoginService`, `AccountCommand`) are implemented
//! by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod alert_sinks;
mod blob_store;
mod change_feed;
mod geocoder;
mod identity_provider;
mod login_service;
mod match_preview_query;
mod notification_context;
mod notification_repository;
mod part_request_command;
mod profile_repository;
mod request_history_query;
mod request_repository;
mod response_repository;
mod vendor_request_feed;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, FixtureAccountCommand};
#[cfg(test)]
pub use alert_sinks::{MockSystemNotifier, MockTonePlayer};
pub use alert_sinks::{
    AlertSinkError, FixtureSystemNotifier, FixtureTonePlayer, SystemNotifier, TonePlayer,
};
#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use blob_store::{BlobStore, BlobStoreError, FixtureBlobStore};
#[cfg(test)]
pub use change_feed::MockChangeFeed;
pub use change_feed::{ChangeFeed, ChangeSubscription, FixtureChangeFeed};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{FixtureGeocoder, Geocoder};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FIXTURE_PROFILE_ID, FixtureIdentityProvider, IdentityProvider, IdentityProviderError,
};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use match_preview_query::MockMatchPreviewQuery;
pub use match_preview_query::{FixtureMatchPreviewQuery, MatchPreview, MatchPreviewQuery};
#[cfg(test)]
pub use notification_context::MockNotificationContext;
pub use notification_context::{NotificationContext, NotificationContextError};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
#[cfg(test)]
pub use part_request_command::MockPartRequestCommand;
pub use part_request_command::{
    ClosedRequest, CreatedRequest, FixturePartRequestCommand, ImageUpload, PartRequestCommand,
};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{FixtureProfileRepository, ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use request_history_query::MockRequestHistoryQuery;
pub use request_history_query::{FixtureRequestHistoryQuery, RequestHistoryQuery};
#[cfg(test)]
pub use request_repository::MockRequestRepository;
pub use request_repository::{FixtureRequestRepository, RequestRepository, RequestRepositoryError};
#[cfg(test)]
pub use response_repository::MockResponseRepository;
pub use response_repository::{
    FixtureResponseRepository, ResponseRepository, ResponseRepositoryError,
};
#[cfg(test)]
pub use vendor_request_feed::MockVendorRequestFeed;
pub use vendor_request_feed::{FixtureVendorRequestFeed, VendorRequestFeed};
