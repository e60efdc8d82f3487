//! Domain primitives, matching rules and services.
//!
//! Purpose: define the marketplace entities (profiles, part requests,
//! responses, notification rows), the geographic matching used for both the
//! live preview and the fan-out, and the services behind the driving ports.
//! Nothing here knows about HTTP, WebSockets or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Matching: `SearchScope`, `Counterpart`, `count_matches`,
//!   `resolve_targets`, `request_visible_to_vendor`.
//! - Accounts: `Registration`, `ProfileUpdate`, `PasswordChange` and the
//!   `AccountService` behind them.
//! - Services: `RequestLifecycleService`, `MatchPreviewService`,
//!   `RequestFeedService`, `RequestHistoryService`, `ProviderLoginService`,
//!   `FanoutNotifier`.
//! - Listener: `NotificationListener`, `AlertDispatcher`, `ToastBus`,
//!   `SignOutBus`.

pub mod account;
pub mod account_service;
pub mod auth;
pub mod catalogue;
pub mod error;
pub mod fanout;
pub mod geo;
pub mod identifiers;
pub mod listener;
pub mod login_service;
pub mod match_preview_service;
pub mod matching;
pub mod notification;
pub mod place;
pub mod place_search;
pub mod ports;
pub mod profile;
pub mod request;
pub mod request_feed;
pub mod request_history;
pub mod request_lifecycle;
pub mod response;
pub mod trace_id;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::account::{
    AccountFormError, PasswordChange, ProfileUpdate, Registration, ValidRegistration,
};
pub use self::account_service::AccountService;
pub use self::auth::{LoginCredentials, LoginValidationError, PASSWORD_MIN_LEN};
pub use self::catalogue::{PART_TAXONOMY, PartCategory, UnknownCategory};
pub use self::error::{Error, ErrorCode};
pub use self::fanout::{FanoutNotifier, FanoutReport};
pub use self::geo::{
    Coordinates, CoordinatesError, EARTH_RADIUS_KM, fuzzy_place_match, haversine_km,
    normalise_place,
};
pub use self::identifiers::{IdentifierError, NotificationId, ProfileId, RequestId, ResponseId};
pub use self::listener::{
    ALERT_TOAST_DURATION, ANONYMOUS_CLIENT, Addressee, Alert, AlertDispatcher, AlertKind,
    DEFAULT_TOAST_DURATION, ListenerState, NewToast, NotificationListener,
    RepositoryNotificationContext, SIGN_OUT_CAPACITY, SignOutBus, SignOutWatch,
    SystemNotification, Toast, ToastBus, ToastId, ToastSubscription, Tone, classify,
    handle_event, resolve_alert,
};
pub use self::login_service::ProviderLoginService;
pub use self::match_preview_service::MatchPreviewService;
pub use self::matching::{
    Counterpart, MatchCounts, SearchScope, count_matches, matches, request_visible_to_vendor,
    resolve_targets,
};
pub use self::notification::{NewNotification, Notification};
pub use self::place::{PlaceSuggestion, split_display_name};
pub use self::place_search::{DebouncedPlaceSearch, PLACE_SEARCH_QUIET_PERIOD};
pub use self::profile::{ANONYMOUS_VENDOR, Profile, Role, UnknownRole};
pub use self::request::{
    PartRequest, RequestDraft, RequestDraftError, RequestStatus, RequestTransitionError,
    Requester, SearchArea, UnknownVariant, VendorPreference,
};
pub use self::request_feed::RequestFeedService;
pub use self::request_history::{
    RequestHistoryEntry, RequestHistoryService, RespondedVendor, VendorContact,
};
pub use self::request_lifecycle::{RequestLifecyclePorts, RequestLifecycleService};
pub use self::response::{PartResponse, ResponseStatus};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use partfinder::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
