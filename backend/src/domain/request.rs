//! Part requests and the search area a requester chooses for them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::normalise_place;
use super::{Coordinates, PartCategory, ProfileId, RequestId, SearchScope};

/// Who posted a request.
///
/// Storage keeps the reference two-column encoding (`client_id` xor
/// `vendor_id`); in memory the requester is always exactly one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum Requester {
    /// A client seeking vendors.
    Client(ProfileId),
    /// A vendor seeking other vendors.
    Vendor(ProfileId),
}

impl Requester {
    pub fn id(&self) -> ProfileId {
        match self {
            Self::Client(id) | Self::Vendor(id) => *id,
        }
    }

    pub fn client_id(&self) -> Option<ProfileId> {
        match self {
            Self::Client(id) => Some(*id),
            Self::Vendor(_) => None,
        }
    }

    pub fn vendor_id(&self) -> Option<ProfileId> {
        match self {
            Self::Vendor(id) => Some(*id),
            Self::Client(_) => None,
        }
    }

    /// Rebuild from the nullable column pair. Exactly one must be set.
    pub fn from_columns(client_id: Option<ProfileId>, vendor_id: Option<ProfileId>) -> Option<Self> {
        match (client_id, vendor_id) {
            (Some(client), None) => Some(Self::Client(client)),
            (None, Some(vendor)) => Some(Self::Vendor(vendor)),
            _ => None,
        }
    }
}

/// Lifecycle of a request. `Open` to `Closed` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Open,
    Closed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(UnknownVariant::new("request status", other)),
        }
    }
}

/// Authorised-dealer filter layered over the geographic scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorPreference {
    #[default]
    All,
    Authorised,
    Local,
}

impl VendorPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Authorised => "authorised",
            Self::Local => "local",
        }
    }
}

impl FromStr for VendorPreference {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "authorised" => Ok(Self::Authorised),
            "local" => Ok(Self::Local),
            other => Err(UnknownVariant::new("vendor preference", other)),
        }
    }
}

/// Text did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Persisted form of the requester's geographic scope.
///
/// City and state names live beside it on the request; the radius origin is
/// the request's own location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SearchArea {
    Radius { km: f64 },
    City,
    State,
    Country,
}

impl SearchArea {
    /// Value stored in the `area_scope` column.
    pub fn scope_name(&self) -> &'static str {
        match self {
            Self::Radius { .. } => "radius",
            Self::City => "city",
            Self::State => "state",
            Self::Country => "country",
        }
    }

    /// Radius stored in the `area_radius` column.
    pub fn radius_km(&self) -> Option<f64> {
        match self {
            Self::Radius { km } => Some(*km),
            _ => None,
        }
    }

    /// Matching scope for this area, given the form's city, state and pin.
    ///
    /// Shared by the live preview and the fan-out so both count the same
    /// vendors.
    pub fn scope_for(
        &self,
        city: Option<&str>,
        state: Option<&str>,
        location: Option<Coordinates>,
    ) -> SearchScope {
        match *self {
            Self::Radius { km } => SearchScope::Radius {
                km,
                origin: location,
            },
            Self::City => SearchScope::City(city.unwrap_or_default().to_owned()),
            Self::State => SearchScope::State(state.unwrap_or_default().to_owned()),
            Self::Country => SearchScope::Country,
        }
    }

    /// Decode the `area_scope`/`area_radius` column pair.
    pub fn from_columns(scope: &str, radius: Option<f64>) -> Result<Self, UnknownVariant> {
        match (scope, radius) {
            ("radius", Some(km)) => Ok(Self::Radius { km }),
            ("radius", None) => Err(UnknownVariant::new("radius scope without radius", scope)),
            ("city", _) => Ok(Self::City),
            ("state", _) => Ok(Self::State),
            ("country", _) => Ok(Self::Country),
            (other, _) => Err(UnknownVariant::new("area scope", other)),
        }
    }

    /// Interpret rows written before `area_scope` existed, where a zero
    /// radius meant "city" and a missing radius meant state or country.
    ///
    /// # Examples
    /// ```
    /// use partfinder::domain::SearchArea;
    ///
    /// assert_eq!(SearchArea::from_legacy(Some(10.0), None), SearchArea::Radius { km: 10.0 });
    /// assert_eq!(SearchArea::from_legacy(Some(0.0), None), SearchArea::City);
    /// assert_eq!(SearchArea::from_legacy(None, Some("Goa")), SearchArea::State);
    /// assert_eq!(SearchArea::from_legacy(None, None), SearchArea::Country);
    /// ```
    pub fn from_legacy(radius: Option<f64>, state: Option<&str>) -> Self {
        match radius {
            Some(km) if km > 0.0 => Self::Radius { km },
            Some(_) => Self::City,
            None if state.and_then(normalise_place).is_some() => Self::State,
            None => Self::Country,
        }
    }
}

impl fmt::Display for SearchArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radius { km } => write!(f, "{km} km radius"),
            Self::City => f.write_str("city"),
            Self::State => f.write_str("state"),
            Self::Country => f.write_str("country"),
        }
    }
}

/// Transition errors for [`PartRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RequestTransitionError {
    #[error("request is already closed")]
    AlreadyClosed,
}

/// A persisted part-sourcing ask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRequest {
    pub id: RequestId,
    pub requester: Requester,
    pub category: PartCategory,
    pub part_name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub preferred_company: Option<String>,
    pub area: SearchArea,
    pub area_city: Option<String>,
    pub area_state: Option<String>,
    pub location: Option<Coordinates>,
    pub vendor_preference: VendorPreference,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl PartRequest {
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Open
    }

    /// The matching scope this request was posted with.
    pub fn scope(&self) -> SearchScope {
        self.area.scope_for(
            self.area_city.as_deref(),
            self.area_state.as_deref(),
            self.location,
        )
    }

    /// Close the request, stamping `closed_at`.
    pub fn close(&mut self, now: DateTime<Utc>) -> Result<(), RequestTransitionError> {
        if !self.is_open() {
            return Err(RequestTransitionError::AlreadyClosed);
        }
        self.status = RequestStatus::Closed;
        self.closed_at = Some(now);
        Ok(())
    }
}

/// Validation failures for a [`RequestDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestDraftError {
    #[error("part name must not be empty")]
    MissingPartName,
    #[error("description must not be empty")]
    MissingDescription,
    #[error("unknown part category: {0}")]
    UnknownCategory(String),
    #[error("radius must be a finite, non-negative number of kilometres")]
    InvalidRadius,
    #[error("a city is required for a city-wide request")]
    MissingCity,
    #[error("a state is required for a state-wide request")]
    MissingState,
}

impl RequestDraftError {
    /// Form field the failure relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingPartName => "partName",
            Self::MissingDescription => "description",
            Self::UnknownCategory(_) => "category",
            Self::InvalidRadius => "area",
            Self::MissingCity => "areaCity",
            Self::MissingState => "areaState",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingPartName
            | Self::MissingDescription
            | Self::MissingCity
            | Self::MissingState => "required",
            Self::UnknownCategory(_) => "unknown_category",
            Self::InvalidRadius => "invalid_radius",
        }
    }
}

/// Unvalidated request form.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDraft {
    pub category: String,
    pub part_name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub preferred_company: Option<String>,
    pub area: SearchArea,
    pub area_city: Option<String>,
    pub area_state: Option<String>,
    pub location: Option<Coordinates>,
    pub vendor_preference: VendorPreference,
}

impl RequestDraft {
    /// Validate the form and build an open request.
    pub fn into_request(
        self,
        id: RequestId,
        requester: Requester,
        now: DateTime<Utc>,
    ) -> Result<PartRequest, RequestDraftError> {
        let part_name = required(self.part_name).ok_or(RequestDraftError::MissingPartName)?;
        let description = required(self.description).ok_or(RequestDraftError::MissingDescription)?;
        let category = PartCategory::parse(&self.category)
            .map_err(|_| RequestDraftError::UnknownCategory(self.category.clone()))?;
        let area_city = self.area_city.and_then(required);
        let area_state = self.area_state.and_then(required);
        match self.area {
            SearchArea::Radius { km } if !km.is_finite() || km < 0.0 => {
                return Err(RequestDraftError::InvalidRadius);
            }
            SearchArea::City if area_city.is_none() => return Err(RequestDraftError::MissingCity),
            SearchArea::State if area_state.is_none() => {
                return Err(RequestDraftError::MissingState);
            }
            _ => {}
        }
        Ok(PartRequest {
            id,
            requester,
            category,
            part_name,
            description,
            image_url: self.image_url.and_then(required),
            preferred_company: self.preferred_company.and_then(required),
            area: self.area,
            area_city,
            area_state,
            location: self.location,
            vendor_preference: self.vendor_preference,
            status: RequestStatus::Open,
            created_at: now,
            closed_at: None,
        })
    }
}

fn required(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
