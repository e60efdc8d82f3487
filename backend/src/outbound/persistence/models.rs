//! Internal Diesel row structs and their conversions to domain values.
//!
//! Rows never leave the persistence layer. Decoding is fallible because
//! text columns carry enum names; a bad value is reported as a reason string
//! and turned into a port error by the calling repository.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Coordinates, NewNotification, Notification, NotificationId, PartCategory, PartRequest,
    PartResponse, Profile, ProfileId, RequestId, RequestStatus, Requester, ResponseId,
    ResponseStatus, Role, SearchArea, VendorPreference,
};

use super::schema::{notifications, profiles, request_responses, requests};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub business_name: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub authorized_dealer: bool,
    pub companies: Vec<String>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = String;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(|err| err.to_string())?;
        Ok(Self {
            id: ProfileId::from_uuid(row.id),
            email: row.email,
            full_name: row.full_name,
            phone: row.phone,
            role,
            business_name: row.business_name,
            category: row.category,
            city: row.city,
            state: row.state,
            // Out-of-range pairs are treated as "no location".
            location: Coordinates::from_parts(row.latitude, row.longitude),
            authorized_dealer: row.authorized_dealer,
            companies: row.companies,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: &'a str,
    pub business_name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub authorized_dealer: bool,
    pub companies: &'a [String],
}

impl<'a> From<&'a Profile> for NewProfileRow<'a> {
    fn from(profile: &'a Profile) -> Self {
        let ProfileChanges {
            full_name,
            phone,
            business_name,
            category,
            city,
            state,
            latitude,
            longitude,
            authorized_dealer,
            companies,
        } = ProfileChanges::from(profile);
        Self {
            id: *profile.id.as_uuid(),
            email: &profile.email,
            full_name,
            phone,
            role: profile.role.as_str(),
            business_name,
            category,
            city,
            state,
            latitude,
            longitude,
            authorized_dealer,
            companies,
        }
    }
}

/// Editable profile columns. `None` writes NULL so cleared fields stick.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = profiles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileChanges<'a> {
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub business_name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub authorized_dealer: bool,
    pub companies: &'a [String],
}

impl<'a> From<&'a Profile> for ProfileChanges<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            full_name: &profile.full_name,
            phone: profile.phone.as_deref(),
            business_name: profile.business_name.as_deref(),
            category: profile.category.as_deref(),
            city: profile.city.as_deref(),
            state: profile.state.as_deref(),
            latitude: profile.location.map(|at| at.latitude()),
            longitude: profile.location.map(|at| at.longitude()),
            authorized_dealer: profile.authorized_dealer,
            companies: &profile.companies,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RequestRow {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub category: String,
    pub part_name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub preferred_company: Option<String>,
    pub area_scope: String,
    pub area_radius: Option<f64>,
    pub area_city: Option<String>,
    pub area_state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub vendor_preference: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl TryFrom<RequestRow> for PartRequest {
    type Error = String;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let requester = Requester::from_columns(
            row.client_id.map(ProfileId::from_uuid),
            row.vendor_id.map(ProfileId::from_uuid),
        )
        .ok_or_else(|| "requester must be exactly one of client or vendor".to_owned())?;
        let category = PartCategory::parse(&row.category).map_err(|err| err.to_string())?;
        let area = SearchArea::from_columns(&row.area_scope, row.area_radius)
            .map_err(|err| err.to_string())?;
        Ok(Self {
            id: RequestId::from_uuid(row.id),
            requester,
            category,
            part_name: row.part_name,
            description: row.description,
            image_url: row.image_url,
            preferred_company: row.preferred_company,
            area,
            area_city: row.area_city,
            area_state: row.area_state,
            location: Coordinates::from_parts(row.latitude, row.longitude),
            vendor_preference: row
                .vendor_preference
                .parse::<VendorPreference>()
                .map_err(|err| err.to_string())?,
            status: row
                .status
                .parse::<RequestStatus>()
                .map_err(|err| err.to_string())?,
            created_at: row.created_at,
            closed_at: row.closed_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = requests)]
pub(crate) struct NewRequestRow<'a> {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub category: &'a str,
    pub part_name: &'a str,
    pub description: &'a str,
    pub image_url: Option<&'a str>,
    pub preferred_company: Option<&'a str>,
    pub area_scope: &'a str,
    pub area_radius: Option<f64>,
    pub area_city: Option<&'a str>,
    pub area_state: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub vendor_preference: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a PartRequest> for NewRequestRow<'a> {
    fn from(request: &'a PartRequest) -> Self {
        Self {
            id: *request.id.as_uuid(),
            client_id: request.requester.client_id().map(|id| *id.as_uuid()),
            vendor_id: request.requester.vendor_id().map(|id| *id.as_uuid()),
            category: request.category.leaf(),
            part_name: &request.part_name,
            description: &request.description,
            image_url: request.image_url.as_deref(),
            preferred_company: request.preferred_company.as_deref(),
            area_scope: request.area.scope_name(),
            area_radius: request.area.radius_km(),
            area_city: request.area_city.as_deref(),
            area_state: request.area_state.as_deref(),
            latitude: request.location.map(|at| at.latitude()),
            longitude: request.location.map(|at| at.longitude()),
            vendor_preference: request.vendor_preference.as_str(),
            status: request.status.as_str(),
            created_at: request.created_at,
            closed_at: request.closed_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = request_responses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ResponseRow {
    pub id: Uuid,
    pub request_id: Uuid,
    pub vendor_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ResponseRow> for PartResponse {
    type Error = String;

    fn try_from(row: ResponseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ResponseId::from_uuid(row.id),
            request_id: RequestId::from_uuid(row.request_id),
            vendor_id: ProfileId::from_uuid(row.vendor_id),
            status: row
                .status
                .parse::<ResponseStatus>()
                .map_err(|err| err.to_string())?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = request_responses)]
pub(crate) struct NewResponseRow<'a> {
    pub id: Uuid,
    pub request_id: Uuid,
    pub vendor_id: Uuid,
    pub status: &'a str,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub responder_id: Option<Uuid>,
    pub request_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: NotificationId::from_uuid(row.id),
            vendor_id: row.vendor_id.map(ProfileId::from_uuid),
            client_id: row.client_id.map(ProfileId::from_uuid),
            responder_id: row.responder_id.map(ProfileId::from_uuid),
            request_id: RequestId::from_uuid(row.request_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow {
    pub id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub responder_id: Option<Uuid>,
    pub request_id: Uuid,
}

impl NewNotificationRow {
    pub fn fresh(row: &NewNotification) -> Self {
        Self {
            id: *NotificationId::random().as_uuid(),
            vendor_id: row.vendor_id.map(|id| *id.as_uuid()),
            client_id: row.client_id.map(|id| *id.as_uuid()),
            responder_id: row.responder_id.map(|id| *id.as_uuid()),
            request_id: *row.request_id.as_uuid(),
        }
    }
}
