//! Builders shared by domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{
    Coordinates, PartCategory, PartRequest, PartResponse, Profile, ProfileId, RequestId,
    RequestStatus, Requester, ResponseId, ResponseStatus, Role, SearchArea, VendorPreference,
};

pub(crate) const MUMBAI: (f64, f64) = (19.0760, 72.8777);

pub(crate) fn at((lat, lng): (f64, f64)) -> Coordinates {
    Coordinates::new(lat, lng).expect("valid fixture coordinates")
}

pub(crate) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn client(name: &str) -> Profile {
    Profile::new(ProfileId::random(), "client@example.com", name, Role::Client)
}

pub(crate) fn vendor(name: &str, position: Option<(f64, f64)>, authorised: bool) -> Profile {
    let mut profile = Profile::new(ProfileId::random(), "vendor@example.com", name, Role::Vendor);
    profile.location = position.map(at);
    profile.authorized_dealer = authorised;
    profile.phone = Some("+91 98200 00000".into());
    profile
}

/// Vendor with every field a profile edit requires.
pub(crate) fn listed_vendor() -> Profile {
    let mut profile = vendor("Ravi", Some(MUMBAI), false);
    profile.business_name = Some("Ravi Motors".into());
    profile.category = Some("Brakes".into());
    profile.city = Some("Mumbai".into());
    profile.state = Some("Maharashtra".into());
    profile
}

pub(crate) fn open_request(requester: Requester, area: SearchArea) -> PartRequest {
    PartRequest {
        id: RequestId::random(),
        requester,
        category: PartCategory::default(),
        part_name: "Brake pads".into(),
        description: "Front pads".into(),
        image_url: None,
        preferred_company: None,
        area,
        area_city: Some("Mumbai".into()),
        area_state: Some("Maharashtra".into()),
        location: Some(at(MUMBAI)),
        vendor_preference: VendorPreference::All,
        status: RequestStatus::Open,
        created_at: fixed_time(),
        closed_at: None,
    }
}

pub(crate) fn response(
    request_id: RequestId,
    vendor_id: ProfileId,
    status: ResponseStatus,
) -> PartResponse {
    PartResponse {
        id: ResponseId::random(),
        request_id,
        vendor_id,
        status,
        created_at: fixed_time(),
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_time()))
}
