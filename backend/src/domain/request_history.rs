//! A user's own requests with the responses they drew.
//!
//! Clients and vendors both post requests, so both get the same history.
//! Each response carries the responding vendor's contact details.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{
    ProfileRepository, RequestHistoryQuery, RequestRepository, ResponseRepository,
};
use crate::domain::{
    Coordinates, Error, PartRequest, PartResponse, Profile, ProfileId, RequestId, Requester, Role,
};

/// What a requester sees of a vendor who responded. Email stays private.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorContact {
    pub id: ProfileId,
    pub full_name: String,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub location: Option<Coordinates>,
    pub authorized_dealer: bool,
    pub companies: Vec<String>,
}

impl From<Profile> for VendorContact {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name,
            business_name: profile.business_name,
            phone: profile.phone,
            city: profile.city,
            category: profile.category,
            location: profile.location,
            authorized_dealer: profile.authorized_dealer,
            companies: profile.companies,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondedVendor {
    #[serde(flatten)]
    pub response: PartResponse,
    /// `None` when the vendor's profile has since been removed.
    pub vendor: Option<VendorContact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHistoryEntry {
    #[serde(flatten)]
    pub request: PartRequest,
    /// Newest first.
    pub responses: Vec<RespondedVendor>,
}

/// Assembles [`RequestHistoryEntry`] lists from the three repositories.
pub struct RequestHistoryService<P: ?Sized, R: ?Sized, S: ?Sized> {
    profiles: Arc<P>,
    requests: Arc<R>,
    responses: Arc<S>,
}

impl<P: ?Sized, R: ?Sized, S: ?Sized> Clone for RequestHistoryService<P, R, S> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
            requests: Arc::clone(&self.requests),
            responses: Arc::clone(&self.responses),
        }
    }
}

impl<P: ?Sized, R: ?Sized, S: ?Sized> RequestHistoryService<P, R, S> {
    pub fn new(profiles: Arc<P>, requests: Arc<R>, responses: Arc<S>) -> Self {
        Self {
            profiles,
            requests,
            responses,
        }
    }
}

#[async_trait]
impl<P: ?Sized, R: ?Sized, S: ?Sized> RequestHistoryQuery for RequestHistoryService<P, R, S>
where
    P: ProfileRepository,
    R: RequestRepository,
    S: ResponseRepository,
{
    async fn my_requests(&self, caller: &ProfileId) -> Result<Vec<RequestHistoryEntry>, Error> {
        let profile = self
            .profiles
            .find_by_id(caller)
            .await?
            .ok_or_else(|| Error::not_found("profile not found"))?;
        let requester = match profile.role {
            Role::Client => Requester::Client(profile.id),
            Role::Vendor => Requester::Vendor(profile.id),
            Role::Admin => return Err(Error::forbidden("administrators do not post requests")),
        };

        let mut requests = self.requests.list_by_requester(&requester).await?;
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let ids: Vec<RequestId> = requests.iter().map(|r| r.id).collect();
        let responses = self.responses.list_for_requests(&ids).await?;

        let vendor_ids: Vec<ProfileId> = responses
            .iter()
            .map(|r| r.vendor_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let vendors: HashMap<ProfileId, VendorContact> = self
            .profiles
            .find_many(&vendor_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, VendorContact::from(p)))
            .collect();

        let mut by_request: HashMap<RequestId, Vec<RespondedVendor>> = HashMap::new();
        for response in responses {
            let vendor = vendors.get(&response.vendor_id).cloned();
            by_request
                .entry(response.request_id)
                .or_default()
                .push(RespondedVendor { response, vendor });
        }

        let history: Vec<RequestHistoryEntry> = requests
            .into_iter()
            .map(|request| {
                let mut responses = by_request.remove(&request.id).unwrap_or_default();
                responses.sort_by(|a, b| b.response.created_at.cmp(&a.response.created_at));
                RequestHistoryEntry { request, responses }
            })
            .collect();
        debug!(profile_id = %caller, requests = history.len(), "request history loaded");
        Ok(history)
    }
}
