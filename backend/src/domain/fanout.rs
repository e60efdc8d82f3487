//! Notification fan-out for request creation, closure and responses.
//!
//! Fan-out runs after the primary write has committed. It never fails the
//! caller: every error is logged and reported as zero rows inserted.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::match_preview_service::load_counterparts;
use crate::domain::ports::{NotificationRepository, ProfileRepository, ResponseRepository};
use crate::domain::{
    NewNotification, PartRequest, ProfileId, Requester, ResponseStatus, resolve_targets,
};

/// How many counterparts a fan-out addressed and how many rows landed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanoutReport {
    pub targeted: usize,
    pub inserted: usize,
}

impl FanoutReport {
    fn failed(targeted: usize) -> Self {
        Self {
            targeted,
            inserted: 0,
        }
    }
}

/// Builds and inserts notification rows.
pub struct FanoutNotifier<P: ?Sized, S: ?Sized, N: ?Sized> {
    profiles: Arc<P>,
    responses: Arc<S>,
    notifications: Arc<N>,
}

impl<P: ?Sized, S: ?Sized, N: ?Sized> Clone for FanoutNotifier<P, S, N> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
            responses: Arc::clone(&self.responses),
            notifications: Arc::clone(&self.notifications),
        }
    }
}

impl<P: ?Sized, S: ?Sized, N: ?Sized> FanoutNotifier<P, S, N>
where
    P: ProfileRepository,
    S: ResponseRepository,
    N: NotificationRepository,
{
    pub fn new(profiles: Arc<P>, responses: Arc<S>, notifications: Arc<N>) -> Self {
        Self {
            profiles,
            responses,
            notifications,
        }
    }

    /// Notify every vendor matched by a newly posted request.
    ///
    /// A vendor requester is never notified of its own request.
    pub async fn notify_request_created(&self, request: &PartRequest) -> FanoutReport {
        let population = match load_counterparts(self.profiles.as_ref()).await {
            Ok(population) => population,
            Err(error) => {
                warn!(request_id = %request.id, %error, "fan-out skipped: vendor population unavailable");
                return FanoutReport::default();
            }
        };
        let exclude = request.requester.vendor_id();
        let targets = resolve_targets(
            &request.scope(),
            request.vendor_preference,
            &population,
            exclude,
        );
        let rows: Vec<NewNotification> = targets
            .into_iter()
            .map(|vendor| NewNotification::to_vendor(vendor, request.id))
            .collect();
        self.insert(request, "created", rows).await
    }

    /// Notify every vendor whose response to the request is accepted.
    pub async fn notify_request_closed(&self, request: &PartRequest) -> FanoutReport {
        let accepted = match self.responses.accepted_vendors(&request.id).await {
            Ok(accepted) => accepted,
            Err(error) => {
                warn!(request_id = %request.id, %error, "closure fan-out skipped: responses unavailable");
                return FanoutReport::default();
            }
        };
        let mut rows: Vec<NewNotification> = Vec::with_capacity(accepted.len());
        for vendor in accepted {
            let row = NewNotification::to_vendor(vendor, request.id);
            if !rows.contains(&row) {
                rows.push(row);
            }
        }
        self.insert(request, "closed", rows).await
    }

    /// Tell the requester that `responder` reacted to their request.
    pub async fn notify_response(
        &self,
        request: &PartRequest,
        responder: ProfileId,
        status: ResponseStatus,
    ) -> FanoutReport {
        let row = match request.requester {
            Requester::Client(client) => NewNotification::to_client(client, responder, request.id),
            Requester::Vendor(vendor) => {
                NewNotification::to_vendor_requester(vendor, responder, request.id)
            }
        };
        debug!(request_id = %request.id, status = status.as_str(), "notifying requester of response");
        self.insert(request, "response", vec![row]).await
    }

    async fn insert(
        &self,
        request: &PartRequest,
        event: &'static str,
        rows: Vec<NewNotification>,
    ) -> FanoutReport {
        let targeted = rows.len();
        if rows.is_empty() {
            info!(request_id = %request.id, event, "fan-out matched nobody");
            return FanoutReport::default();
        }
        match self.notifications.insert_many(&rows).await {
            Ok(stored) => {
                info!(request_id = %request.id, event, targeted, inserted = stored.len(), "fan-out complete");
                FanoutReport {
                    targeted,
                    inserted: stored.len(),
                }
            }
            Err(error) => {
                warn!(request_id = %request.id, event, targeted, %error, "fan-out insert failed");
                FanoutReport::failed(targeted)
            }
        }
    }
}

#[cfg(test)]
#[path = "fanout_tests.rs"]
mod tests;
