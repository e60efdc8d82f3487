//! Vendor dashboard feed implementing [`VendorRequestFeed`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{ProfileRepository, RequestRepository, VendorRequestFeed};
use crate::domain::{Counterpart, Error, PartRequest, ProfileId, request_visible_to_vendor};

/// Lists open client requests that fall inside a vendor's area.
pub struct RequestFeedService<P: ?Sized, R: ?Sized> {
    profiles: Arc<P>,
    requests: Arc<R>,
}

impl<P: ?Sized, R: ?Sized> Clone for RequestFeedService<P, R> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
            requests: Arc::clone(&self.requests),
        }
    }
}

impl<P: ?Sized, R: ?Sized> RequestFeedService<P, R> {
    pub fn new(profiles: Arc<P>, requests: Arc<R>) -> Self {
        Self { profiles, requests }
    }
}

#[async_trait]
impl<P: ?Sized, R: ?Sized> VendorRequestFeed for RequestFeedService<P, R>
where
    P: ProfileRepository,
    R: RequestRepository,
{
    async fn feed(&self, vendor: &ProfileId) -> Result<Vec<PartRequest>, Error> {
        let profile = self
            .profiles
            .find_by_id(vendor)
            .await?
            .ok_or_else(|| Error::not_found("profile not found"))?;
        if !profile.is_vendor() {
            return Err(Error::forbidden("only vendors have a request feed"));
        }
        let me = Counterpart::from(&profile);

        let open = self
            .requests
            .list_open_client_requests()
            .await?;
        let total = open.len();
        let mut visible: Vec<PartRequest> = open
            .into_iter()
            .filter(|request| request_visible_to_vendor(request, &me))
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(vendor_id = %vendor, total, visible = visible.len(), "vendor feed filtered");
        Ok(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockProfileRepository, MockRequestRepository, RequestRepositoryError};
    use crate::domain::test_fixtures::{MUMBAI, client, fixed_time, open_request, vendor};
    use crate::domain::{ErrorCode, Requester, SearchArea};
    use chrono::Duration;
    use mockall::predicate::eq;

    fn service(
        profiles: MockProfileRepository,
        requests: MockRequestRepository,
    ) -> RequestFeedService<MockProfileRepository, MockRequestRepository> {
        RequestFeedService::new(Arc::new(profiles), Arc::new(requests))
    }

    fn profiles_with(profile: crate::domain::Profile) -> MockProfileRepository {
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_id()
            .with(eq(profile.id))
            .times(1)
            .return_once(move |_| Ok(Some(profile)));
        repo
    }

    #[tokio::test]
    async fn lists_nearby_requests_newest_first() {
        let me = vendor("Near", Some(MUMBAI), false);
        let id = me.id;
        let older = open_request(Requester::Client(ProfileId::random()), SearchArea::Radius { km: 10.0 });
        let mut newer = open_request(Requester::Client(ProfileId::random()), SearchArea::Radius { km: 10.0 });
        newer.created_at = fixed_time() + Duration::minutes(5);
        let mut remote = open_request(Requester::Client(ProfileId::random()), SearchArea::City);
        remote.area_city = Some("Delhi".into());
        remote.area_state = Some("Delhi".into());
        let expected = vec![newer.id, older.id];

        let mut requests = MockRequestRepository::new();
        requests
            .expect_list_open_client_requests()
            .times(1)
            .return_once(move || Ok(vec![older, remote, newer]));

        let feed = service(profiles_with(me), requests)
            .feed(&id)
            .await
            .expect("feed loads");

        assert_eq!(feed.iter().map(|r| r.id).collect::<Vec<_>>(), expected);
    }

    #[tokio::test]
    async fn clients_have_no_feed() {
        let asha = client("Asha");
        let id = asha.id;
        let mut requests = MockRequestRepository::new();
        requests.expect_list_open_client_requests().never();

        let err = service(profiles_with(asha), requests)
            .feed(&id)
            .await
            .expect_err("clients refused");

        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let err = service(profiles, MockRequestRepository::new())
            .feed(&ProfileId::random())
            .await
            .expect_err("no profile");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn request_store_outage_is_unavailable() {
        let me = vendor("Near", Some(MUMBAI), false);
        let id = me.id;
        let mut requests = MockRequestRepository::new();
        requests
            .expect_list_open_client_requests()
            .times(1)
            .return_once(|| Err(RequestRepositoryError::connection("refused")));

        let err = service(profiles_with(me), requests)
            .feed(&id)
            .await
            .expect_err("outage");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
