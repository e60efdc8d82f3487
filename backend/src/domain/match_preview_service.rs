//! Live vendor-count preview for a request being composed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    MatchPreview, MatchPreviewQuery, ProfileRepository, ProfileRepositoryError,
};
use crate::domain::{Counterpart, ProfileId, SearchScope, count_matches};

/// Load every vendor as a matching counterpart.
pub(crate) async fn load_counterparts<P>(
    profiles: &P,
) -> Result<Vec<Counterpart>, ProfileRepositoryError>
where
    P: ProfileRepository + ?Sized,
{
    let vendors = profiles.list_vendors().await?;
    Ok(vendors.iter().map(Counterpart::from).collect())
}

/// Preview service implementing [`MatchPreviewQuery`].
#[derive(Clone)]
pub struct MatchPreviewService<P: ?Sized> {
    profiles: Arc<P>,
}

impl<P: ?Sized> MatchPreviewService<P> {
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl<P: ?Sized> MatchPreviewQuery for MatchPreviewService<P>
where
    P: ProfileRepository,
{
    async fn preview(&self, caller: &ProfileId, scope: &SearchScope) -> MatchPreview {
        match load_counterparts(self.profiles.as_ref()).await {
            Ok(population) => MatchPreview::Known {
                counts: count_matches(scope, &population, Some(*caller)),
            },
            Err(error) => {
                warn!(%error, "vendor population unavailable; preview count unknown");
                MatchPreview::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockProfileRepository;
    use crate::domain::{Coordinates, MatchCounts, Profile, Role};

    fn vendor_at(lat: f64, lng: f64, authorised: bool) -> Profile {
        let mut profile = Profile::new(ProfileId::random(), "v@example.com", "Vendor", Role::Vendor);
        profile.location = Coordinates::new(lat, lng).ok();
        profile.authorized_dealer = authorised;
        profile
    }

    #[tokio::test]
    async fn counts_vendors_excluding_the_caller() {
        let me = vendor_at(19.07, 72.87, true);
        let caller = me.id;
        let population = vec![me, vendor_at(19.08, 72.88, true), vendor_at(19.09, 72.87, false)];
        let mut repo = MockProfileRepository::new();
        repo.expect_list_vendors()
            .times(1)
            .return_once(move || Ok(population));
        let service = MatchPreviewService::new(Arc::new(repo));

        let preview = service.preview(&caller, &SearchScope::Country).await;

        assert_eq!(
            preview,
            MatchPreview::Known {
                counts: MatchCounts {
                    all: 2,
                    authorised: 1,
                    local: 1
                }
            }
        );
    }

    #[tokio::test]
    async fn unavailable_population_degrades_to_unknown() {
        let mut repo = MockProfileRepository::new();
        repo.expect_list_vendors()
            .times(1)
            .return_once(|| Err(ProfileRepositoryError::connection("refused")));
        let service = MatchPreviewService::new(Arc::new(repo));

        let preview = service
            .preview(&ProfileId::random(), &SearchScope::Country)
            .await;

        assert_eq!(preview, MatchPreview::Unknown);
    }
}
