//! Driving port for the live "vendors in range" preview.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{MatchCounts, ProfileId, SearchScope, VendorPreference};

/// Preview shown while a request is being composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MatchPreview {
    /// Counts computed from the current vendor population.
    Known { counts: MatchCounts },
    /// The population could not be loaded; submission is still allowed.
    Unknown,
}

impl MatchPreview {
    /// Whether the requester should confirm before posting a request that
    /// would reach nobody.
    ///
    /// # Examples
    /// ```
    /// use partfinder::domain::{MatchCounts, VendorPreference};
    /// use partfinder::domain::ports::MatchPreview;
    ///
    /// let preview = MatchPreview::Known {
    ///     counts: MatchCounts { all: 2, authorised: 0, local: 2 },
    /// };
    /// assert!(preview.requires_confirmation(VendorPreference::Authorised));
    /// assert!(!preview.requires_confirmation(VendorPreference::All));
    /// assert!(!MatchPreview::Unknown.requires_confirmation(VendorPreference::All));
    /// ```
    pub fn requires_confirmation(&self, preference: VendorPreference) -> bool {
        match self {
            Self::Known { counts } => counts.for_preference(preference) == 0,
            Self::Unknown => false,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchPreviewQuery: Send + Sync {
    /// Count vendors `caller` would reach with `scope`, excluding the caller.
    async fn preview(&self, caller: &ProfileId, scope: &SearchScope) -> MatchPreview;
}

/// Preview that never knows the population.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMatchPreviewQuery;

#[async_trait]
impl MatchPreviewQuery for FixtureMatchPreviewQuery {
    async fn preview(&self, _caller: &ProfileId, _scope: &SearchScope) -> MatchPreview {
        MatchPreview::Unknown
    }
}
