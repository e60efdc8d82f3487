//! Driving port for a user's own requests and the responses they drew.

use async_trait::async_trait;

use crate::domain::{Error, ProfileId, RequestHistoryEntry};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestHistoryQuery: Send + Sync {
    /// Requests `caller` posted, newest first, each with its responses.
    async fn my_requests(&self, caller: &ProfileId) -> Result<Vec<RequestHistoryEntry>, Error>;
}

/// History with nothing in it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRequestHistoryQuery;

#[async_trait]
impl RequestHistoryQuery for FixtureRequestHistoryQuery {
    async fn my_requests(&self, _caller: &ProfileId) -> Result<Vec<RequestHistoryEntry>, Error> {
        Ok(Vec::new())
    }
}
