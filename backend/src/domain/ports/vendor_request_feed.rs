//! Driving port listing the client requests a vendor can act on.

use async_trait::async_trait;

use crate::domain::{Error, PartRequest, ProfileId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VendorRequestFeed: Send + Sync {
    /// Open client requests visible to `vendor`, newest first.
    async fn feed(&self, vendor: &ProfileId) -> Result<Vec<PartRequest>, Error>;
}

/// Feed with nothing in it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVendorRequestFeed;

#[async_trait]
impl VendorRequestFeed for FixtureVendorRequestFeed {
    async fn feed(&self, _vendor: &ProfileId) -> Result<Vec<PartRequest>, Error> {
        Ok(Vec::new())
    }
}
