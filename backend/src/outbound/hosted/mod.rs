//! Adapters for the hosted auth and storage service.
//!
//! Both speak plain HTTPS with the project's anon key, so they share one
//! [`HostedService`] describing where the service lives.

mod identity;
mod storage;

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Url};
use zeroize::Zeroizing;

pub use identity::HostedIdentityProvider;
pub use storage::{DEFAULT_IMAGE_BUCKET, HostedBlobStore};

pub const DEFAULT_HOSTED_TIMEOUT: Duration = Duration::from_secs(10);

/// Location and credentials of the hosted service.
#[derive(Clone)]
pub struct HostedService {
    base: Url,
    anon_key: Zeroizing<String>,
    client: Client,
}

impl fmt::Debug for HostedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostedService")
            .field("base", &self.base.as_str())
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

impl HostedService {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, anon_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base,
            anon_key: Zeroizing::new(anon_key.to_owned()),
            client,
        })
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base.join(path)
    }

    pub(crate) fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}
