//! Driving port for signing in.
//!
//! Handlers depend on this port rather than the identity provider so tests
//! can substitute a double without any network.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, ProfileId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the signed-in profile id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<ProfileId, Error>;
}
