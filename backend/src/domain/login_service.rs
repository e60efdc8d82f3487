//! Login service backed by the hosted identity provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{IdentityProvider, LoginService};
use crate::domain::{Error, LoginCredentials, ProfileId};

/// [`LoginService`] delegating to an [`IdentityProvider`].
#[derive(Clone)]
pub struct ProviderLoginService<I: ?Sized> {
    provider: Arc<I>,
}

impl<I: ?Sized> ProviderLoginService<I> {
    pub fn new(provider: Arc<I>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<I: ?Sized> LoginService for ProviderLoginService<I>
where
    I: IdentityProvider,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<ProfileId, Error> {
        match self.provider.sign_in(credentials).await {
            Ok(id) => {
                info!(profile_id = %id, "signed in");
                Ok(id)
            }
            Err(error) => {
                warn!(%error, "sign-in failed");
                Err(error.into())
            }
        }
    }
}
