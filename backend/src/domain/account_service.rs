//! Account management implementing [`AccountCommand`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{AccountCommand, IdentityProvider, IdentityProviderError, ProfileRepository};
use crate::domain::{
    Error, LoginCredentials, PasswordChange, Profile, ProfileId, ProfileUpdate, Registration,
};

/// Creates accounts through the identity provider and keeps their profile
/// rows in step.
pub struct AccountService<I: ?Sized, P: ?Sized> {
    identity: Arc<I>,
    profiles: Arc<P>,
}

impl<I: ?Sized, P: ?Sized> Clone for AccountService<I, P> {
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
            profiles: Arc::clone(&self.profiles),
        }
    }
}

impl<I: ?Sized, P: ?Sized> AccountService<I, P> {
    pub fn new(identity: Arc<I>, profiles: Arc<P>) -> Self {
        Self { identity, profiles }
    }
}

fn incorrect_current_password() -> Error {
    Error::invalid_request("current password is incorrect").with_details(json!({
        "field": "currentPassword",
        "code": "incorrect",
    }))
}

impl<I: ?Sized, P: ?Sized> AccountService<I, P>
where
    P: ProfileRepository,
{
    async fn stored_profile(&self, id: &ProfileId) -> Result<Profile, Error> {
        self.profiles
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("profile not found"))
    }
}

#[async_trait]
impl<I: ?Sized, P: ?Sized> AccountCommand for AccountService<I, P>
where
    I: IdentityProvider,
    P: ProfileRepository,
{
    async fn sign_up(&self, registration: Registration) -> Result<Profile, Error> {
        let valid = registration.validate()?;
        let id = self
            .identity
            .sign_up(valid.credentials())
            .await
            .inspect_err(|error| warn!(%error, "sign-up refused"))?;
        let profile = valid.into_profile(id);
        if self.profiles.insert(&profile).await? {
            info!(profile_id = %id, role = %profile.role, "account created");
            return Ok(profile);
        }
        // The hosted service may create the row itself on sign-up.
        warn!(profile_id = %id, "profile row already present after sign-up");
        self.stored_profile(&id).await
    }

    async fn profile(&self, caller: &ProfileId) -> Result<Profile, Error> {
        self.stored_profile(caller).await
    }

    async fn update_profile(
        &self,
        caller: &ProfileId,
        update: ProfileUpdate,
    ) -> Result<Profile, Error> {
        let current = self.stored_profile(caller).await?;
        let next = update.apply_to(&current)?;
        if !self.profiles.update_details(&next).await? {
            return Err(Error::not_found("profile not found"));
        }
        info!(profile_id = %caller, "profile updated");
        Ok(next)
    }

    async fn change_password(
        &self,
        caller: &ProfileId,
        change: PasswordChange,
    ) -> Result<(), Error> {
        let profile = self.stored_profile(caller).await?;
        // A current password too short to be valid cannot be the right one.
        let credentials = LoginCredentials::try_from_parts(&profile.email, change.current())
            .map_err(|_| incorrect_current_password())?;
        match self
            .identity
            .update_password(&credentials, change.replacement())
            .await
        {
            Ok(()) => {
                info!(profile_id = %caller, "password changed");
                Ok(())
            }
            Err(IdentityProviderError::InvalidCredentials) => Err(incorrect_current_password()),
            Err(error) => {
                warn!(%error, "password change failed");
                Err(error.into())
            }
        }
    }
}
