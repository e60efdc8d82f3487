//! Driving port for account management: sign-up, profile edits and
//! password changes.

use async_trait::async_trait;

use crate::domain::{Error, PasswordChange, Profile, ProfileId, ProfileUpdate, Registration};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create the account and its profile row.
    async fn sign_up(&self, registration: Registration) -> Result<Profile, Error>;

    async fn profile(&self, caller: &ProfileId) -> Result<Profile, Error>;

    /// Apply `update` to the caller's profile and return the stored result.
    async fn update_profile(
        &self,
        caller: &ProfileId,
        update: ProfileUpdate,
    ) -> Result<Profile, Error>;

    /// Replace the caller's password after checking the current one.
    async fn change_password(
        &self,
        caller: &ProfileId,
        change: PasswordChange,
    ) -> Result<(), Error>;
}

/// Accepts well-formed sign-ups and knows no stored profiles.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountCommand;

#[async_trait]
impl AccountCommand for FixtureAccountCommand {
    async fn sign_up(&self, registration: Registration) -> Result<Profile, Error> {
        Ok(registration.validate()?.into_profile(ProfileId::random()))
    }

    async fn profile(&self, _caller: &ProfileId) -> Result<Profile, Error> {
        Err(Error::not_found("profile not found"))
    }

    async fn update_profile(
        &self,
        _caller: &ProfileId,
        _update: ProfileUpdate,
    ) -> Result<Profile, Error> {
        Err(Error::not_found("profile not found"))
    }

    async fn change_password(
        &self,
        _caller: &ProfileId,
        _change: PasswordChange,
    ) -> Result<(), Error> {
        Err(Error::not_found("profile not found"))
    }
}
