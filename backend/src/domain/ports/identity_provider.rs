//! Port for the hosted identity service.
//!
//! The provider owns passwords; this service only learns the profile id of
//! a successful sign-in or sign-up and keeps it in the session cookie.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{Error, LoginCredentials, ProfileId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// Email and password did not match an account.
        InvalidCredentials => "invalid credentials",
        /// An account already exists for the email address.
        EmailTaken => "email already registered",
        /// The identity service could not be reached.
        Connection { message: String } =>
            "identity provider connection failed: {message}",
        /// The identity service answered with something unusable.
        Protocol { message: String } =>
            "identity provider protocol error: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for the account's profile id.
    async fn sign_in(&self, credentials: &LoginCredentials)
    -> Result<ProfileId, IdentityProviderError>;

    /// Create an account and return its new profile id.
    async fn sign_up(&self, credentials: &LoginCredentials)
    -> Result<ProfileId, IdentityProviderError>;

    /// Replace the account's password. `credentials` must carry the
    /// current one.
    async fn update_password(
        &self,
        credentials: &LoginCredentials,
        new_password: &str,
    ) -> Result<(), IdentityProviderError>;
}

/// Development provider: `demo@partfinder.test` / `password` signs in as a
/// fixed profile, anything else is rejected. Sign-ups mint a fresh id for
/// any other address.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

/// Profile id returned by [`FixtureIdentityProvider`].
pub const FIXTURE_PROFILE_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

const FIXTURE_EMAIL: &str = "demo@partfinder.test";

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<ProfileId, IdentityProviderError> {
        if credentials.email() == FIXTURE_EMAIL && credentials.password() == "password" {
            ProfileId::new(FIXTURE_PROFILE_ID)
                .map_err(|err| IdentityProviderError::protocol(err.to_string()))
        } else {
            Err(IdentityProviderError::invalid_credentials())
        }
    }

    async fn sign_up(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<ProfileId, IdentityProviderError> {
        if credentials.email() == FIXTURE_EMAIL {
            Err(IdentityProviderError::email_taken())
        } else {
            Ok(ProfileId::random())
        }
    }

    async fn update_password(
        &self,
        credentials: &LoginCredentials,
        _new_password: &str,
    ) -> Result<(), IdentityProviderError> {
        self.sign_in(credentials).await.map(|_| ())
    }
}

impl From<IdentityProviderError> for Error {
    fn from(err: IdentityProviderError) -> Self {
        match err {
            IdentityProviderError::InvalidCredentials => Error::unauthorized("invalid credentials"),
            IdentityProviderError::EmailTaken => Error::conflict("email already registered")
                .with_details(json!({ "field": "email", "code": "already_registered" })),
            IdentityProviderError::Connection { message } => {
                Error::service_unavailable(format!("identity provider unavailable: {message}"))
            }
            IdentityProviderError::Protocol { message } => {
                Error::internal(format!("identity provider error: {message}"))
            }
        }
    }
}
