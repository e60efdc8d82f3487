//! Password sign-in, sign-up and password changes against the hosted auth
//! service.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::HostedService;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{LoginCredentials, ProfileId};

const TOKEN_PATH: &str = "auth/v1/token?grant_type=password";
const SIGN_UP_PATH: &str = "auth/v1/signup";
const USER_PATH: &str = "auth/v1/user";

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PasswordUpdate<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

/// Sign-up answers with a session when accounts are confirmed automatically
/// and with the bare user otherwise.
#[derive(Deserialize)]
struct SignUpResponse {
    id: Option<String>,
    user: Option<TokenUser>,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
}

pub struct HostedIdentityProvider {
    service: HostedService,
}

impl HostedIdentityProvider {
    pub fn new(service: HostedService) -> Self {
        Self { service }
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::connection(error.to_string())
}

fn map_status_error(status: StatusCode) -> IdentityProviderError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
            IdentityProviderError::invalid_credentials()
        }
        status if status.is_server_error() => {
            IdentityProviderError::connection(format!("auth service answered {status}"))
        }
        status => IdentityProviderError::protocol(format!("unexpected status {status}")),
    }
}

fn map_sign_up_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let text = String::from_utf8_lossy(body);
    if text.contains("already registered") || text.contains("user_already_exists") {
        IdentityProviderError::email_taken()
    } else if status.is_server_error() {
        IdentityProviderError::connection(format!("auth service answered {status}"))
    } else {
        IdentityProviderError::protocol(format!("sign-up refused with {status}"))
    }
}

fn parse_profile_id(raw: &str) -> Result<ProfileId, IdentityProviderError> {
    ProfileId::new(raw).map_err(|error| IdentityProviderError::protocol(error.to_string()))
}

fn token_from_body(body: &[u8]) -> Result<TokenResponse, IdentityProviderError> {
    serde_json::from_slice(body)
        .map_err(|error| IdentityProviderError::protocol(format!("invalid token body: {error}")))
}

fn signed_up_profile(body: &[u8]) -> Result<ProfileId, IdentityProviderError> {
    let created: SignUpResponse = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::protocol(format!("invalid sign-up body: {error}"))
    })?;
    let id = created
        .user
        .map(|user| user.id)
        .or(created.id)
        .ok_or_else(|| IdentityProviderError::protocol("sign-up body has no user id"))?;
    parse_profile_id(&id)
}

impl HostedIdentityProvider {
    fn endpoint(&self, path: &str) -> Result<reqwest::Url, IdentityProviderError> {
        self.service
            .url(path)
            .map_err(|error| IdentityProviderError::protocol(error.to_string()))
    }

    async fn password_grant(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<TokenResponse, IdentityProviderError> {
        let response = self
            .service
            .client()
            .post(self.endpoint(TOKEN_PATH)?)
            .header("apikey", self.service.anon_key())
            .json(&PasswordGrant {
                email: credentials.email(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status);
            if !matches!(error, IdentityProviderError::InvalidCredentials) {
                warn!(%status, "sign-in failed upstream");
            }
            return Err(error);
        }
        token_from_body(body.as_ref())
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityProvider {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<ProfileId, IdentityProviderError> {
        let token = self.password_grant(credentials).await?;
        let id = parse_profile_id(&token.user.id)?;
        debug!(profile_id = %id, "signed in");
        Ok(id)
    }

    async fn sign_up(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<ProfileId, IdentityProviderError> {
        let response = self
            .service
            .client()
            .post(self.endpoint(SIGN_UP_PATH)?)
            .header("apikey", self.service.anon_key())
            .json(&PasswordGrant {
                email: credentials.email(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_sign_up_error(status, body.as_ref());
            warn!(%status, %error, "sign-up failed upstream");
            return Err(error);
        }
        let id = signed_up_profile(body.as_ref())?;
        info!(profile_id = %id, "account created");
        Ok(id)
    }

    async fn update_password(
        &self,
        credentials: &LoginCredentials,
        new_password: &str,
    ) -> Result<(), IdentityProviderError> {
        let token = self.password_grant(credentials).await?;
        let access = Zeroizing::new(token.access_token);
        let response = self
            .service
            .client()
            .put(self.endpoint(USER_PATH)?)
            .header("apikey", self.service.anon_key())
            .bearer_auth(access.as_str())
            .json(&PasswordUpdate {
                password: new_password,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "password update failed upstream");
            return Err(map_status_error(status));
        }
        debug!(profile_id = %token.user.id, "password updated");
        Ok(())
    }
}
